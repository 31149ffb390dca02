//! Matching names read off a mark sheet against the class roster

use crate::db::models::Student;
use serde::Serialize;
use std::collections::HashMap;
use uuid::Uuid;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NameMatch {
    /// Student id -> marks
    pub matched: HashMap<Uuid, f64>,
    /// Extracted names that matched nobody
    pub unmatched: Vec<String>,
}

/// A roster student matches when their lower-cased full name contains the
/// lower-cased extracted name. The first matching student in roster order wins.
pub fn match_extracted_names(roster: &[Student], extracted: &[(String, f64)]) -> NameMatch {
    let full_names: Vec<(Uuid, String)> = roster
        .iter()
        .map(|s| (s.id, s.full_name().to_lowercase()))
        .collect();

    let mut result = NameMatch::default();
    for (name, marks) in extracted {
        let needle = name.trim().to_lowercase();
        let hit = (!needle.is_empty())
            .then(|| full_names.iter().find(|(_, full)| full.contains(&needle)))
            .flatten();

        match hit {
            Some((id, _)) => {
                result.matched.insert(*id, *marks);
            }
            None => result.unmatched.push(name.clone()),
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    fn student(first: &str, last: &str) -> Student {
        Student {
            id: Uuid::new_v4(),
            student_id: "XXXX000000".into(),
            login_id: "XXXXXX0000".into(),
            first_name: first.into(),
            last_name: last.into(),
            date_of_birth: NaiveDate::from_ymd_opt(2015, 1, 1).unwrap(),
            gender: None,
            parent_guardian_name: "Parent".into(),
            parent_guardian_email: None,
            parent_guardian_phone: "555".into(),
            emergency_contact_name: None,
            emergency_contact_phone: None,
            medical_conditions: None,
            address: None,
            photo_url: None,
            classroom_id: Uuid::nil(),
            teacher_id: Uuid::nil(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_partial_and_case_insensitive_match() {
        let amy = student("Amy", "Lee");
        let ben = student("Ben", "Okafor");
        let roster = vec![amy.clone(), ben.clone()];

        let result = match_extracted_names(
            &roster,
            &[("amy lee".into(), 85.0), ("OKAFOR".into(), 72.5), ("Zoe".into(), 90.0)],
        );

        assert_eq!(result.matched.get(&amy.id), Some(&85.0));
        assert_eq!(result.matched.get(&ben.id), Some(&72.5));
        assert_eq!(result.unmatched, vec!["Zoe".to_string()]);
    }

    #[test]
    fn test_blank_name_never_matches() {
        let roster = vec![student("Amy", "Lee")];
        let result = match_extracted_names(&roster, &[("  ".into(), 50.0)]);
        assert!(result.matched.is_empty());
        assert_eq!(result.unmatched.len(), 1);
    }
}
