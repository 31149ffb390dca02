//! Assignments, grade bands and percentage rules

use crate::db::models::{GradeBand, GradeBands};
use crate::errors::{AppError, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use validator::Validate;

/// Default pass mark as a fraction of total marks
const DEFAULT_PASS_FRACTION: f64 = 0.4;

/// New assignment form
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AssignmentInput {
    #[serde(deserialize_with = "super::trimmed")]
    #[validate(length(min = 1, max = 200, message = "Title is required"))]
    pub title: String,

    #[serde(deserialize_with = "super::trimmed")]
    #[validate(length(min = 1, max = 100, message = "Subject is required"))]
    pub subject: String,

    #[validate(range(exclusive_min = 0.0, message = "Total marks must be greater than zero"))]
    pub total_marks: f64,

    #[serde(default)]
    pub pass_marks: Option<f64>,

    #[serde(default, alias = "date")]
    pub exam_date: Option<NaiveDate>,

    #[serde(default, alias = "grade_scale")]
    pub grading_scale: Option<Vec<GradeBand>>,
}

/// Assignment fields after defaults are applied and rules checked
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedAssignment {
    pub title: String,
    pub subject: String,
    pub total_marks: f64,
    pub pass_marks: f64,
    pub exam_date: NaiveDate,
    pub grading_scale: GradeBands,
}

impl AssignmentInput {
    /// Apply defaults (pass mark, exam date, bands) and check cross-field rules
    pub fn resolve(self, today: NaiveDate) -> Result<ResolvedAssignment> {
        self.validate()?;

        if !self.total_marks.is_finite() {
            return Err(AppError::invalid("total_marks", "Total marks must be a number"));
        }

        let pass_marks = self
            .pass_marks
            .unwrap_or(self.total_marks * DEFAULT_PASS_FRACTION);
        if !pass_marks.is_finite() || pass_marks < 0.0 || pass_marks > self.total_marks {
            return Err(AppError::invalid(
                "pass_marks",
                "Pass marks must be between 0 and total marks",
            ));
        }

        let grading_scale = match self.grading_scale {
            Some(bands) => {
                validate_bands(&bands)?;
                GradeBands(bands)
            }
            None => default_grade_bands(),
        };

        Ok(ResolvedAssignment {
            title: self.title.trim().to_string(),
            subject: self.subject.trim().to_string(),
            total_marks: self.total_marks,
            pass_marks,
            exam_date: self.exam_date.unwrap_or(today),
            grading_scale,
        })
    }
}

/// A+ 90-100, A 80-89, B 70-79, C 60-69, D 40-59, F 0-39
pub fn default_grade_bands() -> GradeBands {
    GradeBands(vec![
        GradeBand::new("A+", 90.0, 100.0),
        GradeBand::new("A", 80.0, 89.0),
        GradeBand::new("B", 70.0, 79.0),
        GradeBand::new("C", 60.0, 69.0),
        GradeBand::new("D", 40.0, 59.0),
        GradeBand::new("F", 0.0, 39.0),
    ])
}

/// Bands are checked one at a time; gaps and overlaps are allowed
pub fn validate_bands(bands: &[GradeBand]) -> Result<()> {
    if bands.is_empty() {
        return Err(AppError::invalid("grading_scale", "At least one grade band is required"));
    }

    for band in bands {
        if band.grade.trim().is_empty() {
            return Err(AppError::invalid("grading_scale", "Grade band label is required"));
        }
        let in_range = |p: f64| p.is_finite() && (0.0..=100.0).contains(&p);
        if !in_range(band.min_percentage)
            || !in_range(band.max_percentage)
            || band.min_percentage > band.max_percentage
        {
            return Err(AppError::invalid(
                "grading_scale",
                format!("Invalid range for grade {}", band.grade),
            ));
        }
    }

    Ok(())
}

/// Marks must be a finite, non-negative number; scores above the total are allowed
pub fn validate_marks(marks: f64) -> Result<()> {
    if !marks.is_finite() || marks < 0.0 {
        return Err(AppError::invalid("marks_obtained", "Marks must be a non-negative number"));
    }
    Ok(())
}

pub fn compute_percentage(marks_obtained: f64, total_marks: f64) -> f64 {
    marks_obtained / total_marks * 100.0
}

/// Label of the first band containing the percentage
pub fn band_for(percentage: f64, bands: &GradeBands) -> Option<&str> {
    bands
        .0
        .iter()
        .find(|band| band.contains(percentage))
        .map(|band| band.grade.as_str())
}

/// Mean percentage, 0 when there are no grades
pub fn grade_average(percentages: &[f64]) -> f64 {
    if percentages.is_empty() {
        return 0.0;
    }
    percentages.iter().sum::<f64>() / percentages.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()
    }

    fn quiz(total_marks: f64) -> AssignmentInput {
        AssignmentInput {
            title: "Quiz 1".into(),
            subject: "Math".into(),
            total_marks,
            pass_marks: None,
            exam_date: None,
            grading_scale: None,
        }
    }

    #[test]
    fn test_resolve_applies_defaults() {
        let resolved = quiz(100.0).resolve(today()).unwrap();

        assert_eq!(resolved.pass_marks, 40.0);
        assert_eq!(resolved.exam_date, today());
        assert_eq!(resolved.grading_scale.0.len(), 6);
        assert_eq!(resolved.grading_scale.0[0].grade, "A+");
    }

    #[test]
    fn test_resolve_rejects_non_positive_total() {
        assert!(quiz(0.0).resolve(today()).is_err());
        assert!(quiz(-5.0).resolve(today()).is_err());
    }

    #[test]
    fn test_resolve_rejects_pass_above_total() {
        let mut input = quiz(50.0);
        input.pass_marks = Some(60.0);
        let err = input.resolve(today()).unwrap_err();
        assert!(matches!(err, AppError::Validation { field: Some(ref f), .. } if f == "pass_marks"));
    }

    #[test]
    fn test_invalid_band_rejected() {
        let mut input = quiz(100.0);
        input.grading_scale = Some(vec![GradeBand::new("A", 90.0, 80.0)]);
        assert!(input.resolve(today()).is_err());

        let mut input = quiz(100.0);
        input.grading_scale = Some(vec![GradeBand::new("A", 90.0, 120.0)]);
        assert!(input.resolve(today()).is_err());
    }

    #[test]
    fn test_band_lookup() {
        let bands = default_grade_bands();
        assert_eq!(band_for(85.0, &bands), Some("A"));
        assert_eq!(band_for(100.0, &bands), Some("A+"));
        assert_eq!(band_for(0.0, &bands), Some("F"));
        // Falls between the default A and A+ ranges
        assert_eq!(band_for(89.5, &bands), None);
    }

    #[test]
    fn test_percentage_and_marks() {
        assert!((compute_percentage(85.0, 100.0) - 85.0).abs() < 1e-9);
        assert!((compute_percentage(17.0, 20.0) - 85.0).abs() < 1e-9);
        assert!(validate_marks(0.0).is_ok());
        assert!(validate_marks(110.0).is_ok());
        assert!(validate_marks(-1.0).is_err());
        assert!(validate_marks(f64::NAN).is_err());
    }

    #[test]
    fn test_grade_average() {
        assert_eq!(grade_average(&[]), 0.0);
        assert!((grade_average(&[80.0, 90.0]) - 85.0).abs() < 1e-9);
    }
}
