//! Attendance sheet editing and summaries

use crate::db::models::AttendanceStatus;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// One day's marks for a classroom. Students without an entry are unmarked.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttendanceSheet {
    statuses: HashMap<Uuid, AttendanceStatus>,
}

impl AttendanceSheet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_statuses(statuses: HashMap<Uuid, AttendanceStatus>) -> Self {
        Self { statuses }
    }

    /// Select a status for a student; selecting the current status clears it
    pub fn toggle(&mut self, student_id: Uuid, status: AttendanceStatus) {
        if self.statuses.get(&student_id) == Some(&status) {
            self.statuses.remove(&student_id);
        } else {
            self.statuses.insert(student_id, status);
        }
    }

    pub fn status_of(&self, student_id: &Uuid) -> Option<AttendanceStatus> {
        self.statuses.get(student_id).copied()
    }

    pub fn len(&self) -> usize {
        self.statuses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statuses.is_empty()
    }

    pub fn statuses(&self) -> &HashMap<Uuid, AttendanceStatus> {
        &self.statuses
    }

    pub fn into_statuses(self) -> HashMap<Uuid, AttendanceStatus> {
        self.statuses
    }
}

/// Attendance totals for one student
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AttendanceSummary {
    pub total_days: u32,
    pub present_days: u32,
    pub attendance_percentage: f64,
}

impl AttendanceSummary {
    /// Every recorded day counts; present and late count as attended
    pub fn from_statuses<I>(statuses: I) -> Self
    where
        I: IntoIterator<Item = AttendanceStatus>,
    {
        let (total_days, present_days) = statuses
            .into_iter()
            .fold((0u32, 0u32), |(total, present), status| {
                (total + 1, present + u32::from(status.counts_as_present()))
            });

        let attendance_percentage = if total_days == 0 {
            0.0
        } else {
            present_days as f64 / total_days as f64 * 100.0
        };

        Self {
            total_days,
            present_days,
            attendance_percentage,
        }
    }
}

/// Whole-number attendance rate used on the dashboards
pub fn attendance_rate(present: u64, total: u64) -> u32 {
    if total == 0 {
        return 0;
    }
    (present as f64 / total as f64 * 100.0).round() as u32
}
