//! Platform analytics: growth deltas and health

use crate::db::models::PlatformMetric;
use serde::{Deserialize, Serialize};

/// Snapshots are compared against the one this many positions older
pub const GROWTH_WINDOW: usize = 7;

/// `(latest - prior) / prior * 100`, 0 when either side is missing or prior is 0
pub fn growth_percentage(latest: Option<i64>, prior: Option<i64>) -> f64 {
    match (latest, prior) {
        (Some(latest), Some(prior)) if prior != 0 => {
            (latest - prior) as f64 / prior as f64 * 100.0
        }
        _ => 0.0,
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PlatformGrowth {
    pub schools: f64,
    pub students: f64,
    pub teachers: f64,
    pub active_users: f64,
}

impl PlatformGrowth {
    /// `snapshots` must be ordered newest first
    pub fn from_snapshots(snapshots: &[PlatformMetric]) -> Self {
        let latest = snapshots.first();
        let prior = snapshots.get(GROWTH_WINDOW);
        let delta = |field: fn(&PlatformMetric) -> i32| {
            growth_percentage(
                latest.map(|m| i64::from(field(m))),
                prior.map(|m| i64::from(field(m))),
            )
        };

        Self {
            schools: delta(|m| m.total_schools),
            students: delta(|m| m.total_students),
            teachers: delta(|m| m.total_teachers),
            active_users: delta(|m| m.active_users),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlatformHealth {
    Healthy,
    Warning,
    Critical,
}

impl PlatformHealth {
    pub fn assess(active_schools: u64, attendance_rate: u32) -> Self {
        match (active_schools > 0, attendance_rate > 70) {
            (true, true) => PlatformHealth::Healthy,
            (true, false) => PlatformHealth::Warning,
            (false, _) => PlatformHealth::Critical,
        }
    }
}
