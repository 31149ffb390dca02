//! Repository pattern for database operations
//!
//! Every classroom-owned query takes the classroom id from the
//! authenticated context and filters on it. Multi-step writes run inside a
//! single transaction.

mod admin;
mod attendance;
mod classroom;
mod grading;
mod notices;
mod roster;
mod timetable;

pub use admin::{AdminOverview, TierCount};
pub use classroom::{DashboardOverview, USERNAME_TAKEN};
pub use grading::{GradeRow, StudentGradeRow};

use crate::db::models::*;
use crate::db::DbPool;
use crate::errors::{AppError, Result};
use sea_orm::{ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter};
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

/// Repository for data access operations
#[derive(Clone)]
pub struct Repository {
    pool: DbPool,
}

impl Repository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Get the read connection
    fn read_conn(&self) -> &DatabaseConnection {
        self.pool.read()
    }

    /// Get the write connection
    fn write_conn(&self) -> &DatabaseConnection {
        self.pool.write()
    }

    // ========================================================================
    // Health Check
    // ========================================================================

    /// Ping the database
    pub async fn ping(&self) -> Result<()> {
        self.pool.ping().await
    }
}

/// Load the given students, failing unless every one belongs to the classroom
async fn students_in_classroom<C: ConnectionTrait>(
    conn: &C,
    classroom_id: Uuid,
    student_ids: &HashSet<Uuid>,
) -> Result<HashMap<Uuid, Student>> {
    if student_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let students = StudentEntity::find()
        .filter(StudentColumn::ClassroomId.eq(classroom_id))
        .filter(StudentColumn::Id.is_in(student_ids.iter().copied()))
        .all(conn)
        .await?;

    if students.len() != student_ids.len() {
        return Err(AppError::ClassroomMismatch);
    }

    Ok(students.into_iter().map(|s| (s.id, s)).collect())
}

#[cfg(test)]
mod tests;
