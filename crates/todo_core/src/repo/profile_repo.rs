//! Singleton user profile persistence.
//!
//! # Invariants
//! - At most one row exists (`id = 1`, enforced by a CHECK constraint).
//! - `work_schedule_days` holds the ordered day list as a JSON array.

use crate::model::profile::{UserProfile, WorkSchedule};
use crate::repo::{RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension};

const PROFILE_ROW_ID: i64 = 1;

/// Persistence for the one user profile.
pub trait ProfileRepository {
    fn get_profile(&self) -> RepoResult<Option<UserProfile>>;
    /// Creates or overwrites the profile row.
    fn replace_profile(&self, profile: &UserProfile) -> RepoResult<()>;
}

/// SQLite-backed profile repository.
pub struct SqliteProfileRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteProfileRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl ProfileRepository for SqliteProfileRepository<'_> {
    fn get_profile(&self) -> RepoResult<Option<UserProfile>> {
        let row = self
            .conn
            .query_row(
                "SELECT
                    name,
                    timezone,
                    work_schedule_start,
                    work_schedule_end,
                    work_schedule_days
                 FROM user_profile
                 WHERE id = ?1;",
                [PROFILE_ROW_ID],
                |row| {
                    Ok((
                        row.get::<_, String>("name")?,
                        row.get::<_, String>("timezone")?,
                        row.get::<_, String>("work_schedule_start")?,
                        row.get::<_, String>("work_schedule_end")?,
                        row.get::<_, String>("work_schedule_days")?,
                    ))
                },
            )
            .optional()?;

        let Some((name, timezone, start_time, end_time, days_json)) = row else {
            return Ok(None);
        };

        let work_days: Vec<String> = serde_json::from_str(&days_json).map_err(|err| {
            RepoError::InvalidData(format!(
                "invalid JSON in user_profile.work_schedule_days: {err}"
            ))
        })?;

        Ok(Some(UserProfile {
            name,
            timezone,
            work_schedule: WorkSchedule {
                start_time,
                end_time,
                work_days,
            },
        }))
    }

    fn replace_profile(&self, profile: &UserProfile) -> RepoResult<()> {
        let days_json = serde_json::to_string(&profile.work_schedule.work_days)
            .map_err(|err| RepoError::InvalidData(format!("cannot encode work days: {err}")))?;

        self.conn.execute(
            "INSERT INTO user_profile (
                id,
                name,
                timezone,
                work_schedule_start,
                work_schedule_end,
                work_schedule_days
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                timezone = excluded.timezone,
                work_schedule_start = excluded.work_schedule_start,
                work_schedule_end = excluded.work_schedule_end,
                work_schedule_days = excluded.work_schedule_days;",
            params![
                PROFILE_ROW_ID,
                profile.name.as_str(),
                profile.timezone.as_str(),
                profile.work_schedule.start_time.as_str(),
                profile.work_schedule.end_time.as_str(),
                days_json,
            ],
        )?;

        Ok(())
    }
}
