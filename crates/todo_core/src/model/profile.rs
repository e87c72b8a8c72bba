//! Single-user profile record.

use serde::{Deserialize, Serialize};

/// Working hours and days. Times are free-form text (`"09:00"`), stored verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkSchedule {
    #[serde(default)]
    pub start_time: String,
    #[serde(default)]
    pub end_time: String,
    /// Ordered day names, e.g. `["Monday", "Tuesday"]`.
    #[serde(default)]
    pub work_days: Vec<String>,
}

/// The one profile a store holds. It has no identifier of its own.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub timezone: String,
    #[serde(default)]
    pub work_schedule: WorkSchedule,
}

impl UserProfile {
    pub fn new(name: impl Into<String>, timezone: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            timezone: timezone.into(),
            work_schedule: WorkSchedule::default(),
        }
    }

    /// Sets the working schedule, consuming and returning the profile.
    pub fn with_schedule(
        mut self,
        start_time: impl Into<String>,
        end_time: impl Into<String>,
        work_days: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.work_schedule = WorkSchedule {
            start_time: start_time.into(),
            end_time: end_time.into(),
            work_days: work_days.into_iter().map(Into::into).collect(),
        };
        self
    }
}
