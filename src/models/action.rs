use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Longest allowed `action` label, in characters.
pub const MAX_ACTION_LEN: usize = 50;

/// A logged sustainability activity.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow, Serialize, Deserialize)]
pub struct Action {
    pub id: i64,
    pub action: String,
    pub date: NaiveDate,
    pub points: i32,
}

/// Validated field values for creating or replacing an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAction {
    pub action: String,
    pub date: NaiveDate,
    pub points: i32,
}

impl NewAction {
    pub fn into_action(self, id: i64) -> Action {
        Action {
            id,
            action: self.action,
            date: self.date,
            points: self.points,
        }
    }
}
