use chrono::NaiveDate;
use serde::Serialize;

/// Summed points for one truncated date bucket, as produced by storage.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct PeriodSum {
    pub period: NaiveDate,
    pub total_points: i64,
}

/// One labeled entry of the points time series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeriodTotal {
    pub period: String,
    pub total_points: i64,
}
