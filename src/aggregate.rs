//! Time-bucketed point totals.
//!
//! Rows are filtered by an inclusive date range, truncated to a day, month or
//! year bucket, and their points summed per bucket. Buckets come back in
//! ascending order and only buckets with at least one row are present.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::Deserialize;

use crate::db::ActionStore;
use crate::error::AppError;
use crate::models::{Action, PeriodSum, PeriodTotal};
use crate::validation::parse_calendar_date;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Granularity {
    #[default]
    Day,
    Month,
    Year,
}

impl Granularity {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "day" => Some(Granularity::Day),
            "month" => Some(Granularity::Month),
            "year" => Some(Granularity::Year),
            _ => None,
        }
    }

    /// Field name understood by PostgreSQL's `date_trunc`.
    pub fn as_str(self) -> &'static str {
        match self {
            Granularity::Day => "day",
            Granularity::Month => "month",
            Granularity::Year => "year",
        }
    }

    /// First day of the bucket containing `date`.
    pub fn truncate(self, date: NaiveDate) -> NaiveDate {
        match self {
            Granularity::Day => date,
            Granularity::Month => date.with_day(1).unwrap_or(date),
            Granularity::Year => NaiveDate::from_yo_opt(date.year(), 1).unwrap_or(date),
        }
    }

    pub fn label(self, period: NaiveDate) -> String {
        let fmt = match self {
            Granularity::Day => "%Y-%m-%d",
            Granularity::Month => "%Y-%m",
            Granularity::Year => "%Y",
        };
        period.format(fmt).to_string()
    }
}

/// Inclusive date bounds; `None` leaves that side open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    /// Parse optional `YYYY-MM-DD` bounds. Empty strings count as absent.
    pub fn parse(start: Option<&str>, end: Option<&str>) -> Result<Self, AppError> {
        Ok(DateRange {
            start: parse_bound(start)?,
            end: parse_bound(end)?,
        })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.is_none_or(|start| date >= start) && self.end.is_none_or(|end| date <= end)
    }
}

/// Raw query parameters of the time series endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TimeseriesParams {
    pub start: Option<String>,
    pub end: Option<String>,
    pub group: Option<String>,
}

impl TimeseriesParams {
    pub fn resolve(&self) -> Result<(DateRange, Granularity), AppError> {
        let granularity = match self.group.as_deref().filter(|g| !g.is_empty()) {
            None => Granularity::default(),
            Some(raw) => Granularity::parse(raw).ok_or_else(|| {
                AppError::BadRequest("invalid group: expected one of day, month, year".to_string())
            })?,
        };

        let range = DateRange::parse(self.start.as_deref(), self.end.as_deref())?;

        Ok((range, granularity))
    }
}

fn parse_bound(raw: Option<&str>) -> Result<Option<NaiveDate>, AppError> {
    raw.filter(|s| !s.is_empty())
        .map(|s| {
            parse_calendar_date(s).ok_or_else(|| {
                AppError::BadRequest("invalid date format: expected YYYY-MM-DD".to_string())
            })
        })
        .transpose()
}

/// Group rows by truncated date and sum their points, ascending by bucket.
pub fn bucket_totals<'a, I>(rows: I, granularity: Granularity) -> Vec<PeriodSum>
where
    I: IntoIterator<Item = &'a Action>,
{
    let mut buckets: BTreeMap<NaiveDate, i64> = BTreeMap::new();
    for row in rows {
        *buckets.entry(granularity.truncate(row.date)).or_insert(0) += i64::from(row.points);
    }

    buckets
        .into_iter()
        .map(|(period, total_points)| PeriodSum {
            period,
            total_points,
        })
        .collect()
}

pub async fn points_timeseries(
    store: &dyn ActionStore,
    params: &TimeseriesParams,
) -> Result<Vec<PeriodTotal>, AppError> {
    let (range, granularity) = params.resolve()?;

    let sums = store.sum_points_by_period(&range, granularity).await?;
    tracing::debug!(
        "Points time series: {} bucket(s) by {} for {:?}..{:?}",
        sums.len(),
        granularity.as_str(),
        range.start,
        range.end
    );

    Ok(sums
        .into_iter()
        .map(|sum| PeriodTotal {
            period: granularity.label(sum.period),
            total_points: sum.total_points,
        })
        .collect())
}
