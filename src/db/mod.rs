pub mod actions;
pub mod memory;

use async_trait::async_trait;
use sqlx::PgPool;

use crate::aggregate::{DateRange, Granularity};
use crate::models::{Action, NewAction, PeriodSum};

pub use memory::MemoryStore;

#[derive(Debug)]
pub enum StoreError {
    Database(sqlx::Error),
    IdSpaceExhausted,
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Database(err) => write!(f, "database error: {err}"),
            StoreError::IdSpaceExhausted => write!(f, "no action ids left to assign"),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Database(err)
    }
}

/// Durable storage for action rows.
#[async_trait]
pub trait ActionStore: Send + Sync {
    /// Every row, ascending by id.
    async fn list(&self) -> Result<Vec<Action>, StoreError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Action>, StoreError>;

    /// Persist a new row and return it with its assigned id.
    async fn insert(&self, new: &NewAction) -> Result<Action, StoreError>;

    /// Replace all fields of an existing row. `None` if the id is absent.
    async fn update(&self, id: i64, new: &NewAction) -> Result<Option<Action>, StoreError>;

    /// Remove a row permanently. `false` if the id is absent.
    async fn delete(&self, id: i64) -> Result<bool, StoreError>;

    /// Rows whose date falls inside `range`, ascending by date then id.
    async fn list_in_range(&self, range: &DateRange) -> Result<Vec<Action>, StoreError>;

    /// Points summed per truncated date, ascending, empty buckets omitted.
    async fn sum_points_by_period(
        &self,
        range: &DateRange,
        granularity: Granularity,
    ) -> Result<Vec<PeriodSum>, StoreError>;
}

/// PostgreSQL-backed store.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ActionStore for PgStore {
    async fn list(&self) -> Result<Vec<Action>, StoreError> {
        Ok(actions::list(&self.pool).await?)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Action>, StoreError> {
        Ok(actions::find_by_id(&self.pool, id).await?)
    }

    async fn insert(&self, new: &NewAction) -> Result<Action, StoreError> {
        Ok(actions::create(&self.pool, new).await?)
    }

    async fn update(&self, id: i64, new: &NewAction) -> Result<Option<Action>, StoreError> {
        Ok(actions::update(&self.pool, id, new).await?)
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        Ok(actions::delete(&self.pool, id).await?)
    }

    async fn list_in_range(&self, range: &DateRange) -> Result<Vec<Action>, StoreError> {
        Ok(actions::list_in_range(&self.pool, range.start, range.end).await?)
    }

    async fn sum_points_by_period(
        &self,
        range: &DateRange,
        granularity: Granularity,
    ) -> Result<Vec<PeriodSum>, StoreError> {
        Ok(actions::sum_points_by_period(&self.pool, range.start, range.end, granularity).await?)
    }
}
