use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::aggregate::{DateRange, Granularity, bucket_totals};
use crate::db::{ActionStore, StoreError};
use crate::models::{Action, NewAction, PeriodSum};

/// In-process store for running without a database and for tests.
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

struct Inner {
    last_id: i64,
    rows: BTreeMap<i64, Action>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                last_id: 0,
                rows: BTreeMap::new(),
            }),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ActionStore for MemoryStore {
    async fn list(&self) -> Result<Vec<Action>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.rows.values().cloned().collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Action>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.rows.get(&id).cloned())
    }

    async fn insert(&self, new: &NewAction) -> Result<Action, StoreError> {
        let mut inner = self.inner.write().await;
        // Ids are never reused, even after deletes.
        let id = inner
            .last_id
            .checked_add(1)
            .ok_or(StoreError::IdSpaceExhausted)?;
        inner.last_id = id;

        let action = new.clone().into_action(id);
        inner.rows.insert(id, action.clone());
        Ok(action)
    }

    async fn update(&self, id: i64, new: &NewAction) -> Result<Option<Action>, StoreError> {
        let mut inner = self.inner.write().await;
        let Some(row) = inner.rows.get_mut(&id) else {
            return Ok(None);
        };
        *row = new.clone().into_action(id);
        Ok(Some(row.clone()))
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        let mut inner = self.inner.write().await;
        Ok(inner.rows.remove(&id).is_some())
    }

    async fn list_in_range(&self, range: &DateRange) -> Result<Vec<Action>, StoreError> {
        let inner = self.inner.read().await;
        let mut rows: Vec<Action> = inner
            .rows
            .values()
            .filter(|row| range.contains(row.date))
            .cloned()
            .collect();
        rows.sort_by_key(|row| (row.date, row.id));
        Ok(rows)
    }

    async fn sum_points_by_period(
        &self,
        range: &DateRange,
        granularity: Granularity,
    ) -> Result<Vec<PeriodSum>, StoreError> {
        let inner = self.inner.read().await;
        let matching = inner.rows.values().filter(|row| range.contains(row.date));
        Ok(bucket_totals(matching, granularity))
    }
}
