use std::sync::Arc;

use serde_json::Value;

use crate::aggregate::{self, DateRange, TimeseriesParams};
use crate::db::ActionStore;
use crate::error::AppError;
use crate::models::{Action, PeriodTotal};
use crate::validation::validate_action;

/// Typed access to actions on top of an injected store.
#[derive(Clone)]
pub struct ActionRepository {
    store: Arc<dyn ActionStore>,
}

impl ActionRepository {
    pub fn new(store: Arc<dyn ActionStore>) -> Self {
        Self { store }
    }

    pub async fn list_all(&self) -> Result<Vec<Action>, AppError> {
        Ok(self.store.list().await?)
    }

    pub async fn list_between(&self, range: &DateRange) -> Result<Vec<Action>, AppError> {
        if range.start.is_none() && range.end.is_none() {
            return self.list_all().await;
        }
        Ok(self.store.list_in_range(range).await?)
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Action, AppError> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found(id))
    }

    pub async fn create(&self, payload: &Value) -> Result<Action, AppError> {
        let new = validate_action(payload)?;
        let action = self.store.insert(&new).await?;
        tracing::info!("Action {} created ({} points on {})", action.id, action.points, action.date);
        Ok(action)
    }

    /// Replace every field of an existing action. Nothing changes unless the payload is valid.
    pub async fn update(&self, id: i64, payload: &Value) -> Result<Action, AppError> {
        self.get_by_id(id).await?;
        let new = validate_action(payload)?;

        // The row may have been deleted since the lookup above.
        let action = self
            .store
            .update(id, &new)
            .await?
            .ok_or_else(|| not_found(id))?;
        tracing::info!("Action {} updated", action.id);
        Ok(action)
    }

    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        if !self.store.delete(id).await? {
            return Err(not_found(id));
        }
        tracing::info!("Action {id} deleted");
        Ok(())
    }

    pub async fn points_timeseries(
        &self,
        params: &TimeseriesParams,
    ) -> Result<Vec<PeriodTotal>, AppError> {
        aggregate::points_timeseries(self.store.as_ref(), params).await
    }
}

fn not_found(id: i64) -> AppError {
    AppError::NotFound(format!("Action {id} not found"))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::db::MemoryStore;

    fn repo() -> ActionRepository {
        ActionRepository::new(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn created_action_is_listed_with_fresh_id() {
        let repo = repo();
        let created = repo
            .create(&json!({ "action": "Recycling", "date": "2025-01-01", "points": 10 }))
            .await
            .unwrap();

        let all = repo.list_all().await.unwrap();
        assert_eq!(all, vec![created.clone()]);
        assert!(created.id > 0);
    }

    #[tokio::test]
    async fn invalid_create_writes_nothing() {
        let repo = repo();
        let err = repo
            .create(&json!({ "action": "x".repeat(51), "date": "2025-01-01" }))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(ref e) if e.contains_key("action")));
        assert!(repo.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_missing_id_is_not_found() {
        let repo = repo();
        repo.create(&json!({ "action": "A", "date": "2025-01-01" }))
            .await
            .unwrap();

        let err = repo
            .update(42, &json!({ "action": "B", "date": "2025-01-02" }))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(repo.list_all().await.unwrap()[0].action, "A");
    }

    #[tokio::test]
    async fn invalid_update_leaves_row_untouched() {
        let repo = repo();
        let original = repo
            .create(&json!({ "action": "A", "date": "2025-01-01", "points": 3 }))
            .await
            .unwrap();

        let err = repo
            .update(original.id, &json!({ "action": "B", "date": "not-a-date", "points": 8 }))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(repo.get_by_id(original.id).await.unwrap(), original);
    }

    #[tokio::test]
    async fn update_missing_id_wins_over_invalid_payload() {
        let err = repo().update(7, &json!({})).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn delete_twice_fails_the_second_time() {
        let repo = repo();
        let created = repo
            .create(&json!({ "action": "A", "date": "2025-01-01" }))
            .await
            .unwrap();

        repo.delete(created.id).await.unwrap();
        let err = repo.delete(created.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn timeseries_groups_by_month() {
        let repo = repo();
        for (date, points) in [("2025-01-01", 10), ("2025-01-02", 5), ("2025-02-01", 7)] {
            repo.create(&json!({ "action": "A", "date": date, "points": points }))
                .await
                .unwrap();
        }

        let series = repo
            .points_timeseries(&TimeseriesParams {
                group: Some("month".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(
            series,
            vec![
                PeriodTotal {
                    period: "2025-01".to_string(),
                    total_points: 15
                },
                PeriodTotal {
                    period: "2025-02".to_string(),
                    total_points: 7
                },
            ]
        );
    }
}
