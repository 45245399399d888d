use chrono::NaiveDate;
use sqlx::PgPool;

use crate::aggregate::Granularity;
use crate::models::{Action, NewAction, PeriodSum};

pub async fn list(pool: &PgPool) -> Result<Vec<Action>, sqlx::Error> {
    sqlx::query_as::<_, Action>("SELECT id, action, date, points FROM actions ORDER BY id ASC")
        .fetch_all(pool)
        .await
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Action>, sqlx::Error> {
    sqlx::query_as::<_, Action>("SELECT id, action, date, points FROM actions WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn create(pool: &PgPool, new: &NewAction) -> Result<Action, sqlx::Error> {
    sqlx::query_as::<_, Action>(
        "INSERT INTO actions (action, date, points) VALUES ($1, $2, $3)
         RETURNING id, action, date, points",
    )
    .bind(&new.action)
    .bind(new.date)
    .bind(new.points)
    .fetch_one(pool)
    .await
}

pub async fn update(pool: &PgPool, id: i64, new: &NewAction) -> Result<Option<Action>, sqlx::Error> {
    sqlx::query_as::<_, Action>(
        "UPDATE actions SET action = $2, date = $3, points = $4
         WHERE id = $1 RETURNING id, action, date, points",
    )
    .bind(id)
    .bind(&new.action)
    .bind(new.date)
    .bind(new.points)
    .fetch_optional(pool)
    .await
}

/// Returns whether a row was removed.
pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM actions WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn list_in_range(
    pool: &PgPool,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<Vec<Action>, sqlx::Error> {
    sqlx::query_as::<_, Action>(
        "SELECT id, action, date, points FROM actions
         WHERE ($1::date IS NULL OR date >= $1)
           AND ($2::date IS NULL OR date <= $2)
         ORDER BY date ASC, id ASC",
    )
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await
}

pub async fn sum_points_by_period(
    pool: &PgPool,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    granularity: Granularity,
) -> Result<Vec<PeriodSum>, sqlx::Error> {
    sqlx::query_as::<_, PeriodSum>(
        "SELECT date_trunc($1, date::timestamp)::date AS period,
                COALESCE(SUM(points), 0)::BIGINT AS total_points
         FROM actions
         WHERE ($2::date IS NULL OR date >= $2)
           AND ($3::date IS NULL OR date <= $3)
         GROUP BY period
         ORDER BY period ASC",
    )
    .bind(granularity.as_str())
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await
}
