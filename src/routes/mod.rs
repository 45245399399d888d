pub mod actions;

use axum::Router;
use axum::routing::{get, post};

use crate::state::SharedState;

pub fn api_routes() -> Router<SharedState> {
    Router::new()
        .route("/api/actions/", get(actions::list))
        .route("/api/actions/create/", post(actions::create))
        .route(
            "/api/actions/points_timeseries/",
            get(actions::points_timeseries),
        )
        .route(
            "/api/actions/{id}/",
            get(actions::get)
                .put(actions::update)
                .delete(actions::delete),
        )
}
