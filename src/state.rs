use std::sync::Arc;

use crate::repository::ActionRepository;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub repo: ActionRepository,
}
