mod action;
mod period;

pub use action::{Action, MAX_ACTION_LEN, NewAction};
pub use period::{PeriodSum, PeriodTotal};
