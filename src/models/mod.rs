pub mod category;
pub mod prompt;

pub use category::{Category, NewCategory};
pub use prompt::{NewPrompt, Prompt};

use crate::config::DEFAULT_USER_ID;

pub(crate) fn default_user_id() -> String {
    DEFAULT_USER_ID.to_string()
}

pub(crate) fn now_millis() -> chrono::DateTime<chrono::Utc> {
    use crate::clock::{Clock, SystemClock};
    SystemClock.now()
}
