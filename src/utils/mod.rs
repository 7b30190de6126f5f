pub mod query;

use sqlx::types::chrono::{NaiveDateTime, Utc};

/// Row timestamps are bound from the process clock rather than defaulted by
/// sqlite: full sub-second precision keeps creation order observable.
pub(crate) fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}
