use chrono::{DateTime, TimeDelta, Utc};

/// True iff the account is strictly older than `min_age`.
pub fn account_old_enough(created: DateTime<Utc>, now: DateTime<Utc>, min_age: TimeDelta) -> bool {
    now - created > min_age
}
