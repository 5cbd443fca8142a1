pub mod actor;
pub mod actor_movie;
pub mod genre;
pub mod movie;

use sea_orm::ActiveValue;

/// Current time as unix seconds, used for the `created_at`/`updated_at` columns.
pub(crate) fn now_sec() -> i64 {
    jiff::Timestamp::now().as_second()
}

/// Reads the value held by an active model field, if any.
pub(crate) fn active_value<V>(value: &ActiveValue<V>) -> Option<&V>
where
    V: Into<sea_orm::Value>,
{
    match value {
        ActiveValue::Set(v) | ActiveValue::Unchanged(v) => Some(v),
        ActiveValue::NotSet => None,
    }
}

/// Stamps the audit columns of an active model about to be saved.
macro_rules! stamp_timestamps {
    ($model:expr, $insert:expr) => {{
        let now = $crate::entities::now_sec();
        if $insert {
            $model.created_at = sea_orm::Set(now);
        }
        $model.updated_at = sea_orm::Set(now);
    }};
}

pub(crate) use stamp_timestamps;
