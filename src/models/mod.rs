pub mod trip;
pub mod trip_request;
pub mod user;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

use crate::error::AppError;

/// An update struct whose keys form the allow-list of editable columns.
pub trait UpdateFields: DeserializeOwned {
    const FIELDS: &'static [&'static str];
}

/// Decodes a loose field map, such as a JSON `PATCH` body handed over by the
/// web layer, into one of the typed update structs. Keys outside the struct's
/// allow-list are refused.
pub fn parse_updates<T: UpdateFields>(fields: Value) -> Result<T, AppError> {
    if let Value::Object(map) = &fields {
        if let Some(field) = map.keys().find(|key| !T::FIELDS.contains(&key.as_str())) {
            warn!("rejected update with unknown field `{field}`");
            return Err(AppError::UnknownField(field.clone()));
        }
    }
    serde_json::from_value(fields).map_err(|err| AppError::Other(err.into()))
}
