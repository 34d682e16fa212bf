// Content API response envelope
//
// Every collection endpoint wraps its payload as `{ data, meta? }`.
// Older server configurations nest each record's fields one level down
// under `attributes`; both shapes are accepted and flattened here before
// the caller deserializes into its own record type.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

use crate::error::Error;

/// Raw `{ data, meta }` envelope, before record flattening.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope {
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub meta: Option<Value>,
}

/// Error body returned alongside non-success statuses:
/// `{ "data": null, "error": { "status": 400, "name": "...", "message": "..." } }`
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub error: Option<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorDetail {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Pagination block from `meta.pagination` on collection responses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub page_size: u32,
    #[serde(default)]
    pub page_count: u32,
    #[serde(default)]
    pub total: u64,
}

/// A decoded collection response: flattened records plus pagination, if any.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub pagination: Option<Pagination>,
}

/// Flatten a single record into the flat shape.
///
/// A legacy record `{ "id": 1, "attributes": { "id": 99, "fullname": "X" } }`
/// becomes `{ "id": 1, "fullname": "X" }`: the envelope-level `id` wins and
/// the nested one is discarded. Records without an `attributes` object are
/// returned unchanged.
pub fn flatten_record(record: Value) -> Value {
    let Value::Object(mut outer) = record else {
        return record;
    };

    let attributes = match outer.remove("attributes") {
        Some(Value::Object(attributes)) => attributes,
        Some(other) => {
            outer.insert("attributes".into(), other);
            return Value::Object(outer);
        }
        None => return Value::Object(outer),
    };

    for (key, value) in attributes {
        if key != "id" {
            outer.insert(key, value);
        }
    }
    Value::Object(outer)
}

impl Envelope {
    /// Decode `data` as a single flattened record.
    pub(crate) fn into_record<T: DeserializeOwned>(self, body: &str) -> Result<T, Error> {
        match self.data {
            Some(value @ Value::Object(_)) => decode(flatten_record(value), body),
            _ => Err(Error::MissingData),
        }
    }

    /// Decode `data` as a list of flattened records.
    ///
    /// Records that do not decode are skipped with a warning; the rest of
    /// the page is kept.
    pub(crate) fn into_page<T: DeserializeOwned>(self) -> Result<Page<T>, Error> {
        let Some(Value::Array(items)) = self.data else {
            return Err(Error::MissingData);
        };

        let data = items
            .into_iter()
            .enumerate()
            .filter_map(|(index, item)| {
                let id = item.get("id").cloned().unwrap_or(Value::Null);
                match serde_json::from_value(flatten_record(item)) {
                    Ok(record) => Some(record),
                    Err(e) => {
                        warn!(index, %id, error = %e, "skipping undecodable record");
                        None
                    }
                }
            })
            .collect();

        let pagination = self
            .meta
            .and_then(|mut meta| meta.get_mut("pagination").map(Value::take))
            .and_then(|p| serde_json::from_value(p).ok());

        Ok(Page { data, pagination })
    }
}

fn decode<T: DeserializeOwned>(value: Value, body: &str) -> Result<T, Error> {
    serde_json::from_value(value).map_err(|e| Error::Deserialization {
        message: e.to_string(),
        body: body.to_owned(),
    })
}
