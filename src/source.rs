//! Locating the array of records inside a fetched JSON document.

use std::fmt::{self, Display};

use serde_json::Value;

/// A dot-separated sequence of object keys, such as `data.items`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPath(Vec<String>);

impl DataPath {
    pub fn parse(s: &str) -> Self {
        Self(s.split('.').map(str::to_owned).collect())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl Display for DataPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.join(".").fmt(f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeError {
    /// One of the keys of the data path is not present.
    PathDoesNotExist,

    /// The value the data path leads to is not an array.
    NotAnArray,
}

/// Extracts the records from `root`.
///
/// The data path is only followed when the root is not an array already.
pub fn resolve_records(
    root: Value,
    data_path: Option<&DataPath>,
) -> Result<Vec<Value>, ShapeError> {
    let target = match data_path {
        Some(data_path) if !root.is_array() => descend(root, data_path)?,
        _ => root,
    };

    match target {
        Value::Array(records) => Ok(records),
        _ => Err(ShapeError::NotAnArray),
    }
}

fn descend(mut value: Value, data_path: &DataPath) -> Result<Value, ShapeError> {
    for key in data_path.keys() {
        value = match value {
            Value::Object(mut object) => {
                object.remove(key).ok_or(ShapeError::PathDoesNotExist)?
            }
            _ => return Err(ShapeError::PathDoesNotExist),
        };
    }

    Ok(value)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn path(s: &str) -> DataPath {
        DataPath::parse(s)
    }

    #[test]
    fn top_level_array() {
        let records = resolve_records(json!([{ "a": 1 }, { "a": 2 }]), None).unwrap();

        assert_eq!(records, vec![json!({ "a": 1 }), json!({ "a": 2 })]);
    }

    #[test]
    fn top_level_array_ignores_the_data_path() {
        let records = resolve_records(json!([1, 2, 3]), Some(&path("data.items"))).unwrap();

        assert_eq!(records.len(), 3);
    }

    #[test]
    fn nested_array() {
        let root = json!({ "data": { "items": [{ "t": "A" }], "total": 1 } });
        let records = resolve_records(root, Some(&path("data.items"))).unwrap();

        assert_eq!(records, vec![json!({ "t": "A" })]);
    }

    #[test]
    fn missing_key() {
        let root = json!({ "data": { "items": [] } });

        assert_eq!(
            resolve_records(root, Some(&path("data.missing"))),
            Err(ShapeError::PathDoesNotExist)
        );
    }

    #[test]
    fn descending_into_a_scalar() {
        let root = json!({ "data": "text" });

        assert_eq!(
            resolve_records(root, Some(&path("data.items"))),
            Err(ShapeError::PathDoesNotExist)
        );
    }

    #[test]
    fn null_at_the_end_of_the_path_is_not_an_array() {
        let root = json!({ "items": null });

        assert_eq!(
            resolve_records(root, Some(&path("items"))),
            Err(ShapeError::NotAnArray)
        );
    }

    #[test]
    fn not_an_array() {
        let root = json!({ "items": "not-an-array" });

        assert_eq!(
            resolve_records(root, Some(&path("items"))),
            Err(ShapeError::NotAnArray)
        );
    }

    #[test]
    fn object_root_without_a_data_path() {
        assert_eq!(
            resolve_records(json!({ "items": [] }), None),
            Err(ShapeError::NotAnArray)
        );
    }

    #[test]
    fn display_round_trips_the_input() {
        assert_eq!(path("a.b.c").to_string(), "a.b.c");
        assert_eq!(path("a.b.c").keys().collect::<Vec<_>>(), ["a", "b", "c"]);
    }
}
