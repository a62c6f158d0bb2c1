//! Find options - sorting and pagination for collection reads

use crate::core::AppError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::cmp::Ordering;

use super::filter::lookup;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// Ordered list of sort keys, written as `{"field": 1 | -1 | "asc" | "desc", ...}`
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(try_from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct Sort(Vec<(String, SortOrder)>);

impl Sort {
    pub fn by(field: &str, order: SortOrder) -> Self {
        Self(vec![(field.to_string(), order)])
    }

    pub fn then(mut self, field: &str, order: SortOrder) -> Self {
        self.0.push((field.to_string(), order));
        self
    }

    fn compare(&self, a: &Value, b: &Value) -> Ordering {
        for (field, order) in &self.0 {
            let ordering = compare_values(lookup(a, field), lookup(b, field));
            let ordering = match order {
                SortOrder::Ascending => ordering,
                SortOrder::Descending => ordering.reverse(),
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    }
}

impl TryFrom<Map<String, Value>> for Sort {
    type Error = AppError;

    fn try_from(map: Map<String, Value>) -> Result<Self, Self::Error> {
        map.into_iter()
            .map(|(field, direction)| {
                let order = match &direction {
                    Value::Number(n) if n.as_f64() == Some(1.0) => SortOrder::Ascending,
                    Value::Number(n) if n.as_f64() == Some(-1.0) => SortOrder::Descending,
                    Value::String(s) if s.eq_ignore_ascii_case("asc") => SortOrder::Ascending,
                    Value::String(s) if s.eq_ignore_ascii_case("desc") => SortOrder::Descending,
                    other => {
                        return Err(AppError::validation("Malformed query").with_details(
                            format!("invalid sort direction {} for field {}", other, field),
                        ));
                    }
                };
                Ok((field, order))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Sort)
    }
}

impl From<Sort> for Map<String, Value> {
    fn from(sort: Sort) -> Self {
        sort.0
            .into_iter()
            .map(|(field, order)| {
                let direction = match order {
                    SortOrder::Ascending => 1,
                    SortOrder::Descending => -1,
                };
                (field, Value::from(direction))
            })
            .collect()
    }
}

/// Read options accepted by every finder
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct FindOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<Sort>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

impl FindOptions {
    pub fn sorted(sort: Sort) -> Self {
        Self {
            sort: Some(sort),
            ..Self::default()
        }
    }

    /// Sorts (stable, so ties keep insertion order) then pages the documents
    pub fn apply(&self, mut documents: Vec<Value>) -> Vec<Value> {
        if let Some(sort) = &self.sort {
            documents.sort_by(|a, b| sort.compare(a, b));
        }
        let skip = self.skip.unwrap_or(0);
        let limit = self.limit.unwrap_or(usize::MAX);
        documents.into_iter().skip(skip).take(limit).collect()
    }
}

fn type_rank(value: Option<&Value>) -> u8 {
    match value {
        None | Some(Value::Null) => 0,
        Some(Value::Bool(_)) => 1,
        Some(Value::Number(_)) => 2,
        Some(Value::String(_)) => 3,
        Some(Value::Array(_)) => 4,
        Some(Value::Object(_)) => 5,
    }
}

/// Total order over JSON values: missing/null < bool < number < string < array < object
pub(crate) fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let (x, y) = (x.as_f64().unwrap_or(0.0), y.as_f64().unwrap_or(0.0));
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Array(x)), Some(Value::Array(y))) => x
            .iter()
            .zip(y.iter())
            .map(|(i, j)| compare_values(Some(i), Some(j)))
            .find(|o| *o != Ordering::Equal)
            .unwrap_or_else(|| x.len().cmp(&y.len())),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn names(documents: &[Value]) -> Vec<&str> {
        documents.iter().map(|d| d["name"].as_str().unwrap()).collect()
    }

    #[test]
    fn test_sort_deserializes_in_key_order() {
        let options: FindOptions =
            serde_json::from_value(json!({ "sort": { "techLevel": -1, "name": "asc" } })).unwrap();
        let expected = Sort::by("techLevel", SortOrder::Descending).then("name", SortOrder::Ascending);
        assert_eq!(options.sort, Some(expected));
    }

    #[test]
    fn test_invalid_sort_direction_is_rejected() {
        let result: Result<FindOptions, _> =
            serde_json::from_value(json!({ "sort": { "name": 2 } }));
        assert!(result.is_err());
    }

    #[test]
    fn test_apply_sorts_and_pages() {
        let documents = vec![
            json!({ "name": "b", "techLevel": 3 }),
            json!({ "name": "a", "techLevel": 3 }),
            json!({ "name": "c", "techLevel": 9 }),
            json!({ "name": "d" }),
        ];
        let options = FindOptions::sorted(
            Sort::by("techLevel", SortOrder::Descending).then("name", SortOrder::Ascending),
        );
        let sorted = options.apply(documents.clone());
        assert_eq!(names(&sorted), vec!["c", "a", "b", "d"]);

        let paged = FindOptions {
            skip: Some(1),
            limit: Some(2),
            ..options
        }
        .apply(documents);
        assert_eq!(names(&paged), vec!["a", "b"]);
    }

    #[test]
    fn test_compare_values_ranks_types() {
        assert_eq!(compare_values(None, Some(&json!(false))), Ordering::Less);
        assert_eq!(compare_values(Some(&json!(10)), Some(&json!("1"))), Ordering::Less);
        assert_eq!(compare_values(Some(&json!([1, 2])), Some(&json!([1]))), Ordering::Greater);
        assert_eq!(compare_values(Some(&json!(2.5)), Some(&json!(2))), Ordering::Greater);
    }
}
