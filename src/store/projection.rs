//! Projection - top-level field selection for reads

use crate::core::AppError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// `{"field": 1}` keeps only the listed fields (plus `_id` unless `_id: 0`),
/// `{"field": 0}` drops the listed fields. The two styles cannot be mixed,
/// except for `_id` which may always be excluded.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(transparent)]
pub struct Projection(Map<String, Value>);

#[derive(Debug, PartialEq)]
enum Mode {
    Include,
    Exclude,
}

impl Projection {
    pub fn include(fields: &[&str]) -> Self {
        Self(fields.iter().map(|f| (f.to_string(), Value::from(1))).collect())
    }

    pub fn exclude(fields: &[&str]) -> Self {
        Self(fields.iter().map(|f| (f.to_string(), Value::from(0))).collect())
    }

    fn selected(value: &Value) -> Result<bool, AppError> {
        match value {
            Value::Bool(flag) => Ok(*flag),
            Value::Number(n) => Ok(n.as_f64().is_some_and(|n| n != 0.0)),
            other => Err(AppError::validation("Malformed projection")
                .with_details(format!("projection values must be 0/1 or booleans, got {}", other))),
        }
    }

    fn mode(&self) -> Result<Option<Mode>, AppError> {
        let mut mode = None;
        for (field, value) in &self.0 {
            if field == "_id" {
                continue;
            }
            let current = if Self::selected(value)? {
                Mode::Include
            } else {
                Mode::Exclude
            };
            match &mode {
                Some(previous) if *previous != current => {
                    return Err(AppError::validation("Malformed projection")
                        .with_details("cannot mix inclusion and exclusion"));
                }
                _ => mode = Some(current),
            }
        }
        Ok(mode)
    }

    /// Checks the projection shape without applying it
    pub fn validate(&self) -> Result<(), AppError> {
        self.mode()?;
        if let Some(id) = self.0.get("_id") {
            Self::selected(id)?;
        }
        Ok(())
    }

    pub fn apply(&self, document: Value) -> Result<Value, AppError> {
        let Value::Object(mut fields) = document else {
            return Ok(document);
        };
        let keep_id = match self.0.get("_id") {
            Some(value) => Self::selected(value)?,
            None => true,
        };

        let mut projected = match self.mode()? {
            Some(Mode::Include) => {
                let mut projected = Map::new();
                for (field, value) in &self.0 {
                    if field != "_id" && Self::selected(value)? {
                        if let Some(v) = fields.remove(field) {
                            projected.insert(field.clone(), v);
                        }
                    }
                }
                if let Some(id) = fields.remove("_id") {
                    projected.insert("_id".to_string(), id);
                }
                projected
            }
            Some(Mode::Exclude) => {
                for field in self.0.keys() {
                    if field != "_id" {
                        fields.remove(field);
                    }
                }
                fields
            }
            None => fields,
        };

        if !keep_id {
            projected.remove("_id");
        }
        Ok(Value::Object(projected))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn area() -> Value {
        json!({ "_id": "a1", "name": "Harbor", "worldId": "w1", "tags": ["port"] })
    }

    #[test]
    fn test_inclusion_keeps_id() {
        let projected = Projection::include(&["name"]).apply(area()).unwrap();
        assert_eq!(projected, json!({ "_id": "a1", "name": "Harbor" }));
    }

    #[test]
    fn test_exclusion_drops_fields() {
        let projected = Projection::exclude(&["tags", "worldId"]).apply(area()).unwrap();
        assert_eq!(projected, json!({ "_id": "a1", "name": "Harbor" }));
    }

    #[test]
    fn test_id_can_be_excluded_from_inclusion() {
        let projection: Projection = serde_json::from_value(json!({ "name": 1, "_id": 0 })).unwrap();
        assert_eq!(projection.apply(area()).unwrap(), json!({ "name": "Harbor" }));
    }

    #[test]
    fn test_missing_included_field_is_absent() {
        let projected = Projection::include(&["parentId"]).apply(area()).unwrap();
        assert_eq!(projected, json!({ "_id": "a1" }));
    }

    #[test]
    fn test_empty_projection_is_identity() {
        assert_eq!(Projection::default().apply(area()).unwrap(), area());
    }

    #[test]
    fn test_mixed_projection_is_rejected() {
        let projection: Projection = serde_json::from_value(json!({ "name": 1, "tags": 0 })).unwrap();
        assert!(projection.validate().is_err());
        assert!(projection.apply(area()).is_err());

        let projection: Projection = serde_json::from_value(json!({ "name": "yes" })).unwrap();
        assert!(projection.validate().is_err());
    }
}
