//! Filter - Mongo-style query filters evaluated against JSON documents
//!
//! A filter is a JSON object mapping field paths (dotted for nested fields)
//! to either a literal value (equality) or an operator object such as
//! `{"$in": [...]}`. `$and` / `$or` combine sub-filters at the top level.

use crate::core::AppError;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::cmp::Ordering;

use super::options::compare_values;

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(transparent)]
pub struct Filter(Map<String, Value>);

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Single field equality
    pub fn eq(field: &str, value: impl Into<Value>) -> Self {
        Self::new().and_eq(field, value)
    }

    /// Matches documents whose `field` equals (or, for arrays, contains) any of `values`
    pub fn is_in<V: Into<Value>>(field: &str, values: impl IntoIterator<Item = V>) -> Self {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        let mut condition = Map::new();
        condition.insert("$in".to_string(), Value::Array(values));
        let mut map = Map::new();
        map.insert(field.to_string(), Value::Object(condition));
        Self(map)
    }

    pub fn and_eq(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.0.insert(field.to_string(), value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Validates the filter and builds a reusable matcher
    pub fn compile(&self) -> Result<Matcher, AppError> {
        Matcher::from_map(&self.0)
    }
}

impl TryFrom<Value> for Filter {
    type Error = AppError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Null => Ok(Self::default()),
            Value::Object(map) => Ok(Self(map)),
            other => Err(AppError::validation("Malformed query")
                .with_details(format!("filter must be an object, got {}", other))),
        }
    }
}

/// Compiled form of a [`Filter`]
#[derive(Debug)]
pub struct Matcher {
    clauses: Vec<Clause>,
}

#[derive(Debug)]
enum Clause {
    Field { path: String, conditions: Vec<Condition> },
    And(Vec<Matcher>),
    Or(Vec<Matcher>),
}

#[derive(Debug)]
enum Condition {
    Eq(Value),
    Ne(Value),
    In(Vec<Value>),
    Nin(Vec<Value>),
    All(Vec<Value>),
    Cmp(CmpOp, Value),
    Exists(bool),
    Regex(Regex),
}

#[derive(Debug, Clone, Copy)]
enum CmpOp {
    Gt,
    Gte,
    Lt,
    Lte,
}

fn malformed(details: impl Into<String>) -> AppError {
    AppError::validation("Malformed query").with_details(details)
}

impl Matcher {
    fn from_map(map: &Map<String, Value>) -> Result<Self, AppError> {
        let mut clauses = Vec::with_capacity(map.len());
        for (key, condition) in map {
            let clause = match key.as_str() {
                "$and" => Clause::And(Self::sub_filters(key, condition)?),
                "$or" => Clause::Or(Self::sub_filters(key, condition)?),
                op if op.starts_with('$') => {
                    return Err(malformed(format!("unsupported top-level operator {}", op)));
                }
                path => Clause::Field {
                    path: path.to_string(),
                    conditions: Self::conditions(condition)?,
                },
            };
            clauses.push(clause);
        }
        Ok(Self { clauses })
    }

    fn sub_filters(op: &str, value: &Value) -> Result<Vec<Matcher>, AppError> {
        let Value::Array(items) = value else {
            return Err(malformed(format!("{} expects an array of filters", op)));
        };
        items
            .iter()
            .map(|item| match item {
                Value::Object(map) => Self::from_map(map),
                _ => Err(malformed(format!("{} expects an array of filters", op))),
            })
            .collect()
    }

    fn conditions(value: &Value) -> Result<Vec<Condition>, AppError> {
        let operators = match value {
            Value::Object(map) if !map.is_empty() && map.keys().all(|k| k.starts_with('$')) => map,
            literal => return Ok(vec![Condition::Eq(literal.clone())]),
        };

        let mut conditions = Vec::with_capacity(operators.len());
        for (op, operand) in operators {
            let condition = match op.as_str() {
                "$eq" => Condition::Eq(operand.clone()),
                "$ne" => Condition::Ne(operand.clone()),
                "$in" => Condition::In(Self::array_operand(op, operand)?),
                "$nin" => Condition::Nin(Self::array_operand(op, operand)?),
                "$all" => Condition::All(Self::array_operand(op, operand)?),
                "$gt" => Condition::Cmp(CmpOp::Gt, operand.clone()),
                "$gte" => Condition::Cmp(CmpOp::Gte, operand.clone()),
                "$lt" => Condition::Cmp(CmpOp::Lt, operand.clone()),
                "$lte" => Condition::Cmp(CmpOp::Lte, operand.clone()),
                "$exists" => match operand {
                    Value::Bool(flag) => Condition::Exists(*flag),
                    _ => return Err(malformed("$exists expects a boolean")),
                },
                "$regex" => {
                    let options = operators.get("$options").and_then(Value::as_str);
                    Condition::Regex(Self::regex_operand(operand, options)?)
                }
                // consumed together with $regex
                "$options" if operators.contains_key("$regex") => continue,
                other => return Err(malformed(format!("unsupported operator {}", other))),
            };
            conditions.push(condition);
        }
        Ok(conditions)
    }

    fn array_operand(op: &str, operand: &Value) -> Result<Vec<Value>, AppError> {
        match operand {
            Value::Array(values) => Ok(values.clone()),
            _ => Err(malformed(format!("{} expects an array", op))),
        }
    }

    fn regex_operand(operand: &Value, options: Option<&str>) -> Result<Regex, AppError> {
        let Value::String(pattern) = operand else {
            return Err(malformed("$regex expects a string pattern"));
        };
        let options = options.unwrap_or_default();
        RegexBuilder::new(pattern)
            .case_insensitive(options.contains('i'))
            .multi_line(options.contains('m'))
            .build()
            .map_err(|e| malformed(format!("invalid $regex: {}", e)))
    }

    pub fn matches(&self, document: &Value) -> bool {
        self.clauses.iter().all(|clause| match clause {
            Clause::Field { path, conditions } => {
                let actual = lookup(document, path);
                conditions.iter().all(|c| c.matches(actual))
            }
            Clause::And(matchers) => matchers.iter().all(|m| m.matches(document)),
            Clause::Or(matchers) => matchers.iter().any(|m| m.matches(document)),
        })
    }
}

impl Condition {
    fn matches(&self, actual: Option<&Value>) -> bool {
        match self {
            Condition::Eq(expected) => equals(actual, expected),
            Condition::Ne(expected) => !equals(actual, expected),
            Condition::In(values) => values.iter().any(|v| equals(actual, v)),
            Condition::Nin(values) => !values.iter().any(|v| equals(actual, v)),
            Condition::All(values) => match actual {
                Some(Value::Array(items)) => values
                    .iter()
                    .all(|v| items.iter().any(|item| same_value(item, v))),
                _ => false,
            },
            Condition::Cmp(op, expected) => candidates(actual)
                .into_iter()
                .any(|candidate| compare(*op, candidate, expected)),
            Condition::Exists(flag) => actual.is_some() == *flag,
            Condition::Regex(regex) => candidates(actual)
                .into_iter()
                .any(|candidate| candidate.as_str().is_some_and(|s| regex.is_match(s))),
        }
    }
}

/// Resolves a dotted path inside a document
pub(crate) fn lookup<'a>(document: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(document, |current, segment| match current {
            Value::Object(map) => map.get(segment),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        })
}

/// The value itself plus, for arrays, each element
fn candidates(actual: Option<&Value>) -> Vec<&Value> {
    match actual {
        Some(Value::Array(items)) => items.iter().chain(actual).collect(),
        Some(value) => vec![value],
        None => Vec::new(),
    }
}

fn equals(actual: Option<&Value>, expected: &Value) -> bool {
    match (actual, expected) {
        (None, Value::Null) => true,
        (None, _) => false,
        (Some(Value::Array(items)), expected) if !expected.is_array() => {
            items.iter().any(|item| same_value(item, expected))
        }
        (Some(value), expected) => same_value(value, expected),
    }
}

/// JSON equality where numbers compare by value (5 == 5.0)
fn same_value(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
        _ => a == b,
    }
}

fn compare(op: CmpOp, actual: &Value, expected: &Value) -> bool {
    // only values of the same type are ordered against each other
    let comparable = matches!(
        (actual, expected),
        (Value::Number(_), Value::Number(_))
            | (Value::String(_), Value::String(_))
            | (Value::Bool(_), Value::Bool(_))
    );
    if !comparable {
        return false;
    }
    let ordering = compare_values(Some(actual), Some(expected));
    match op {
        CmpOp::Gt => ordering == Ordering::Greater,
        CmpOp::Gte => ordering != Ordering::Less,
        CmpOp::Lt => ordering == Ordering::Less,
        CmpOp::Lte => ordering != Ordering::Greater,
    }
}
