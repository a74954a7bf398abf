//! Explicitly named call arguments.
//!
//! Operations receive their inputs as an ordered list of `(name, value)`
//! pairs, so audit extraction can match parameters by name without any
//! runtime reflection.

use serde_json::{Map, Value};

use portalguard_core::error::{PortalError, Result};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallArgs {
    params: Vec<(String, Value)>,
}

impl CallArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.push(name, value);
        self
    }

    pub fn push(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.params.push((name.into(), value.into()));
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.params.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Value of `name` as an identifier string. Strings and numbers qualify;
    /// empty strings, null and structured values do not.
    pub fn get_id(&self, name: &str) -> Option<String> {
        self.get(name).and_then(value_as_id)
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.params.iter().map(|(_, v)| v)
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn to_json(&self) -> Value {
        let mut m = Map::new();
        for (n, v) in &self.params {
            m.insert(n.clone(), v.clone());
        }
        Value::Object(m)
    }

    /// Build from a JSON object body. `null` is treated as no arguments.
    pub fn from_json(v: Value) -> Result<Self> {
        match v {
            Value::Object(m) => Ok(Self {
                params: m.into_iter().collect(),
            }),
            Value::Null => Ok(Self::default()),
            other => Err(PortalError::BadRequest(format!(
                "arguments must be a JSON object, got {}",
                json_kind(&other)
            ))),
        }
    }
}

pub(crate) fn value_as_id(v: &Value) -> Option<String> {
    match v {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
