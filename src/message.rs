//! The value type routed and delivered by the hub.

use std::collections::HashMap;

use bytes::Bytes;

use crate::error::FieldError;

/// One field value. Implementers of `Fields` need at least these primitive
/// shapes; this crate settles on an explicit enum rather than `Box<dyn Any>`
/// so coercion failures are a typed `Result`, not a panic.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Bytes(Bytes),
    StringList(Vec<String>),
}

impl FieldValue {
    fn type_name(&self) -> &'static str {
        match self {
            FieldValue::Str(_) => "string",
            FieldValue::Int(_) => "int",
            FieldValue::Float(_) => "float",
            FieldValue::Bool(_) => "bool",
            FieldValue::Bytes(_) => "bytes",
            FieldValue::StringList(_) => "string list",
        }
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        FieldValue::Str(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::Str(v.to_string())
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        FieldValue::Int(v)
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        FieldValue::Float(v)
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        FieldValue::Bool(v)
    }
}

impl From<Bytes> for FieldValue {
    fn from(v: Bytes) -> Self {
        FieldValue::Bytes(v)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(v: Vec<String>) -> Self {
        FieldValue::StringList(v)
    }
}

/// Key/value storage carried alongside a [`Message`], and the immutable
/// context a [`crate::hub::Hub::with`] child merges into every message it
/// publishes.
pub type Fields = HashMap<String, FieldValue>;

/// A message routed through the hub. `name` is matched against subscriber
/// patterns; `body` and `fields` are delivered as-is.
#[derive(Clone, Debug, PartialEq)]
pub struct Message {
    pub name: String,
    pub body: Bytes,
    pub fields: Fields,
}

impl Message {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            body: Bytes::new(),
            fields: Fields::new(),
        }
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// The topic this message routes on.
    pub fn topic(&self) -> &str {
        &self.name
    }

    pub fn field_str(&self, key: &str) -> Result<&str, FieldError> {
        match self.fields.get(key) {
            None => Err(FieldError::Missing { key: key.to_string() }),
            Some(FieldValue::Str(s)) => Ok(s),
            Some(other) => Err(FieldError::WrongType {
                key: key.to_string(),
                expected: "string",
                found: other.type_name(),
            }),
        }
    }

    pub fn field_int(&self, key: &str) -> Result<i64, FieldError> {
        match self.fields.get(key) {
            None => Err(FieldError::Missing { key: key.to_string() }),
            Some(FieldValue::Int(v)) => Ok(*v),
            Some(other) => Err(FieldError::WrongType {
                key: key.to_string(),
                expected: "int",
                found: other.type_name(),
            }),
        }
    }

    pub fn field_float(&self, key: &str) -> Result<f64, FieldError> {
        match self.fields.get(key) {
            None => Err(FieldError::Missing { key: key.to_string() }),
            Some(FieldValue::Float(v)) => Ok(*v),
            Some(other) => Err(FieldError::WrongType {
                key: key.to_string(),
                expected: "float",
                found: other.type_name(),
            }),
        }
    }

    pub fn field_bool(&self, key: &str) -> Result<bool, FieldError> {
        match self.fields.get(key) {
            None => Err(FieldError::Missing { key: key.to_string() }),
            Some(FieldValue::Bool(v)) => Ok(*v),
            Some(other) => Err(FieldError::WrongType {
                key: key.to_string(),
                expected: "bool",
                found: other.type_name(),
            }),
        }
    }

    pub fn field_bytes(&self, key: &str) -> Result<&Bytes, FieldError> {
        match self.fields.get(key) {
            None => Err(FieldError::Missing { key: key.to_string() }),
            Some(FieldValue::Bytes(v)) => Ok(v),
            Some(other) => Err(FieldError::WrongType {
                key: key.to_string(),
                expected: "bytes",
                found: other.type_name(),
            }),
        }
    }

    pub fn field_string_list(&self, key: &str) -> Result<&[String], FieldError> {
        match self.fields.get(key) {
            None => Err(FieldError::Missing { key: key.to_string() }),
            Some(FieldValue::StringList(v)) => Ok(v),
            Some(other) => Err(FieldError::WrongType {
                key: key.to_string(),
                expected: "string list",
                found: other.type_name(),
            }),
        }
    }
}
