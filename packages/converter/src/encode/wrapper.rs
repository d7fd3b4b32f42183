//! Ordered JSON output being assembled by encoders.

use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::EncodeError;

/// An ordered JSON object.
///
/// Fields serialize in insertion order. Nested objects are other wrappers;
/// sequences are built with [`JsonWrapper::push_to`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct JsonWrapper {
    fields: Map<String, Value>,
}

impl JsonWrapper {
    /// Create an empty object.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Write a string field.
    pub fn put_string(&mut self, name: &str, value: impl Into<String>) {
        self.fields.insert(name.to_string(), Value::String(value.into()));
    }

    /// Write an integer field parsed from text.
    ///
    /// # Errors
    /// Returns `NotAnInteger` if `value` does not parse.
    pub fn put_integer(&mut self, name: &str, value: &str) -> Result<(), EncodeError> {
        let parsed = value
            .trim()
            .parse::<i64>()
            .map_err(|_| EncodeError::NotAnInteger {
                field: name.to_string(),
                value: value.to_string(),
            })?;
        self.put_integer_value(name, parsed);
        Ok(())
    }

    /// Write an integer field.
    pub fn put_integer_value(&mut self, name: &str, value: i64) {
        self.fields.insert(name.to_string(), Value::from(value));
    }

    /// Write a boolean field.
    pub fn put_boolean(&mut self, name: &str, value: bool) {
        self.fields.insert(name.to_string(), Value::Bool(value));
    }

    /// Write a `YYYYMMDD` date (any trailing time part is ignored) as
    /// `YYYY-MM-DD`.
    ///
    /// # Errors
    /// Returns `InvalidDate` if the first eight characters are not a date.
    ///
    /// # Examples
    /// ```
    /// use qpp_converter::encode::JsonWrapper;
    ///
    /// let mut wrapper = JsonWrapper::new();
    /// wrapper.put_date("performanceStart", "20170101").unwrap();
    /// assert_eq!(wrapper.get_string("performanceStart"), Some("2017-01-01"));
    /// assert!(wrapper.put_date("performanceEnd", "2017").is_err());
    /// ```
    pub fn put_date(&mut self, name: &str, value: &str) -> Result<(), EncodeError> {
        let invalid = || EncodeError::InvalidDate {
            field: name.to_string(),
            value: value.to_string(),
        };
        let digits = value.trim().get(..8).ok_or_else(invalid)?;
        let date = NaiveDate::parse_from_str(digits, "%Y%m%d").map_err(|_| invalid())?;
        self.put_string(name, date.format("%Y-%m-%d").to_string());
        Ok(())
    }

    /// Write a nested object.
    pub fn put_object(&mut self, name: &str, value: JsonWrapper) {
        self.fields.insert(name.to_string(), value.into_value());
    }

    /// Append an object to the sequence field `name`, creating it if needed.
    pub fn push_to(&mut self, name: &str, value: JsonWrapper) {
        let entry = self
            .fields
            .entry(name.to_string())
            .or_insert_with(|| Value::Array(Vec::new()));
        match entry {
            Value::Array(items) => items.push(value.into_value()),
            other => *other = Value::Array(vec![value.into_value()]),
        }
    }

    /// Raw field value.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// String field value.
    #[must_use]
    pub fn get_string(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(Value::as_str)
    }

    /// Integer field value.
    #[must_use]
    pub fn get_integer(&self, name: &str) -> Option<i64> {
        self.fields.get(name).and_then(Value::as_i64)
    }

    /// Boolean field value.
    #[must_use]
    pub fn get_boolean(&self, name: &str) -> Option<bool> {
        self.fields.get(name).and_then(Value::as_bool)
    }

    /// Whether a field is set.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Field names in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Copy out as a JSON value.
    #[must_use]
    pub fn to_value(&self) -> Value {
        Value::Object(self.fields.clone())
    }

    /// Convert into a JSON value.
    #[must_use]
    pub fn into_value(self) -> Value {
        Value::Object(self.fields)
    }

    /// Serialize as pretty printed JSON.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for JsonWrapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}
