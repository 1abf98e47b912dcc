//! Structural validation of inbound JSON payloads.
//!
//! A [`PayloadReader`] walks a raw JSON object field by field, filling in defaults for
//! absent fields and recording every field whose value does not have the declared type.
//! Fields that the reader is never asked about are ignored.
use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

use super::status::Status;

/// Name reported for errors about the payload as a whole.
pub const ROOT_FIELD: &str = "__root__";

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Reason {
    Missing,
    ExpectedObject,
    ExpectedString,
    ExpectedBoolean,
    ExpectedList,
    ExpectedListOfStrings,
    ExpectedTimestamp,
    UnknownStatus,
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Missing => "field required",
            Self::ExpectedObject => "expected an object",
            Self::ExpectedString => "expected a string",
            Self::ExpectedBoolean => "expected a boolean",
            Self::ExpectedList => "expected a list",
            Self::ExpectedListOfStrings => "expected a list of strings",
            Self::ExpectedTimestamp => "expected an ISO 8601 timestamp",
            Self::UnknownStatus => "expected one of draft, scheduled, released, archived",
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub reason: Reason,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.field, self.reason)
    }
}

/// The payload failed structural validation. Never empty.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    pub fields: Vec<FieldError>,
}

impl ValidationError {
    #[must_use]
    pub fn single(field: impl Into<String>, reason: Reason) -> Self {
        Self {
            fields: vec![FieldError {
                field: field.into(),
                reason,
            }],
        }
    }

    /// Names of the offending fields, in the order they were checked.
    #[must_use]
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|e| e.field.as_str()).collect()
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Invalid payload: ")?;
        for (i, error) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

#[derive(Debug)]
pub struct PayloadReader<'a> {
    payload: &'a Map<String, Value>,
    errors: Vec<FieldError>,
}

impl<'a> PayloadReader<'a> {
    /// # Errors
    ///
    /// Fails if the payload is not a JSON object.
    pub fn new(payload: &'a Value) -> Result<Self, ValidationError> {
        match payload {
            Value::Object(payload) => Ok(Self {
                payload,
                errors: Vec::new(),
            }),
            _ => Err(ValidationError::single(ROOT_FIELD, Reason::ExpectedObject)),
        }
    }

    /// Read a field that must be present and must not be `null`.
    fn required<T>(
        &mut self,
        field: &str,
        extract: impl FnOnce(&Value) -> Result<T, Reason>,
    ) -> Option<T> {
        let payload = self.payload;
        match payload.get(field) {
            None | Some(Value::Null) => {
                self.reject(field, Reason::Missing);
                None
            }
            Some(value) => self.extract(field, value, extract),
        }
    }

    /// Read a field that may be absent, but must not be `null` if present.
    fn defaulted<T>(
        &mut self,
        field: &str,
        default: impl FnOnce() -> T,
        extract: impl FnOnce(&Value) -> Result<T, Reason>,
    ) -> T {
        let payload = self.payload;
        match payload.get(field) {
            None => default(),
            Some(value) => self.extract(field, value, extract).unwrap_or_else(default),
        }
    }

    /// Read a field where absence and `null` both mean "no value".
    fn optional<T>(
        &mut self,
        field: &str,
        extract: impl FnOnce(&Value) -> Result<T, Reason>,
    ) -> Option<T> {
        let payload = self.payload;
        match payload.get(field) {
            None | Some(Value::Null) => None,
            Some(value) => self.extract(field, value, extract),
        }
    }

    fn extract<T>(
        &mut self,
        field: &str,
        value: &Value,
        extract: impl FnOnce(&Value) -> Result<T, Reason>,
    ) -> Option<T> {
        extract(value).map_err(|reason| self.reject(field, reason)).ok()
    }

    fn reject(&mut self, field: &str, reason: Reason) {
        self.errors.push(FieldError {
            field: field.to_owned(),
            reason,
        });
    }

    pub fn required_string(&mut self, field: &str) -> String {
        self.required(field, as_string).unwrap_or_default()
    }

    pub fn optional_string(&mut self, field: &str) -> Option<String> {
        self.optional(field, as_string)
    }

    pub fn string_or(&mut self, field: &str, default: &str) -> String {
        self.defaulted(field, || default.to_owned(), as_string)
    }

    pub fn bool_or(&mut self, field: &str, default: bool) -> bool {
        self.defaulted(field, || default, as_bool)
    }

    pub fn string_list(&mut self, field: &str) -> Vec<String> {
        self.defaulted(field, Vec::new, as_string_list)
    }

    pub fn object(&mut self, field: &str) -> Map<String, Value> {
        self.defaulted(field, Map::new, as_object)
    }

    /// Like [`Self::object`], but `null` is accepted and treated as absent.
    pub fn nullable_object(&mut self, field: &str) -> Map<String, Value> {
        self.optional(field, as_object).unwrap_or_default()
    }

    pub fn optional_timestamp(&mut self, field: &str) -> Option<DateTime<Utc>> {
        self.optional(field, as_timestamp)
    }

    pub fn status(&mut self, field: &str) -> Status {
        self.defaulted(field, Status::default, |value| {
            as_string(value)?
                .parse()
                .map_err(|_| Reason::UnknownStatus)
        })
    }

    /// Hand back `value` if every field read so far was valid.
    ///
    /// # Errors
    ///
    /// Fails with every field error recorded by this reader.
    pub fn finish<T>(self, value: T) -> Result<T, ValidationError> {
        if self.errors.is_empty() {
            Ok(value)
        } else {
            Err(ValidationError {
                fields: self.errors,
            })
        }
    }
}

fn as_string(value: &Value) -> Result<String, Reason> {
    value
        .as_str()
        .map(ToOwned::to_owned)
        .ok_or(Reason::ExpectedString)
}

fn as_bool(value: &Value) -> Result<bool, Reason> {
    value.as_bool().ok_or(Reason::ExpectedBoolean)
}

fn as_object(value: &Value) -> Result<Map<String, Value>, Reason> {
    value.as_object().cloned().ok_or(Reason::ExpectedObject)
}

fn as_string_list(value: &Value) -> Result<Vec<String>, Reason> {
    value
        .as_array()
        .ok_or(Reason::ExpectedList)?
        .iter()
        .map(|item| {
            item.as_str()
                .map(ToOwned::to_owned)
                .ok_or(Reason::ExpectedListOfStrings)
        })
        .collect()
}

/// Accepts RFC 3339, a naive date-time (assumed UTC), a plain date (midnight UTC),
/// or integer seconds since the unix epoch.
fn as_timestamp(value: &Value) -> Result<DateTime<Utc>, Reason> {
    match value {
        Value::String(s) => parse_timestamp(s).ok_or(Reason::ExpectedTimestamp),
        Value::Number(n) => n
            .as_i64()
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .ok_or(Reason::ExpectedTimestamp),
        _ => Err(Reason::ExpectedTimestamp),
    }
}

#[must_use]
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
