//! Building template variables from host application records

use chrono::{NaiveDate, NaiveDateTime};
use serde_json::{Map, Value};

use super::template_variables::TemplateVariable;

/// Field holding a record's type name
pub const RECORD_TYPE_FIELD: &str = "doctype";

/// Field holding a record's identifier
pub const RECORD_NAME_FIELD: &str = "name";

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A single field value of a host record
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// No value
    Null,

    /// A scalar JSON value
    Scalar(Value),

    /// A calendar date
    Date(NaiveDate),

    /// A date and time
    DateTime(NaiveDateTime),

    /// A list of values
    List(Vec<FieldValue>),

    /// A nested mapping
    Map(Vec<(String, FieldValue)>),
}

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => FieldValue::Null,
            Value::Array(items) => FieldValue::List(items.into_iter().map(Into::into).collect()),
            Value::Object(map) => {
                FieldValue::Map(map.into_iter().map(|(k, v)| (k, v.into())).collect())
            }
            scalar => FieldValue::Scalar(scalar),
        }
    }
}

impl From<NaiveDate> for FieldValue {
    fn from(date: NaiveDate) -> Self {
        FieldValue::Date(date)
    }
}

impl From<NaiveDateTime> for FieldValue {
    fn from(datetime: NaiveDateTime) -> Self {
        FieldValue::DateTime(datetime)
    }
}

impl From<&str> for FieldValue {
    fn from(text: &str) -> Self {
        FieldValue::Scalar(Value::from(text))
    }
}

impl From<i64> for FieldValue {
    fn from(number: i64) -> Self {
        FieldValue::Scalar(Value::from(number))
    }
}

impl From<f64> for FieldValue {
    fn from(number: f64) -> Self {
        FieldValue::Scalar(Value::from(number))
    }
}

impl From<bool> for FieldValue {
    fn from(flag: bool) -> Self {
        FieldValue::Scalar(Value::from(flag))
    }
}

/// A host record seen as a typed list of fields
pub trait Record {
    /// The record's type name, e.g. `Lead`
    fn record_type(&self) -> Option<&str>;

    /// The record's fields in iteration order, including the type and name fields
    fn fields(&self) -> Vec<(String, FieldValue)>;
}

/// A generic host record with ordered fields
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    doctype: String,
    fields: Vec<(String, FieldValue)>,
}

impl Document {
    /// Creates an empty document of the given type
    pub fn new(doctype: &str) -> Self {
        Self {
            doctype: doctype.to_string(),
            fields: Vec::new(),
        }
    }

    /// Appends a field, replacing an earlier one with the same name in place
    pub fn field(mut self, name: &str, value: impl Into<FieldValue>) -> Self {
        let value = value.into();

        match self.fields.iter_mut().find(|(k, _)| k == name) {
            Some((_, existing)) => *existing = value,
            None => self.fields.push((name.to_string(), value)),
        }

        self
    }
}

impl Record for Document {
    fn record_type(&self) -> Option<&str> {
        Some(&self.doctype)
    }

    fn fields(&self) -> Vec<(String, FieldValue)> {
        self.fields.clone()
    }
}

impl Record for Map<String, Value> {
    fn record_type(&self) -> Option<&str> {
        self.get(RECORD_TYPE_FIELD).and_then(Value::as_str)
    }

    fn fields(&self) -> Vec<(String, FieldValue)> {
        self.iter().map(|(k, v)| (k.clone(), v.clone().into())).collect()
    }
}

/// Lowercases a type name and replaces spaces and hyphens with underscores
pub fn scrub(name: &str) -> String {
    name.trim().to_lowercase().replace([' ', '-'], "_")
}

/// Produces template variables from a record's scalar fields.
///
/// The type field is dropped, the name field is renamed to
/// `<scrubbed type>_name`, null and composite values are skipped and dates
/// are rendered as strings. Output order follows [`Record::fields`], which
/// is not guaranteed to be stable across host versions.
///
/// # Arguments
/// * `record` - The record to read, or `None`.
///
/// # Returns
/// Complete [`TemplateVariable`]s, empty for an absent or empty record.
pub fn variables_from_record<R>(record: Option<&R>) -> Vec<TemplateVariable>
where
    R: Record + ?Sized,
{
    let Some(record) = record else {
        return Vec::new();
    };

    let name_field = record
        .record_type()
        .map(|doctype| format!("{}_{}", scrub(doctype), RECORD_NAME_FIELD));

    record
        .fields()
        .into_iter()
        .filter(|(key, _)| key != RECORD_TYPE_FIELD)
        .filter_map(|(key, value)| {
            let content = match value {
                FieldValue::Scalar(scalar) => scalar,
                FieldValue::Date(date) => Value::from(date.format(DATE_FORMAT).to_string()),
                FieldValue::DateTime(datetime) => {
                    Value::from(datetime.format(DATETIME_FORMAT).to_string())
                }
                FieldValue::Null | FieldValue::List(_) | FieldValue::Map(_) => return None,
            };

            let key = match &name_field {
                Some(renamed) if key == RECORD_NAME_FIELD => renamed.clone(),
                _ => key,
            };

            Some(TemplateVariable {
                name: Some(key),
                content: Some(content),
            })
        })
        .collect()
}
