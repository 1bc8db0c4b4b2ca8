//! Inputs that arrive either as JSON text or as already-parsed values

use serde::de::DeserializeOwned;

use super::errors::MailerError;

/// A list given either as a JSON string or as structured values
#[derive(Debug, Clone, PartialEq)]
pub enum Input<T> {
    /// JSON text still to be parsed
    Serialized(String),

    /// Already structured values
    Structured(Vec<T>),
}

impl<T: DeserializeOwned> Input<T> {
    /// Resolves the input into structured values.
    ///
    /// A serialized JSON `null` resolves to an empty list, so the caller's
    /// emptiness checks apply to it.
    ///
    /// # Arguments
    /// * `field` - The input's name, used in the [`MailerError::MalformedInput`] error.
    pub fn resolve(self, field: &'static str) -> Result<Vec<T>, MailerError> {
        match self {
            Input::Structured(items) => Ok(items),
            Input::Serialized(raw) => serde_json::from_str::<Option<Vec<T>>>(&raw)
                .map(Option::unwrap_or_default)
                .map_err(|source| MailerError::MalformedInput { field, source }),
        }
    }
}

impl<T> Default for Input<T> {
    fn default() -> Self {
        Input::Structured(Vec::new())
    }
}

impl<T> From<Vec<T>> for Input<T> {
    fn from(items: Vec<T>) -> Self {
        Input::Structured(items)
    }
}

impl<T> From<String> for Input<T> {
    fn from(raw: String) -> Self {
        Input::Serialized(raw)
    }
}

impl<T> From<&str> for Input<T> {
    fn from(raw: &str) -> Self {
        Input::Serialized(raw.to_string())
    }
}
