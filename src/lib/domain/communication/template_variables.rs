//! Template variables (merge vars)

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::errors::MailerError;

/// A template variable as supplied by the caller
///
/// Both fields are optional here so that incomplete input can be parsed and
/// then rejected by [`validate_template`] with a precise error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TemplateVariable {
    /// The placeholder name
    #[serde(default)]
    pub name: Option<String>,

    /// The value substituted for the placeholder
    #[serde(default)]
    pub content: Option<Value>,
}

impl TemplateVariable {
    /// Creates a complete template variable
    pub fn new(name: &str, content: impl Into<Value>) -> Self {
        Self {
            name: Some(name.to_string()),
            content: Some(content.into()),
        }
    }
}

/// A validated template variable, as sent to the provider
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MergeVar {
    /// The placeholder name
    pub name: String,

    /// The value substituted for the placeholder
    pub content: Value,
}

/// Checks the template name and turns the variables into [`MergeVar`]s.
///
/// # Arguments
/// * `template` - The provider-side template name.
/// * `variables` - The caller's variables; an empty list is valid.
///
/// # Returns
/// The validated variables, in their original order.
pub fn validate_template(
    template: Option<&str>,
    variables: Vec<TemplateVariable>,
) -> Result<Vec<MergeVar>, MailerError> {
    if template.map_or(true, str::is_empty) {
        return Err(MailerError::MissingTemplate);
    }

    variables
        .into_iter()
        .enumerate()
        .map(|(index, variable)| match variable {
            TemplateVariable {
                name: Some(name),
                content: Some(content),
            } => Ok(MergeVar { name, content }),
            _ => Err(MailerError::InvalidTemplateContent { index }),
        })
        .collect()
}
