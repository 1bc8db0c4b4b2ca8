//! Templated email requests and the provider payload built from them

use serde::Serialize;

use super::{
    input::Input,
    recipients::Recipient,
    template_variables::{MergeVar, TemplateVariable},
};

/// A request to send a provider-hosted template
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemplateEmail {
    /// Who receives the email
    pub recipients: Input<Recipient>,

    /// The sender's email address
    pub from_email: String,

    /// The template's name (slug) at the provider
    pub template: Option<String>,

    /// Values for the template's placeholders
    pub variables: Option<Input<TemplateVariable>>,

    /// The subject line; the template's default is used when absent
    pub subject: Option<String>,
}

impl TemplateEmail {
    /// Creates a request without variables or subject
    pub fn new(recipients: impl Into<Input<Recipient>>, from_email: &str, template: &str) -> Self {
        Self {
            recipients: recipients.into(),
            from_email: from_email.to_string(),
            template: Some(template.to_string()),
            variables: None,
            subject: None,
        }
    }

    /// Sets the template variables
    pub fn with_variables(mut self, variables: impl Into<Input<TemplateVariable>>) -> Self {
        self.variables = Some(variables.into());
        self
    }

    /// Sets the subject line
    pub fn with_subject(mut self, subject: &str) -> Self {
        self.subject = Some(subject.to_string());
        self
    }
}

/// Template language used for merge vars
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeLanguage {
    /// `*|MERGE|*` tags
    Mailchimp,

    /// `{{merge}}` tags
    Handlebars,
}

/// Where the template variables are placed in the payload
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PayloadVariant {
    /// Variables go to `message.global_merge_vars` with handlebars merging,
    /// `template_content` stays empty
    #[default]
    MergeVars,

    /// Variables go to the top-level `template_content`
    TemplateContent,
}

/// The `message` part of a send-template payload
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PayloadMessage {
    /// Recipients
    pub to: Vec<Recipient>,

    /// Subject line
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,

    /// Sender address
    pub from_email: String,

    /// Template language for merge vars
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merge_language: Option<MergeLanguage>,

    /// Variables shared by every recipient
    #[serde(skip_serializing_if = "Option::is_none")]
    pub global_merge_vars: Option<Vec<MergeVar>>,
}

/// Body of the provider's send-template call, without the API key
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SendTemplatePayload {
    /// The template's name at the provider
    pub template_name: String,

    /// Content for the template's editable regions
    pub template_content: Vec<MergeVar>,

    /// The message itself
    pub message: PayloadMessage,
}

impl SendTemplatePayload {
    /// Builds a payload from already validated parts
    pub fn build(
        variant: PayloadVariant,
        template: &str,
        to: Vec<Recipient>,
        from_email: &str,
        subject: Option<&str>,
        variables: Vec<MergeVar>,
    ) -> Self {
        let (template_content, merge_language, global_merge_vars) = match variant {
            PayloadVariant::MergeVars => {
                (Vec::new(), Some(MergeLanguage::Handlebars), Some(variables))
            }
            PayloadVariant::TemplateContent => (variables, None, None),
        };

        Self {
            template_name: template.to_string(),
            template_content,
            message: PayloadMessage {
                to,
                subject: subject.map(str::to_string),
                from_email: from_email.to_string(),
                merge_language,
                global_merge_vars,
            },
        }
    }
}
