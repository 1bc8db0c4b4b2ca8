//! Settings port

#[cfg(test)]
use mockall::mock;

/// Settings document holding the provider configuration
pub const SETTINGS_DOCUMENT: &str = "Mailchimp Settings";

/// Field of [`SETTINGS_DOCUMENT`] holding the transactional API key
pub const API_KEY_FIELD: &str = "transactional_email_api_key";

/// Read-only key/value settings lookup
pub trait SettingsStore: Clone + Send + Sync + 'static {
    /// Get a settings value
    ///
    /// # Arguments
    /// * `document` - The settings document, e.g. [`SETTINGS_DOCUMENT`].
    /// * `field` - The field within the document.
    ///
    /// # Returns
    /// The value, or [`None`] if it is not set.
    fn get_value(&self, document: &str, field: &str) -> Option<String>;
}

#[cfg(test)]
mock! {
    pub SettingsStore {}

    impl Clone for SettingsStore {
        fn clone(&self) -> Self;
    }

    impl SettingsStore for SettingsStore {
        fn get_value(&self, document: &str, field: &str) -> Option<String>;
    }
}
