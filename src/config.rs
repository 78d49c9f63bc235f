//! Engine configuration.
//!
//! Names every declarative hook the engine reads from markup, plus the
//! two behavioural knobs (stream pre-capture and the redirect limit).
//!
//! # Example
//!
//! ```ignore
//! use turbo_morph::Config;
//!
//! let config = Config::new()
//!     .with_frame_tag("x-frame")
//!     .with_capture_stream_submissions(true)
//!     .with_max_redirects(5);
//!
//! // Or from JSON; missing keys keep their defaults.
//! let config = Config::from_json(r#"{ "maxRedirects": 5 }"#)?;
//! ```

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

// ============================================================================
// Constants
// ============================================================================

/// Default redirect limit, matching the usual browser fetch limit.
const DEFAULT_MAX_REDIRECTS: usize = 20;

// ============================================================================
// Config
// ============================================================================

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// Tag name of frame elements.
    pub frame_tag: String,

    /// Tag name of stream instruction elements.
    pub stream_tag: String,

    /// Attribute that disables interception when set to `"false"`.
    pub opt_out_attribute: String,

    /// Attribute carrying a method override on links and forms.
    pub method_attribute: String,

    /// Attribute requesting a stream-patch response.
    pub stream_attribute: String,

    /// Form field used to tunnel non-native methods over POST.
    pub method_param: String,

    /// Meta tag whose content names the CSRF cookie.
    pub csrf_param_meta: String,

    /// Meta tag whose content is the CSRF token itself.
    pub csrf_token_meta: String,

    /// Request header carrying the CSRF token.
    pub csrf_header: String,

    /// Snapshot the page before stream-scoped submissions too.
    pub capture_stream_submissions: bool,

    /// Maximum redirect hops followed by a single navigation.
    pub max_redirects: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            frame_tag: "turbo-frame".to_string(),
            stream_tag: "turbo-stream".to_string(),
            opt_out_attribute: "data-turbo".to_string(),
            method_attribute: "data-turbo-method".to_string(),
            stream_attribute: "data-turbo-stream".to_string(),
            method_param: "_method".to_string(),
            csrf_param_meta: "csrf-param".to_string(),
            csrf_token_meta: "csrf-token".to_string(),
            csrf_header: "X-CSRF-Token".to_string(),
            capture_stream_submissions: false,
            max_redirects: DEFAULT_MAX_REDIRECTS,
        }
    }
}

// ============================================================================
// Constructors
// ============================================================================

impl Config {
    /// Creates a configuration with default settings.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a configuration from JSON and validates it.
    ///
    /// # Errors
    ///
    /// - [`Error::Json`] if the document is not valid JSON for this type
    /// - [`Error::Config`] if a value is invalid
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}

// ============================================================================
// Builder Methods
// ============================================================================

impl Config {
    /// Sets the frame element tag name.
    #[inline]
    #[must_use]
    pub fn with_frame_tag(mut self, tag: impl Into<String>) -> Self {
        self.frame_tag = tag.into().to_ascii_lowercase();
        self
    }

    /// Sets the stream instruction tag name.
    #[inline]
    #[must_use]
    pub fn with_stream_tag(mut self, tag: impl Into<String>) -> Self {
        self.stream_tag = tag.into().to_ascii_lowercase();
        self
    }

    /// Sets the opt-out attribute name.
    #[inline]
    #[must_use]
    pub fn with_opt_out_attribute(mut self, name: impl Into<String>) -> Self {
        self.opt_out_attribute = name.into();
        self
    }

    /// Sets the method override attribute name.
    #[inline]
    #[must_use]
    pub fn with_method_attribute(mut self, name: impl Into<String>) -> Self {
        self.method_attribute = name.into();
        self
    }

    /// Sets the stream flag attribute name.
    #[inline]
    #[must_use]
    pub fn with_stream_attribute(mut self, name: impl Into<String>) -> Self {
        self.stream_attribute = name.into();
        self
    }

    /// Sets the method override form field name.
    #[inline]
    #[must_use]
    pub fn with_method_param(mut self, name: impl Into<String>) -> Self {
        self.method_param = name.into();
        self
    }

    /// Sets the CSRF meta tag names (cookie-name meta, token meta).
    #[inline]
    #[must_use]
    pub fn with_csrf_meta(mut self, param: impl Into<String>, token: impl Into<String>) -> Self {
        self.csrf_param_meta = param.into();
        self.csrf_token_meta = token.into();
        self
    }

    /// Sets the CSRF request header name.
    #[inline]
    #[must_use]
    pub fn with_csrf_header(mut self, name: impl Into<String>) -> Self {
        self.csrf_header = name.into();
        self
    }

    /// Enables or disables pre-capture for stream-scoped submissions.
    #[inline]
    #[must_use]
    pub fn with_capture_stream_submissions(mut self, enabled: bool) -> Self {
        self.capture_stream_submissions = enabled;
        self
    }

    /// Sets the redirect limit.
    #[inline]
    #[must_use]
    pub fn with_max_redirects(mut self, limit: usize) -> Self {
        self.max_redirects = limit;
        self
    }
}

// ============================================================================
// Validation
// ============================================================================

impl Config {
    /// Checks that every configured name is usable.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] naming the first empty field.
    pub fn validate(&self) -> Result<()> {
        let names = [
            ("frameTag", &self.frame_tag),
            ("streamTag", &self.stream_tag),
            ("optOutAttribute", &self.opt_out_attribute),
            ("methodAttribute", &self.method_attribute),
            ("streamAttribute", &self.stream_attribute),
            ("methodParam", &self.method_param),
            ("csrfParamMeta", &self.csrf_param_meta),
            ("csrfTokenMeta", &self.csrf_token_meta),
            ("csrfHeader", &self.csrf_header),
        ];

        for (field, value) in names {
            if value.trim().is_empty() {
                return Err(Error::config(format!("{field} must not be empty")));
            }
        }

        if self.frame_tag.eq_ignore_ascii_case(&self.stream_tag) {
            return Err(Error::config("frameTag and streamTag must differ"));
        }

        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_names() {
        let config = Config::default();
        assert_eq!(config.frame_tag, "turbo-frame");
        assert_eq!(config.stream_tag, "turbo-stream");
        assert_eq!(config.method_param, "_method");
        assert_eq!(config.max_redirects, 20);
        assert!(!config.capture_stream_submissions);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_methods() {
        let config = Config::new()
            .with_frame_tag("X-Frame")
            .with_capture_stream_submissions(true)
            .with_max_redirects(3);

        assert_eq!(config.frame_tag, "x-frame");
        assert!(config.capture_stream_submissions);
        assert_eq!(config.max_redirects, 3);
    }

    #[test]
    fn test_from_json_keeps_defaults() {
        let config = Config::from_json(r#"{ "maxRedirects": 4, "methodParam": "_verb" }"#).unwrap();
        assert_eq!(config.max_redirects, 4);
        assert_eq!(config.method_param, "_verb");
        assert_eq!(config.frame_tag, "turbo-frame");
    }

    #[test]
    fn test_from_json_rejects_empty_names() {
        let err = Config::from_json(r#"{ "frameTag": "" }"#).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn test_from_json_rejects_bad_json() {
        let err = Config::from_json("{ nope").unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn test_same_frame_and_stream_tag_is_invalid() {
        let config = Config::new().with_stream_tag("turbo-frame");
        assert!(config.validate().is_err());
    }
}
