//! Configuration for a [`crate::RestApi`] instance.
//!
//! # Configuration Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `prefix` | `""` | Path prefix for generated routes and `Location` URLs |
//! | `default_callback` | `"callback"` | JSONP wrapper name when no override parameter is present |
//!
//! # Examples
//!
//! ```
//! use restish::ApiConfig;
//!
//! let config = ApiConfig {
//!     prefix: "/v1".to_string(),
//!     ..Default::default()
//! };
//! assert_eq!(config.default_callback, "callback");
//! ```

/// Configuration for route generation and response emission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiConfig {
    /// Path prefix prepended to every generated route and `Location` URL.
    ///
    /// Must be empty or start with `/` and must not end with `/`.
    pub prefix: String,

    /// JSONP wrapper function name used when the JSONP encoder was selected
    /// without an explicit callback parameter (e.g. via the `.js` extension).
    pub default_callback: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            prefix: String::new(),
            default_callback: "callback".to_string(),
        }
    }
}
