//! Error types for regls
//!
//! Every registry lookup, decode step and configuration load reports failures
//! through [`RegistryError`]. Variants map one-to-one onto the ways a lookup
//! can fail, so callers can decide per kind whether to abort or skip.

use thiserror::Error;


/// Main error type for regls operations
#[derive(Error, Debug)]
pub enum RegistryError {
    /// A required argument (such as the registry URL) was not supplied
    #[error("Missing required argument: {name}")]
    MissingArgument { name: String },

    /// Network-level failures (DNS, connection refused, TLS, broken body)
    #[error("Transport error: {message}")]
    Transport {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The request did not complete within the configured timeout
    #[error("Request to {url} timed out after {seconds} seconds")]
    Timeout { url: String, seconds: u64 },

    /// The registry answered with a non-2xx status
    #[error("HTTP {status_code} from {url}: {body}")]
    HttpStatus {
        status_code: u16,
        url: String,
        body: String,
    },

    /// The response body was not the JSON shape we expected
    #[error("Decode error: {message}")]
    Decode {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A creation timestamp is not RFC3339
    #[error("Invalid timestamp '{value}'")]
    TimeParse {
        value: String,
        #[source]
        source: Option<chrono::ParseError>,
    },

    /// Configuration errors (invalid config file, bad override)
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        path: Option<String>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A resolution task panicked or was cancelled before finishing
    #[error("Task failed: {message}")]
    Task { message: String },
}

/// Result type alias for regls operations
pub type Result<T> = std::result::Result<T, RegistryError>;

impl RegistryError {
    /// Creates a new missing argument error.
    ///
    /// # Examples
    ///
    /// ```
    /// use libregls::error::RegistryError;
    ///
    /// let err = RegistryError::missing_argument("url");
    /// assert_eq!(err.to_string(), "Missing required argument: url");
    /// ```
    pub fn missing_argument<S: Into<String>>(name: S) -> Self {
        Self::MissingArgument { name: name.into() }
    }

    /// Creates a new transport error.
    pub fn transport<S: Into<String>>(message: S) -> Self {
        Self::Transport {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a new transport error with a source error.
    ///
    /// # Examples
    ///
    /// ```
    /// use libregls::error::RegistryError;
    /// use std::io;
    ///
    /// let io_err = io::Error::new(io::ErrorKind::ConnectionRefused, "connection refused");
    /// let err = RegistryError::transport_with_source("failed to connect", io_err);
    /// assert!(matches!(err, RegistryError::Transport { .. }));
    /// ```
    pub fn transport_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Transport {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a new timeout error.
    pub fn timeout<S: Into<String>>(url: S, seconds: u64) -> Self {
        Self::Timeout {
            url: url.into(),
            seconds,
        }
    }

    /// Creates a new HTTP status error.
    ///
    /// # Examples
    ///
    /// ```
    /// use libregls::error::RegistryError;
    ///
    /// let err = RegistryError::http_status(404, "http://localhost:5000/v2/x/tags/list", "");
    /// assert_eq!(err.status_code(), Some(404));
    /// ```
    pub fn http_status<U, B>(status_code: u16, url: U, body: B) -> Self
    where
        U: Into<String>,
        B: Into<String>,
    {
        Self::HttpStatus {
            status_code,
            url: url.into(),
            body: body.into(),
        }
    }

    /// Creates a new decode error.
    pub fn decode<S: Into<String>>(message: S) -> Self {
        Self::Decode {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a new decode error with a source error.
    pub fn decode_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Decode {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a new timestamp parse error.
    pub fn time_parse<S: Into<String>>(value: S, source: chrono::ParseError) -> Self {
        Self::TimeParse {
            value: value.into(),
            source: Some(source),
        }
    }

    /// Creates a new configuration error.
    ///
    /// # Examples
    ///
    /// ```
    /// use libregls::error::RegistryError;
    ///
    /// let err = RegistryError::config("invalid config file", Some("/path/to/config.yaml"));
    /// assert!(matches!(err, RegistryError::Config { .. }));
    /// ```
    pub fn config<S: Into<String>>(message: S, path: Option<S>) -> Self {
        Self::Config {
            message: message.into(),
            path: path.map(|p| p.into()),
            source: None,
        }
    }

    /// Creates a new configuration error with a source error.
    pub fn config_with_source<S, E>(message: S, path: Option<S>, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Config {
            message: message.into(),
            path: path.map(|p| p.into()),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a new task failure error.
    pub fn task<S: Into<String>>(message: S) -> Self {
        Self::Task {
            message: message.into(),
        }
    }

    /// Returns the HTTP status code for [`RegistryError::HttpStatus`] errors.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }

    /// Returns true when the error came from the network rather than from
    /// the content the registry returned.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::Timeout { .. })
    }
}

impl From<config::ConfigError> for RegistryError {
    fn from(err: config::ConfigError) -> Self {
        RegistryError::config_with_source("Failed to build configuration", None, err)
    }
}
