//! Error types for the adapter and its collaborators.
//!
//! Configuration errors ([`AdapterError`]) are returned synchronously when a
//! service method is misused. Transport failures ([`TransportError`]) travel
//! through the pending call unchanged; the adapter never wraps them.

/// Boxed error for transport failures that have no dedicated variant.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Configuration error raised by the adapter itself.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum AdapterError {
    /// No transport hook resolved a transport and the adapter has no default.
    #[error(
        "no transport for method '{method}': the adapter has no default transport \
         and no transport handler selected one"
    )]
    NoTransport {
        /// The service method being invoked.
        method: String,
    },

    /// A service method lookup named a method the interface does not declare.
    #[error("service '{service}' has no method '{name}'")]
    UnknownMethod {
        /// Interface name of the service.
        service: String,
        /// The requested method name.
        name: String,
    },
}

/// Failure reported by a transport.
///
/// Opaque to the adapter: whatever a transport returns is handed back to the
/// caller of the service method as-is.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum TransportError {
    /// The server answered with a non-success status.
    #[error("request to {url} failed with status {status}")]
    Status {
        /// Requested URL.
        url: String,
        /// Response status.
        status: http::StatusCode,
        /// Response body text (possibly empty).
        body: String,
    },

    /// The response body is not valid JSON.
    #[error("failed to decode response from {url}: {source}")]
    Decode {
        /// Requested URL.
        url: String,
        /// Underlying JSON error.
        source: serde_json::Error,
    },

    /// The selected parser rejected the response.
    #[error("failed to parse response from {url}: {source}")]
    Parse {
        /// Requested URL.
        url: String,
        /// Parser error.
        source: ParseError,
    },

    /// Any other transport failure (connection, timeout, ...).
    #[error(transparent)]
    Other(BoxError),
}

impl TransportError {
    /// Wrap an arbitrary error as [`TransportError::Other`].
    pub fn other(error: impl Into<BoxError>) -> Self {
        Self::Other(error.into())
    }
}

/// Error returned by a [`Parser`](crate::Parser).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ParseError {
    /// None of the declared types accepted the value.
    #[error("value matches none of the declared types: {}", .tried.join(", "))]
    NoMatchingType {
        /// Names of the types that were tried, in order.
        tried: Vec<&'static str>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Errors cross task boundaries with the pending call.
    const _: () = {
        const fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<AdapterError>();
        assert_send_sync::<TransportError>();
        assert_send_sync::<ParseError>();
    };

    #[test]
    fn no_transport_message() {
        let err = AdapterError::NoTransport {
            method: "getList".to_string(),
        };
        assert!(err.to_string().starts_with("no transport for method 'getList'"));
    }

    #[test]
    fn status_message() {
        let err = TransportError::Status {
            url: "http://endpoint.com/getListApi".to_string(),
            status: http::StatusCode::NOT_FOUND,
            body: String::new(),
        };
        assert_eq!(
            err.to_string(),
            "request to http://endpoint.com/getListApi failed with status 404 Not Found",
        );
    }

    #[test]
    fn other_is_transparent() {
        let err = TransportError::other("connection reset");
        assert_eq!(err.to_string(), "connection reset");
    }

    #[test]
    fn parse_error_lists_tried_types() {
        let err = ParseError::NoMatchingType {
            tried: vec!["a::Item", "a::Count"],
        };
        assert_eq!(
            err.to_string(),
            "value matches none of the declared types: a::Item, a::Count",
        );
    }
}
