//! The closed set of verbs a service method can dispatch on.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::DescriptorError;

/// Verb of a declared service method.
///
/// Each variant maps onto exactly one transport entry point. `Jsonp` and
/// `Multipart` are not HTTP methods of their own; see [`Verb::http_method`]
/// for the request method they travel as.
///
/// # Examples
///
/// ```
/// use restgen_core::Verb;
///
/// let verb: Verb = "post".parse().unwrap();
/// assert_eq!(verb, Verb::Post);
/// assert!(verb.has_body());
/// assert_eq!(verb.as_str(), "POST");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verb {
    /// `transport.get(url, parser)`
    Get,
    /// `transport.post(url, body, parser)`
    Post,
    /// `transport.put(url, body, parser)`
    Put,
    /// `transport.delete(url, parser)`
    Delete,
    /// `transport.jsonp(url, parser)`
    Jsonp,
    /// `transport.multipart(url, body, parser)`
    Multipart,
}

impl Verb {
    /// Every supported verb, in declaration order.
    pub const ALL: [Self; 6] = [
        Self::Get,
        Self::Post,
        Self::Put,
        Self::Delete,
        Self::Jsonp,
        Self::Multipart,
    ];

    /// Canonical upper-case name (e.g., `"GET"`, `"MULTIPART"`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Jsonp => "JSONP",
            Self::Multipart => "MULTIPART",
        }
    }

    /// Whether the verb carries a request body slot after the URL arguments.
    #[must_use]
    pub const fn has_body(self) -> bool {
        matches!(self, Self::Post | Self::Put | Self::Multipart)
    }

    /// HTTP request method used on the wire.
    ///
    /// JSONP is fetched with `GET`; multipart uploads are sent with `POST`.
    #[must_use]
    pub fn http_method(self) -> http::Method {
        match self {
            Self::Get | Self::Jsonp => http::Method::GET,
            Self::Post | Self::Multipart => http::Method::POST,
            Self::Put => http::Method::PUT,
            Self::Delete => http::Method::DELETE,
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Verb {
    type Err = DescriptorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|verb| verb.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DescriptorError::UnknownVerb {
                verb: s.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("GET".parse::<Verb>().unwrap(), Verb::Get);
        assert_eq!("delete".parse::<Verb>().unwrap(), Verb::Delete);
        assert_eq!(" Multipart ".parse::<Verb>().unwrap(), Verb::Multipart);
    }

    #[test]
    fn parse_rejects_unknown_verb() {
        let err = "PATCH".parse::<Verb>().unwrap_err();
        assert!(
            matches!(err, DescriptorError::UnknownVerb { ref verb } if verb == "PATCH"),
            "unexpected error: {err}",
        );
    }

    #[test]
    fn display_round_trips_through_parse() {
        for verb in Verb::ALL {
            assert_eq!(verb.to_string().parse::<Verb>().unwrap(), verb);
        }
    }

    #[test]
    fn body_verbs() {
        let with_body: Vec<Verb> = Verb::ALL.into_iter().filter(|v| v.has_body()).collect();
        assert_eq!(with_body, vec![Verb::Post, Verb::Put, Verb::Multipart]);
    }

    #[test]
    fn wire_methods() {
        assert_eq!(Verb::Jsonp.http_method(), http::Method::GET);
        assert_eq!(Verb::Multipart.http_method(), http::Method::POST);
        assert_eq!(Verb::Put.http_method(), http::Method::PUT);
        assert_eq!(Verb::Delete.http_method(), http::Method::DELETE);
    }

    #[test]
    fn deserializes_upper_case_names() {
        let verb: Verb = serde_json::from_str("\"JSONP\"").unwrap();
        assert_eq!(verb, Verb::Jsonp);
    }
}
