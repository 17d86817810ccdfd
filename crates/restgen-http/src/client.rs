//! reqwest-backed transport.

use futures::FutureExt as _;
use reqwest::multipart::Form;
use reqwest::RequestBuilder;
use restgen::{Reply, SharedParser, Transport, TransportError, Verb};
use serde_json::Value;

/// Default JSONP callback parameter value.
pub const DEFAULT_JSONP_CALLBACK: &str = "callback";

/// Transport performing real HTTP requests with [`reqwest`].
///
/// - `GET` / `DELETE` send no body.
/// - `POST` / `PUT` send the body as JSON when one is given.
/// - `MULTIPART` posts a form: each member of a JSON object body becomes a
///   text part (strings verbatim, other values as JSON text); any other body
///   is sent as a single `body` part.
/// - `JSONP` issues a `GET` with `callback=<name>` appended and unwraps
///   `name(...)` from the response.
///
/// Requests are sent when the returned [`Reply`] is first polled.
///
/// Non-success statuses fail with [`TransportError::Status`]. An empty
/// response body decodes as `null`. When a parser is passed it is applied to
/// the decoded value.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    jsonp_callback: String,
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::with_client(reqwest::Client::new())
    }
}

impl HttpTransport {
    /// Transport over a default [`reqwest::Client`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Transport over a preconfigured client.
    #[must_use]
    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            client,
            jsonp_callback: DEFAULT_JSONP_CALLBACK.to_string(),
        }
    }

    /// Set the JSONP callback name (default: `"callback"`).
    #[must_use]
    pub fn jsonp_callback(mut self, name: &str) -> Self {
        self.jsonp_callback = name.to_string();
        self
    }

    /// Request for `verb`, sent to `target` (which differs from `url` only
    /// for JSONP).
    fn request(&self, verb: Verb, target: &str) -> RequestBuilder {
        self.client.request(verb.http_method(), target)
    }

    fn send(
        &self,
        verb: Verb,
        url: String,
        request: RequestBuilder,
        parser: Option<SharedParser>,
        jsonp: Option<String>,
    ) -> Reply {
        tracing::debug!(%verb, method = %verb.http_method(), %url, "sending request");

        async move {
            let response = request.send().await.map_err(TransportError::other)?;
            let status = response.status();
            let text = response.text().await.map_err(TransportError::other)?;

            if !status.is_success() {
                tracing::warn!(%verb, %url, %status, "request failed");
                return Err(TransportError::Status {
                    url,
                    status,
                    body: text,
                });
            }

            let payload = match &jsonp {
                Some(callback) => unwrap_jsonp(&text, callback),
                None => text.as_str(),
            };
            let value = decode(&url, payload)?;
            apply_parser(url, value, parser.as_ref())
        }
        .boxed()
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: String, parser: Option<SharedParser>) -> Reply {
        let request = self.request(Verb::Get, &url);
        self.send(Verb::Get, url, request, parser, None)
    }

    fn post(&self, url: String, body: Option<Value>, parser: Option<SharedParser>) -> Reply {
        let request = with_json(self.request(Verb::Post, &url), body.as_ref());
        self.send(Verb::Post, url, request, parser, None)
    }

    fn put(&self, url: String, body: Option<Value>, parser: Option<SharedParser>) -> Reply {
        let request = with_json(self.request(Verb::Put, &url), body.as_ref());
        self.send(Verb::Put, url, request, parser, None)
    }

    fn delete(&self, url: String, parser: Option<SharedParser>) -> Reply {
        let request = self.request(Verb::Delete, &url);
        self.send(Verb::Delete, url, request, parser, None)
    }

    fn jsonp(&self, url: String, parser: Option<SharedParser>) -> Reply {
        let callback = self.jsonp_callback.clone();
        let request = self.request(Verb::Jsonp, &append_query(&url, "callback", &callback));
        self.send(Verb::Jsonp, url, request, parser, Some(callback))
    }

    fn multipart(&self, url: String, body: Option<Value>, parser: Option<SharedParser>) -> Reply {
        let request = self.request(Verb::Multipart, &url).multipart(multipart_form(body));
        self.send(Verb::Multipart, url, request, parser, None)
    }
}

/// Run `parser` over a decoded response, reporting rejections against `url`.
pub(crate) fn apply_parser(
    url: String,
    value: Value,
    parser: Option<&SharedParser>,
) -> Result<Value, TransportError> {
    match parser {
        Some(parser) => parser
            .parse(value)
            .map_err(|source| TransportError::Parse { url, source }),
        None => Ok(value),
    }
}

fn with_json(request: RequestBuilder, body: Option<&Value>) -> RequestBuilder {
    match body {
        Some(body) => request.json(body),
        None => request,
    }
}

/// Decode a response body, treating blank text as `null`.
fn decode(url: &str, text: &str) -> Result<Value, TransportError> {
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(text).map_err(|source| TransportError::Decode {
        url: url.to_string(),
        source,
    })
}

/// Append `key=value` to a URL's query string.
pub(crate) fn append_query(url: &str, key: &str, value: &str) -> String {
    let separator = if url.ends_with('?') || url.ends_with('&') {
        ""
    } else if url.contains('?') {
        "&"
    } else {
        "?"
    };
    format!("{url}{separator}{key}={value}")
}

/// Strip a `callback(...)` wrapper; text without one is returned as-is.
pub(crate) fn unwrap_jsonp<'a>(text: &'a str, callback: &str) -> &'a str {
    let trimmed = text.trim();
    let trimmed = trimmed.strip_prefix("/**/").unwrap_or(trimmed).trim_start();

    trimmed
        .strip_prefix(callback)
        .map(str::trim_start)
        .and_then(|rest| rest.strip_prefix('('))
        .and_then(|rest| rest.trim_end().trim_end_matches(';').trim_end().strip_suffix(')'))
        .unwrap_or(text)
}

fn multipart_form(body: Option<Value>) -> Form {
    match body {
        Some(Value::Object(fields)) => fields
            .into_iter()
            .fold(Form::new(), |form, (name, value)| form.text(name, part_text(value))),
        Some(other) => Form::new().text("body", part_text(other)),
        None => Form::new(),
    }
}

fn part_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    #[test]
    fn append_query_picks_separator() {
        assert_eq!(append_query("a", "callback", "cb"), "a?callback=cb");
        assert_eq!(append_query("a?x=1", "callback", "cb"), "a?x=1&callback=cb");
        assert_eq!(append_query("a?", "callback", "cb"), "a?callback=cb");
        assert_eq!(append_query("a?x=1&", "callback", "cb"), "a?x=1&callback=cb");
    }

    #[test]
    fn unwrap_jsonp_variants() {
        assert_eq!(unwrap_jsonp(r#"cb({"a":1})"#, "cb"), r#"{"a":1}"#);
        assert_eq!(unwrap_jsonp("cb ( [1] );\n", "cb"), " [1] ");
        assert_eq!(unwrap_jsonp("/**/cb(2)", "cb"), "2");
        assert_eq!(unwrap_jsonp(r#"{"plain":true}"#, "cb"), r#"{"plain":true}"#);
        assert_eq!(unwrap_jsonp("other(1)", "cb"), "other(1)");
    }

    #[test]
    fn decode_blank_is_null() {
        assert_eq!(decode("u", "").unwrap(), Value::Null);
        assert_eq!(decode("u", "  \n").unwrap(), Value::Null);
        assert_eq!(decode("u", "[1]").unwrap(), serde_json::json!([1]));
    }

    #[test]
    fn decode_reports_url() {
        let err = decode("http://x/y", "not json").unwrap_err();
        assert!(
            matches!(err, TransportError::Decode { ref url, .. } if url == "http://x/y"),
            "unexpected error: {err:?}",
        );
    }

    #[test]
    fn requests_use_the_verb_http_method() {
        let transport = HttpTransport::new();
        let cases = [
            (Verb::Get, "GET"),
            (Verb::Post, "POST"),
            (Verb::Put, "PUT"),
            (Verb::Delete, "DELETE"),
            (Verb::Jsonp, "GET"),
            (Verb::Multipart, "POST"),
        ];
        for (verb, method) in cases {
            let request = transport.request(verb, "http://x/y").build().unwrap();
            assert_eq!(request.method().as_str(), method, "{verb}");
        }
    }

    #[test]
    fn apply_parser_reports_rejections_against_url() {
        use restgen::{StrictParser, TypeRef};

        #[derive(serde::Serialize, serde::Deserialize)]
        struct Item {
            id: u32,
        }

        let strict: SharedParser = Arc::new(StrictParser::new(vec![TypeRef::of::<Item>()]));
        let err = apply_parser("u".to_string(), serde_json::json!("text"), Some(&strict)).unwrap_err();
        assert!(
            matches!(err, TransportError::Parse { ref url, .. } if url == "u"),
            "unexpected error: {err:?}",
        );
        assert_eq!(
            apply_parser("u".to_string(), serde_json::json!(1), None).unwrap(),
            serde_json::json!(1)
        );
    }

    #[test]
    fn part_text_keeps_strings_verbatim() {
        assert_eq!(part_text(Value::from("a b")), "a b");
        assert_eq!(part_text(serde_json::json!({"k": 1})), r#"{"k":1}"#);
    }
}
