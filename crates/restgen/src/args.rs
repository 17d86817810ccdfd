//! Positional call arguments.

use serde_json::Value;

/// Positional arguments of one service method call.
///
/// Each slot is either a JSON value or undefined. The first `k` slots fill
/// the URL template's `k` placeholders; for body verbs, slot `k` is the
/// request body. Later slots are ignored.
///
/// Use the [`args!`](crate::args!) macro for the common case, and
/// [`Args::missing`] to leave a placeholder empty while still passing later
/// arguments.
///
/// ```
/// use restgen::{args, Args};
///
/// let a = args![55, "couch"];
/// assert_eq!(a.len(), 2);
///
/// let b = Args::new().arg(10).missing().arg("foo");
/// assert!(b.get(1).is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Args(Vec<Option<Value>>);

impl Args {
    /// No arguments.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Append a defined argument.
    #[must_use]
    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.0.push(Some(value.into()));
        self
    }

    /// Append an undefined argument.
    #[must_use]
    pub fn missing(mut self) -> Self {
        self.0.push(None);
        self
    }

    /// Number of slots, defined or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no slots were passed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The value at `index`, if passed and defined.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.0.get(index).and_then(Option::as_ref)
    }

    /// URL text for the first `count` slots, padded with `None`.
    pub(crate) fn url_segments(&self, count: usize) -> Vec<Option<String>> {
        (0..count).map(|i| self.get(i).map(url_text)).collect()
    }

    /// Take the body slot at `index`, if defined.
    pub(crate) fn into_body(mut self, index: usize) -> Option<Value> {
        if index < self.0.len() {
            self.0.swap_remove(index)
        } else {
            None
        }
    }
}

impl From<Vec<Option<Value>>> for Args {
    fn from(slots: Vec<Option<Value>>) -> Self {
        Self(slots)
    }
}

impl From<Vec<Value>> for Args {
    fn from(values: Vec<Value>) -> Self {
        Self(values.into_iter().map(Some).collect())
    }
}

impl FromIterator<Option<Value>> for Args {
    fn from_iter<I: IntoIterator<Item = Option<Value>>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Text substituted into a URL for a defined argument.
///
/// Strings are inserted verbatim; every other value uses its compact JSON
/// form, so `0`, `false` and `null` keep their literal text and arrays keep
/// their brackets (`[1,2]`, not `1,2`).
fn url_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Build [`Args`] from a list of expressions convertible into
/// [`serde_json::Value`].
///
/// ```
/// use restgen::args;
/// use serde_json::json;
///
/// let a = args![60, json!({"description": "test list"})];
/// assert_eq!(a.get(0), Some(&json!(60)));
/// assert!(args![].is_empty());
/// ```
#[macro_export]
macro_rules! args {
    () => {
        $crate::Args::new()
    };
    ($($arg:expr),+ $(,)?) => {
        $crate::Args::new()$(.arg($arg))+
    };
}
