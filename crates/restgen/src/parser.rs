//! Response parsers and default parser selection.
//!
//! The adapter treats parsers as opaque: it selects one per call and hands it
//! to the transport, which applies it to the decoded response.

use std::fmt;
use std::sync::Arc;

use restgen_core::{ResultType, TypeRef};
use serde_json::Value;

use crate::error::ParseError;

/// Shared handle to a parser, as passed to transports.
pub type SharedParser = Arc<dyn Parser>;

/// Family a parser belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ParserKind {
    /// [`LenientParser`]
    Lenient,
    /// [`StrictParser`]
    Strict,
    /// A user-defined parser, identified by name.
    Custom(&'static str),
}

/// Turns a decoded JSON response into the value returned to the caller.
pub trait Parser: fmt::Debug + Send + Sync {
    /// Which family this parser belongs to.
    fn kind(&self) -> ParserKind;

    /// Types the parser tries, in order.
    fn types(&self) -> &[TypeRef];

    /// Parse a decoded response.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] when the value is rejected.
    fn parse(&self, value: Value) -> Result<Value, ParseError>;
}

/// Parser that coerces through the first matching type and otherwise
/// returns the value untouched.
///
/// ```
/// use restgen::{LenientParser, Parser};
/// use serde_json::json;
///
/// let parser = LenientParser::new(Vec::new());
/// assert_eq!(parser.parse(json!({"a": 1})).unwrap(), json!({"a": 1}));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LenientParser {
    types: Vec<TypeRef>,
}

impl LenientParser {
    /// Parser trying `types` in order.
    #[must_use]
    pub const fn new(types: Vec<TypeRef>) -> Self {
        Self { types }
    }
}

impl Parser for LenientParser {
    fn kind(&self) -> ParserKind {
        ParserKind::Lenient
    }

    fn types(&self) -> &[TypeRef] {
        &self.types
    }

    fn parse(&self, value: Value) -> Result<Value, ParseError> {
        Ok(first_match(&self.types, &value).unwrap_or(value))
    }
}

/// Parser that requires the value to match one of its types.
///
/// With an empty type list every value is accepted unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrictParser {
    types: Vec<TypeRef>,
}

impl StrictParser {
    /// Parser requiring one of `types`, tried in order.
    #[must_use]
    pub const fn new(types: Vec<TypeRef>) -> Self {
        Self { types }
    }
}

impl Parser for StrictParser {
    fn kind(&self) -> ParserKind {
        ParserKind::Strict
    }

    fn types(&self) -> &[TypeRef] {
        &self.types
    }

    fn parse(&self, value: Value) -> Result<Value, ParseError> {
        if self.types.is_empty() {
            return Ok(value);
        }
        first_match(&self.types, &value).ok_or_else(|| ParseError::NoMatchingType {
            tried: self.types.iter().map(TypeRef::name).collect(),
        })
    }
}

fn first_match(types: &[TypeRef], value: &Value) -> Option<Value> {
    types.iter().find_map(|ty| ty.coerce(value.clone()).ok())
}

/// Parser used when no parser hook makes a choice.
///
/// - no result type → no parser
/// - a single type → [`LenientParser`] over that one type
/// - a list of types → [`LenientParser`] over the list, in order
#[must_use]
pub fn default_parser(result_type: &ResultType) -> Option<SharedParser> {
    if result_type.is_none() {
        return None;
    }
    Some(Arc::new(LenientParser::new(result_type.types().to_vec())))
}
