//! Per-call transport and parser selection hooks.

use std::sync::Arc;

use restgen_core::{MethodDescriptor, ResultType};

use crate::parser::SharedParser;
use crate::transport::SharedTransport;

/// Outcome of a resolution hook.
///
/// `Fallthrough` means "no opinion": the adapter applies its default. It is
/// distinct from every value a hook can select, including `Use(None)` from a
/// parser hook, which forces a call to run without a parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Choice<T> {
    /// Use this value.
    Use(T),
    /// Apply the default resolution.
    Fallthrough,
}

impl<T> Choice<T> {
    /// The chosen value, or `default()` on fallthrough.
    pub fn unwrap_or_else(self, default: impl FnOnce() -> T) -> T {
        match self {
            Self::Use(value) => value,
            Self::Fallthrough => default(),
        }
    }
}

impl<T> From<Option<T>> for Choice<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Fallthrough, Self::Use)
    }
}

/// Selects a transport for `(descriptor, method name)`.
pub(crate) type TransportHook =
    Arc<dyn Fn(&MethodDescriptor, &str) -> Choice<SharedTransport> + Send + Sync>;

/// Selects a parser for `(descriptor, method name, result type)`.
pub(crate) type ParserHook =
    Arc<dyn Fn(&MethodDescriptor, &str, &ResultType) -> Choice<Option<SharedParser>> + Send + Sync>;
