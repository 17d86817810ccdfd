#![doc = include_str!("../README.md")]
//!
//! ---
//!
//! ## API Reference
//!
//! # Types
//!
//! - [`Adapter`]: Holds the endpoint prefix, resolution handlers and default transport
//! - [`Service`] / [`ServiceMethod`]: Synthesized services and their callable methods
//! - [`PendingCall`]: Eventual result of a call; keeps the method loading until it settles
//! - [`Transport`]: The per-verb network collaborator
//! - [`Parser`] / [`LenientParser`] / [`StrictParser`]: Response parsers
//! - [`Choice`]: Outcome of a resolution handler
//! - [`Args`] / [`args!`]: Positional call arguments
//!
//! The descriptor model from `restgen-core` is re-exported at the crate root.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod adapter;
mod args;
mod error;
mod hooks;
mod loading;
mod parser;
mod service;
mod transport;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use adapter::Adapter;
pub use args::Args;
pub use error::{AdapterError, BoxError, ParseError, TransportError};
pub use hooks::Choice;
pub use loading::PendingCall;
pub use parser::{default_parser, LenientParser, Parser, ParserKind, SharedParser, StrictParser};
pub use service::{Service, ServiceMethod};
pub use transport::{Reply, SharedTransport, Transport};

pub use restgen_core::{
    resolve, DescriptorError, Interface, InterfaceBuilder, MethodDescriptor, RestInterface,
    ResultType, TypeRef, UrlTemplate, Verb,
};
