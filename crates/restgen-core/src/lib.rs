#![doc = include_str!("../README.md")]
//!
//! ---
//!
//! ## API Reference
//!
//! - [`Verb`]: The closed set of dispatch verbs
//! - [`UrlTemplate`] / [`resolve`]: Positional `${}` URL templates
//! - [`TypeRef`] / [`ResultType`]: Result type annotations
//! - [`MethodDescriptor`]: Immutable verb + template + result type record
//! - [`Interface`] / [`RestInterface`]: Ordered registries of named descriptors

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod descriptor;
mod error;
mod interface;
mod template;
mod verb;

pub use descriptor::{MethodDescriptor, ResultType, TypeRef};
pub use error::DescriptorError;
pub use interface::{Interface, InterfaceBuilder, RestInterface};
pub use template::{resolve, UrlTemplate};
pub use verb::Verb;
