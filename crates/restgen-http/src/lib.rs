#![doc = include_str!("../README.md")]
//!
//! ---
//!
//! ## API Reference

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod cache;
mod client;
mod config;
mod error;

pub use cache::{MemCacheProvider, MemCacheTransport};
pub use client::{HttpTransport, DEFAULT_JSONP_CALLBACK};
pub use config::{CacheConfig, ClientConfig, InterfaceFile, MethodEntry};
pub use error::{ConfigError, Result};
