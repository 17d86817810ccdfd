//! The transport collaborator: one entry point per verb.

use std::sync::Arc;

use futures::future::BoxFuture;
use serde_json::Value;

use crate::error::TransportError;
use crate::parser::SharedParser;

/// Eventual result of a transport call.
///
/// Transports may issue the request when the entry point is invoked or when
/// the reply is first polled.
pub type Reply = BoxFuture<'static, Result<Value, TransportError>>;

/// Performs the network call for each verb.
///
/// Entry points are invoked synchronously by the adapter, before the service
/// method returns. Whether the request leaves then or when the [`Reply`] is
/// first polled is up to the transport. The adapter passes
/// the parser it selected, possibly `None`; interpreting it is up to the
/// transport.
///
/// Body verbs receive `None` when the caller passed no body argument.
pub trait Transport: Send + Sync {
    /// `GET url`
    fn get(&self, url: String, parser: Option<SharedParser>) -> Reply;

    /// `POST url` with an optional body.
    fn post(&self, url: String, body: Option<Value>, parser: Option<SharedParser>) -> Reply;

    /// `PUT url` with an optional body.
    fn put(&self, url: String, body: Option<Value>, parser: Option<SharedParser>) -> Reply;

    /// `DELETE url`
    fn delete(&self, url: String, parser: Option<SharedParser>) -> Reply;

    /// JSONP fetch of `url`.
    fn jsonp(&self, url: String, parser: Option<SharedParser>) -> Reply;

    /// Multipart upload to `url` with an optional body.
    fn multipart(&self, url: String, body: Option<Value>, parser: Option<SharedParser>) -> Reply;
}

/// Shared handle to a transport.
pub type SharedTransport = Arc<dyn Transport>;

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn get(&self, url: String, parser: Option<SharedParser>) -> Reply {
        (**self).get(url, parser)
    }

    fn post(&self, url: String, body: Option<Value>, parser: Option<SharedParser>) -> Reply {
        (**self).post(url, body, parser)
    }

    fn put(&self, url: String, body: Option<Value>, parser: Option<SharedParser>) -> Reply {
        (**self).put(url, body, parser)
    }

    fn delete(&self, url: String, parser: Option<SharedParser>) -> Reply {
        (**self).delete(url, parser)
    }

    fn jsonp(&self, url: String, parser: Option<SharedParser>) -> Reply {
        (**self).jsonp(url, parser)
    }

    fn multipart(&self, url: String, body: Option<Value>, parser: Option<SharedParser>) -> Reply {
        (**self).multipart(url, body, parser)
    }
}
