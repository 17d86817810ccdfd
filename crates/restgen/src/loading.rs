//! Loading flag and the pending-call future that maintains it.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};

use futures::FutureExt as _;
use serde_json::Value;

use crate::error::TransportError;
use crate::transport::Reply;

/// Count of outstanding calls on one service method.
///
/// The method is loading while the count is non-zero, so overlapping calls
/// keep it loading until the last one settles.
#[derive(Debug, Clone, Default)]
pub(crate) struct LoadingFlag(Arc<AtomicUsize>);

impl LoadingFlag {
    pub(crate) fn is_loading(&self) -> bool {
        self.0.load(Ordering::Acquire) > 0
    }

    /// Mark one call as outstanding until the guard drops.
    pub(crate) fn begin(&self) -> LoadingGuard {
        self.0.fetch_add(1, Ordering::AcqRel);
        LoadingGuard(Arc::clone(&self.0))
    }
}

#[derive(Debug)]
pub(crate) struct LoadingGuard(Arc<AtomicUsize>);

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::AcqRel);
    }
}

/// Eventual result of a service method call.
///
/// Resolves to exactly what the transport produced. The owning method stays
/// loading until this future completes or is dropped.
#[must_use = "a pending call does nothing observable unless awaited"]
pub struct PendingCall {
    method: Arc<str>,
    url: String,
    reply: Reply,
    guard: Option<LoadingGuard>,
}

impl PendingCall {
    pub(crate) fn new(method: Arc<str>, url: String, reply: Reply, guard: LoadingGuard) -> Self {
        Self {
            method,
            url,
            reply,
            guard: Some(guard),
        }
    }

    /// Name of the service method that issued the call.
    #[must_use]
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Resolved URL the call was issued to.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Whether the call has settled.
    #[must_use]
    pub const fn is_settled(&self) -> bool {
        self.guard.is_none()
    }
}

impl Future for PendingCall {
    type Output = Result<Value, TransportError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        let result = std::task::ready!(this.reply.poll_unpin(cx));
        this.guard = None;

        match &result {
            Ok(_) => tracing::trace!(method = %this.method, url = %this.url, "call settled"),
            Err(err) => {
                tracing::debug!(method = %this.method, url = %this.url, error = %err, "call failed");
            }
        }

        Poll::Ready(result)
    }
}

impl fmt::Debug for PendingCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingCall")
            .field("method", &self.method)
            .field("url", &self.url)
            .field("settled", &self.is_settled())
            .finish_non_exhaustive()
    }
}
