//! Test doubles for code built on the adapter.
//!
//! Available with the `test-support` feature.

use std::collections::VecDeque;
use std::fmt;
use std::sync::{Mutex, PoisonError};

use futures::channel::oneshot;
use futures::FutureExt as _;
use restgen_core::Verb;
use serde_json::Value;

use crate::error::TransportError;
use crate::parser::SharedParser;
use crate::transport::{Reply, Transport};

/// One call received by a [`RecordingTransport`].
#[derive(Debug, Clone)]
pub struct RecordedCall {
    /// Entry point that was invoked.
    pub verb: Verb,
    /// URL argument.
    pub url: String,
    /// Body argument (always `None` for bodiless verbs).
    pub body: Option<Value>,
    /// Parser argument.
    pub parser: Option<SharedParser>,
}

enum Scripted {
    Ready(Result<Value, TransportError>),
    Gated(oneshot::Receiver<Result<Value, TransportError>>),
}

/// Transport that records every call and answers from a script.
///
/// Queued replies ([`push_reply`](Self::push_reply), [`gate`](Self::gate))
/// are consumed in call order; once the queue is empty every call succeeds
/// with the default reply (`null` unless changed with
/// [`reply_with`](Self::reply_with)).
#[derive(Default)]
pub struct RecordingTransport {
    calls: Mutex<Vec<RecordedCall>>,
    queue: Mutex<VecDeque<Scripted>>,
    default_reply: Mutex<Value>,
}

impl RecordingTransport {
    /// Transport replying `null` to everything.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Change the default reply.
    #[must_use]
    pub fn reply_with(self, value: Value) -> Self {
        *lock(&self.default_reply) = value;
        self
    }

    /// Queue the outcome of the next unscripted call.
    pub fn push_reply(&self, result: Result<Value, TransportError>) {
        lock(&self.queue).push_back(Scripted::Ready(result));
    }

    /// Queue a reply that stays pending until the returned [`Gate`] is opened.
    #[must_use = "dropping the gate fails the gated call"]
    pub fn gate(&self) -> Gate {
        let (sender, receiver) = oneshot::channel();
        lock(&self.queue).push_back(Scripted::Gated(receiver));
        Gate { sender }
    }

    /// Every recorded call, oldest first.
    #[must_use]
    pub fn calls(&self) -> Vec<RecordedCall> {
        lock(&self.calls).clone()
    }

    /// Recorded calls of one verb, oldest first.
    #[must_use]
    pub fn calls_for(&self, verb: Verb) -> Vec<RecordedCall> {
        lock(&self.calls)
            .iter()
            .filter(|call| call.verb == verb)
            .cloned()
            .collect()
    }

    /// The most recent call.
    #[must_use]
    pub fn last_call(&self) -> Option<RecordedCall> {
        lock(&self.calls).last().cloned()
    }

    fn record(
        &self,
        verb: Verb,
        url: String,
        body: Option<Value>,
        parser: Option<SharedParser>,
    ) -> Reply {
        lock(&self.calls).push(RecordedCall {
            verb,
            url,
            body,
            parser,
        });

        match lock(&self.queue).pop_front() {
            Some(Scripted::Ready(result)) => futures::future::ready(result).boxed(),
            Some(Scripted::Gated(receiver)) => async move {
                receiver
                    .await
                    .unwrap_or_else(|_| Err(TransportError::other("gate dropped before opening")))
            }
            .boxed(),
            None => futures::future::ready(Ok(lock(&self.default_reply).clone())).boxed(),
        }
    }
}

impl Transport for RecordingTransport {
    fn get(&self, url: String, parser: Option<SharedParser>) -> Reply {
        self.record(Verb::Get, url, None, parser)
    }

    fn post(&self, url: String, body: Option<Value>, parser: Option<SharedParser>) -> Reply {
        self.record(Verb::Post, url, body, parser)
    }

    fn put(&self, url: String, body: Option<Value>, parser: Option<SharedParser>) -> Reply {
        self.record(Verb::Put, url, body, parser)
    }

    fn delete(&self, url: String, parser: Option<SharedParser>) -> Reply {
        self.record(Verb::Delete, url, None, parser)
    }

    fn jsonp(&self, url: String, parser: Option<SharedParser>) -> Reply {
        self.record(Verb::Jsonp, url, None, parser)
    }

    fn multipart(&self, url: String, body: Option<Value>, parser: Option<SharedParser>) -> Reply {
        self.record(Verb::Multipart, url, body, parser)
    }
}

impl fmt::Debug for RecordingTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordingTransport")
            .field("calls", &lock(&self.calls).len())
            .field("queued", &lock(&self.queue).len())
            .finish_non_exhaustive()
    }
}

/// Releases a gated reply queued by [`RecordingTransport::gate`].
#[derive(Debug)]
pub struct Gate {
    sender: oneshot::Sender<Result<Value, TransportError>>,
}

impl Gate {
    /// Settle the gated call with `result`.
    pub fn open(self, result: Result<Value, TransportError>) {
        // The call may have been dropped already; nothing is waiting then.
        let _ = self.sender.send(result);
    }

    /// Settle the gated call successfully.
    pub fn succeed(self, value: Value) {
        self.open(Ok(value));
    }

    /// Settle the gated call with a failure.
    pub fn fail(self, error: TransportError) {
        self.open(Err(error));
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
