//! Synthesized services and their methods.

use std::fmt;
use std::ops::Index;
use std::sync::Arc;

use restgen_core::{Interface, MethodDescriptor, Verb};

use crate::adapter::Adapter;
use crate::args::Args;
use crate::error::AdapterError;
use crate::loading::{LoadingFlag, PendingCall};

/// A service synthesized by [`Adapter::create`]: one [`ServiceMethod`] per
/// descriptor of the interface, in declaration order.
///
/// Methods are looked up by name with [`Service::method`] or by indexing.
pub struct Service {
    interface: String,
    methods: Vec<ServiceMethod>,
}

impl Service {
    pub(crate) fn synthesize(adapter: Adapter, interface: &Interface) -> Self {
        let methods = interface
            .methods()
            .map(|(name, descriptor)| ServiceMethod {
                name: Arc::from(name),
                descriptor: Arc::clone(descriptor),
                adapter: adapter.clone(),
                loading: LoadingFlag::default(),
            })
            .collect();

        Self {
            interface: interface.name().to_string(),
            methods,
        }
    }

    /// Name of the interface this service was built from.
    #[must_use]
    pub fn interface_name(&self) -> &str {
        &self.interface
    }

    /// Look up a method by name.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::UnknownMethod`] if the interface declares no
    /// such method.
    pub fn method(&self, name: &str) -> Result<&ServiceMethod, AdapterError> {
        self.methods
            .iter()
            .find(|method| &*method.name == name)
            .ok_or_else(|| AdapterError::UnknownMethod {
                service: self.interface.clone(),
                name: name.to_string(),
            })
    }

    /// All methods in declaration order.
    pub fn methods(&self) -> impl Iterator<Item = &ServiceMethod> {
        self.methods.iter()
    }
}

impl Index<&str> for Service {
    type Output = ServiceMethod;

    /// # Panics
    ///
    /// Panics if the interface declares no method called `name`.
    fn index(&self, name: &str) -> &Self::Output {
        match self.method(name) {
            Ok(method) => method,
            Err(err) => panic!("{err}"),
        }
    }
}

impl fmt::Debug for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Service")
            .field("interface", &self.interface)
            .field("methods", &self.methods)
            .finish()
    }
}

/// One callable service method, bound to its descriptor and to the adapter
/// configuration it reads at call time.
pub struct ServiceMethod {
    name: Arc<str>,
    descriptor: Arc<MethodDescriptor>,
    adapter: Adapter,
    loading: LoadingFlag,
}

impl ServiceMethod {
    /// Declared method name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The descriptor this method was synthesized from.
    #[must_use]
    pub fn descriptor(&self) -> &MethodDescriptor {
        &self.descriptor
    }

    /// Whether a call on this method is still pending.
    ///
    /// Set when a call is issued and cleared once every outstanding call has
    /// settled. Advisory state only; calls are never serialized on it.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading.is_loading()
    }

    /// Invoke the method with positional arguments.
    ///
    /// The first `k` arguments fill the `k` URL placeholders. For `POST`,
    /// `PUT` and `MULTIPART` the argument after them is the body. Anything
    /// beyond is ignored. The transport is invoked before this returns; the
    /// returned [`PendingCall`] yields its result unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::NoTransport`] if no transport can be resolved.
    pub fn call(&self, args: impl Into<Args>) -> Result<PendingCall, AdapterError> {
        let args = args.into();
        let descriptor = &*self.descriptor;

        let transport = self.adapter.resolve_transport(descriptor, &self.name)?;
        let parser = self.adapter.resolve_parser(descriptor, &self.name);

        let template = descriptor.url();
        let placeholders = template.placeholder_count();
        let url = template.resolve(
            &self.adapter.endpoint(),
            &args.url_segments(placeholders),
        );

        let verb = descriptor.verb();
        tracing::debug!(
            method = %self.name,
            verb = %verb,
            url = %url,
            parser = parser.is_some(),
            "dispatching call",
        );

        let guard = self.loading.begin();
        let target = url.clone();
        let reply = match verb {
            Verb::Get => transport.get(target, parser),
            Verb::Delete => transport.delete(target, parser),
            Verb::Jsonp => transport.jsonp(target, parser),
            Verb::Post => transport.post(target, args.into_body(placeholders), parser),
            Verb::Put => transport.put(target, args.into_body(placeholders), parser),
            Verb::Multipart => transport.multipart(target, args.into_body(placeholders), parser),
        };

        Ok(PendingCall::new(Arc::clone(&self.name), url, reply, guard))
    }
}

impl fmt::Debug for ServiceMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceMethod")
            .field("name", &self.name)
            .field("verb", &self.descriptor.verb())
            .field("url", &self.descriptor.url().as_str())
            .field("loading", &self.is_loading())
            .finish()
    }
}
