//! The adapter: adapter-wide configuration and the synthesis entry point.

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use restgen_core::{Interface, MethodDescriptor, ResultType, RestInterface};

use crate::error::AdapterError;
use crate::hooks::{Choice, ParserHook, TransportHook};
use crate::parser::{default_parser, SharedParser};
use crate::service::Service;
use crate::transport::SharedTransport;

/// Mutable adapter-wide settings, read fresh on every call.
#[derive(Default)]
struct Settings {
    endpoint: String,
    transport_hook: Option<TransportHook>,
    parser_hook: Option<ParserHook>,
}

struct AdapterInner {
    default_transport: Option<SharedTransport>,
    settings: RwLock<Settings>,
}

/// Builds services from interface descriptions and holds the configuration
/// their methods read at call time.
///
/// Cloning an adapter is cheap and yields a handle to the same
/// configuration. Services keep such a handle, so a later
/// [`set_endpoint`](Adapter::set_endpoint) or hook change applies to methods
/// that were already synthesized.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use restgen::testing::RecordingTransport;
/// use restgen::{args, Adapter, Interface, MethodDescriptor};
///
/// let transport = Arc::new(RecordingTransport::new());
/// let adapter = Adapter::new(transport.clone());
/// adapter.set_endpoint("http://endpoint.com/");
///
/// let interface = Interface::builder("ListApi")
///     .method("getListWithId", MethodDescriptor::get("getListApi/${}"))
///     .build()
///     .unwrap();
/// let service = adapter.create(&interface);
///
/// let _call = service["getListWithId"].call(args![55]).unwrap();
/// assert_eq!(transport.last_call().unwrap().url, "http://endpoint.com/getListApi/55");
/// ```
#[derive(Clone)]
pub struct Adapter {
    inner: Arc<AdapterInner>,
}

impl Adapter {
    /// Adapter whose calls go to `transport` unless a hook selects another.
    #[must_use]
    pub fn new(transport: SharedTransport) -> Self {
        Self::with_default(Some(transport))
    }

    /// Adapter without a default transport.
    ///
    /// Every call must then be routed by a transport handler; calls it does
    /// not route fail with [`AdapterError::NoTransport`].
    #[must_use]
    pub fn without_default_transport() -> Self {
        Self::with_default(None)
    }

    fn with_default(default_transport: Option<SharedTransport>) -> Self {
        Self {
            inner: Arc::new(AdapterInner {
                default_transport,
                settings: RwLock::new(Settings::default()),
            }),
        }
    }

    /// Set the prefix prepended verbatim to every resolved URL.
    pub fn set_endpoint(&self, endpoint: impl Into<String>) {
        self.write_settings(|settings| settings.endpoint = endpoint.into());
    }

    /// Current endpoint prefix (empty by default).
    #[must_use]
    pub fn endpoint(&self) -> String {
        self.read_settings(|settings| settings.endpoint.clone())
    }

    /// Install the transport handler.
    ///
    /// Called once per invocation with the method's descriptor and name.
    /// Returning [`Choice::Fallthrough`] selects the default transport.
    pub fn set_http_client_handler<F>(&self, handler: F)
    where
        F: Fn(&MethodDescriptor, &str) -> Choice<SharedTransport> + Send + Sync + 'static,
    {
        let hook: TransportHook = Arc::new(handler);
        self.write_settings(|settings| settings.transport_hook = Some(hook));
    }

    /// Install the parser handler.
    ///
    /// Called once per invocation with the descriptor, method name and the
    /// declared result type. Returning [`Choice::Fallthrough`] selects the
    /// default parser; `Choice::Use(None)` runs the call without a parser.
    pub fn set_parser_handler<F>(&self, handler: F)
    where
        F: Fn(&MethodDescriptor, &str, &ResultType) -> Choice<Option<SharedParser>>
            + Send
            + Sync
            + 'static,
    {
        let hook: ParserHook = Arc::new(handler);
        self.write_settings(|settings| settings.parser_hook = Some(hook));
    }

    /// Remove the transport handler.
    pub fn clear_http_client_handler(&self) {
        self.write_settings(|settings| settings.transport_hook = None);
    }

    /// Remove the parser handler.
    pub fn clear_parser_handler(&self) {
        self.write_settings(|settings| settings.parser_hook = None);
    }

    /// Synthesize a service with one method per descriptor in `interface`.
    #[must_use]
    pub fn create(&self, interface: &Interface) -> Service {
        tracing::debug!(
            interface = interface.name(),
            methods = interface.len(),
            "synthesizing service",
        );
        Service::synthesize(self.clone(), interface)
    }

    /// Synthesize a service for a type implementing [`RestInterface`].
    #[must_use]
    pub fn create_for<I: RestInterface>(&self) -> Service {
        self.create(I::interface())
    }

    /// Transport for one invocation: handler choice, then the default.
    pub(crate) fn resolve_transport(
        &self,
        descriptor: &MethodDescriptor,
        method: &str,
    ) -> Result<SharedTransport, AdapterError> {
        let hook = self.read_settings(|settings| settings.transport_hook.clone());
        let chosen = hook.map_or(Choice::Fallthrough, |hook| hook(descriptor, method));

        match chosen {
            Choice::Use(transport) => Ok(transport),
            Choice::Fallthrough => self.inner.default_transport.clone().ok_or_else(|| {
                AdapterError::NoTransport {
                    method: method.to_string(),
                }
            }),
        }
    }

    /// Parser for one invocation: handler choice, then the default.
    pub(crate) fn resolve_parser(
        &self,
        descriptor: &MethodDescriptor,
        method: &str,
    ) -> Option<SharedParser> {
        let hook = self.read_settings(|settings| settings.parser_hook.clone());
        let result_type = descriptor.result_type();

        hook.map_or(Choice::Fallthrough, |hook| hook(descriptor, method, result_type))
            .unwrap_or_else(|| default_parser(result_type))
    }

    // Hooks are cloned out before being called so they may reconfigure the
    // adapter without deadlocking.
    fn read_settings<R>(&self, f: impl FnOnce(&Settings) -> R) -> R {
        let settings = self
            .inner
            .settings
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        f(&settings)
    }

    fn write_settings(&self, f: impl FnOnce(&mut Settings)) {
        let mut settings = self
            .inner
            .settings
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        f(&mut settings);
    }
}

impl fmt::Debug for Adapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.read_settings(|settings| {
            f.debug_struct("Adapter")
                .field("endpoint", &settings.endpoint)
                .field("default_transport", &self.inner.default_transport.is_some())
                .field("transport_hook", &settings.transport_hook.is_some())
                .field("parser_hook", &settings.parser_hook.is_some())
                .finish()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{ParserKind, StrictParser};
    use crate::testing::RecordingTransport;

    fn descriptor() -> MethodDescriptor {
        MethodDescriptor::get("getListApi")
    }

    #[test]
    fn endpoint_defaults_to_empty() {
        let adapter = Adapter::new(Arc::new(RecordingTransport::new()));
        assert_eq!(adapter.endpoint(), "");
        adapter.set_endpoint("http://endpoint.com/");
        assert_eq!(adapter.endpoint(), "http://endpoint.com/");
    }

    #[test]
    fn clones_share_configuration() {
        let adapter = Adapter::new(Arc::new(RecordingTransport::new()));
        let copy = adapter.clone();
        copy.set_endpoint("x/");
        assert_eq!(adapter.endpoint(), "x/");
    }

    #[test]
    fn missing_transport_is_a_configuration_error() {
        let adapter = Adapter::without_default_transport();
        let err = adapter
            .resolve_transport(&descriptor(), "getList")
            .err()
            .unwrap();
        assert_eq!(
            err,
            AdapterError::NoTransport {
                method: "getList".to_string()
            },
        );
    }

    #[test]
    fn transport_hook_can_supply_the_only_transport() {
        let adapter = Adapter::without_default_transport();
        let cached: SharedTransport = Arc::new(RecordingTransport::new());
        adapter.set_http_client_handler(move |_, method| {
            if method == "getList" {
                Choice::Use(Arc::clone(&cached))
            } else {
                Choice::Fallthrough
            }
        });

        assert!(adapter.resolve_transport(&descriptor(), "getList").is_ok());
        assert!(adapter.resolve_transport(&descriptor(), "other").is_err());

        adapter.clear_http_client_handler();
        assert!(adapter.resolve_transport(&descriptor(), "getList").is_err());
    }

    #[test]
    fn parser_hook_use_none_overrides_default() {
        #[derive(serde::Serialize, serde::Deserialize)]
        struct Item {
            id: u32,
        }

        let adapter = Adapter::new(Arc::new(RecordingTransport::new()));
        let typed = MethodDescriptor::get("getListApi").returns::<Item>();
        assert!(adapter.resolve_parser(&typed, "getList").is_some());

        adapter.set_parser_handler(|_, _, _| Choice::Use(None));
        assert!(adapter.resolve_parser(&typed, "getList").is_none());

        adapter.set_parser_handler(|_, _, result_type| {
            let strict: SharedParser = Arc::new(StrictParser::new(result_type.types().to_vec()));
            Choice::Use(Some(strict))
        });
        let parser = adapter.resolve_parser(&typed, "getList").unwrap();
        assert_eq!(parser.kind(), ParserKind::Strict);

        adapter.clear_parser_handler();
        let parser = adapter.resolve_parser(&typed, "getList").unwrap();
        assert_eq!(parser.kind(), ParserKind::Lenient);
    }

    #[test]
    fn hooks_may_reconfigure_the_adapter() {
        let adapter = Adapter::new(Arc::new(RecordingTransport::new()));
        let handle = adapter.clone();
        adapter.set_http_client_handler(move |_, _| {
            handle.set_endpoint("changed/");
            Choice::Fallthrough
        });

        assert!(adapter.resolve_transport(&descriptor(), "getList").is_ok());
        assert_eq!(adapter.endpoint(), "changed/");
    }

    #[test]
    fn debug_reports_configuration() {
        let adapter = Adapter::without_default_transport();
        let debug = format!("{adapter:?}");
        assert!(debug.contains("default_transport: false"), "{debug}");
    }
}
