//! Client and interface configuration loaded from YAML.
//!
//! # Client file
//!
//! ```yaml
//! # client.yaml
//! endpoint: "http://localhost:8080/"
//! timeout_secs: 10
//! user_agent: my-app/1.0
//! jsonp_callback: callback
//!
//! cache:
//!   enabled: true
//!   ttl_secs: 60
//!   capacity: 256
//! ```
//!
//! # Interface file
//!
//! ```yaml
//! # api.yaml
//! name: ListApi
//! methods:
//!   - name: getListWithIdAndQuery
//!     verb: GET
//!     url: "getListApi/${}?query=${}"
//!   - name: addListWithIdAndData
//!     verb: POST
//!     url: "addListApi/${id}"
//! ```
//!
//! Result types cannot be named in YAML, so methods loaded from an interface
//! file run without a default parser.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use restgen::{Adapter, Interface, MethodDescriptor, SharedTransport, Verb};
use serde::Deserialize;

use crate::cache::{MemCacheProvider, MemCacheTransport};
use crate::client::{HttpTransport, DEFAULT_JSONP_CALLBACK};

/// HTTP client settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Prefix prepended verbatim to every resolved URL.
    pub endpoint: String,

    /// Per-request timeout. No timeout when absent.
    pub timeout_secs: Option<u64>,

    /// `User-Agent` header value. reqwest's default when absent.
    pub user_agent: Option<String>,

    /// JSONP callback parameter value.
    pub jsonp_callback: String,

    /// Response cache for `GET` calls.
    pub cache: CacheConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            timeout_secs: None,
            user_agent: None,
            jsonp_callback: DEFAULT_JSONP_CALLBACK.to_string(),
            cache: CacheConfig::default(),
        }
    }
}

/// Response cache settings. Disabled by default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Wrap the HTTP transport in a [`MemCacheTransport`].
    pub enabled: bool,

    /// Entry lifetime. Entries never expire when absent.
    pub ttl_secs: Option<u64>,

    /// Maximum number of entries. Unbounded when absent.
    pub capacity: Option<usize>,
}

impl CacheConfig {
    fn provider(&self) -> MemCacheProvider {
        let mut provider = MemCacheProvider::new();
        if let Some(ttl) = self.ttl_secs {
            provider = provider.with_ttl(Duration::from_secs(ttl));
        }
        if let Some(capacity) = self.capacity {
            provider = provider.with_capacity(capacity);
        }
        provider
    }
}

impl ClientConfig {
    /// Load from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse from YAML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`](crate::ConfigError::Yaml) on malformed input.
    pub fn from_yaml(yaml: &str) -> crate::error::Result<Self> {
        Ok(serde_yaml_ng::from_str(yaml)?)
    }

    /// Build the configured transport: an [`HttpTransport`], cached when
    /// `cache.enabled` is set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Client`](crate::ConfigError::Client) if the
    /// reqwest client cannot be built.
    pub fn build_transport(&self) -> crate::error::Result<SharedTransport> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = self.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        if let Some(agent) = &self.user_agent {
            builder = builder.user_agent(agent.as_str());
        }

        let http = HttpTransport::with_client(builder.build()?).jsonp_callback(&self.jsonp_callback);

        if self.cache.enabled {
            tracing::debug!(
                ttl_secs = ?self.cache.ttl_secs,
                capacity = ?self.cache.capacity,
                "response cache enabled",
            );
            let cache = Arc::new(self.cache.provider());
            Ok(Arc::new(MemCacheTransport::new(http, cache)))
        } else {
            Ok(Arc::new(http))
        }
    }

    /// Build an [`Adapter`] over [`build_transport`](Self::build_transport)
    /// with the endpoint applied.
    ///
    /// # Errors
    ///
    /// Same as [`build_transport`](Self::build_transport).
    pub fn build_adapter(&self) -> crate::error::Result<Adapter> {
        let adapter = Adapter::new(self.build_transport()?);
        adapter.set_endpoint(self.endpoint.as_str());
        Ok(adapter)
    }
}

/// An interface declared in YAML.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InterfaceFile {
    /// Interface name, used in diagnostics.
    #[serde(default = "default_interface_name")]
    pub name: String,

    /// Methods in declaration order.
    #[serde(default)]
    pub methods: Vec<MethodEntry>,
}

/// One method of an [`InterfaceFile`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MethodEntry {
    /// Method name.
    pub name: String,
    /// Verb text, case-insensitive (`GET`, `post`, ...).
    pub verb: String,
    /// URL template.
    pub url: String,
}

fn default_interface_name() -> String {
    "Interface".to_string()
}

impl InterfaceFile {
    /// Load from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse from YAML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`](crate::ConfigError::Yaml) on malformed input.
    pub fn from_yaml(yaml: &str) -> crate::error::Result<Self> {
        Ok(serde_yaml_ng::from_str(yaml)?)
    }

    /// Build the declared [`Interface`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Descriptor`](crate::ConfigError::Descriptor) for
    /// an unknown verb or a repeated method name.
    pub fn to_interface(&self) -> crate::error::Result<Interface> {
        let mut builder = Interface::builder(&self.name);
        for entry in &self.methods {
            let verb: Verb = entry.verb.parse()?;
            builder = builder.method(&entry.name, MethodDescriptor::new(verb, &entry.url));
        }
        Ok(builder.build()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ConfigError;
    use indoc::indoc;
    use pretty_assertions::assert_eq;
    use restgen::DescriptorError;

    #[test]
    fn client_defaults() {
        let config = ClientConfig::from_yaml("{}").unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.jsonp_callback, "callback");
        assert!(!config.cache.enabled);
    }

    #[test]
    fn client_full() {
        let config = ClientConfig::from_yaml(indoc! {r#"
            endpoint: "http://endpoint.com/"
            timeout_secs: 5
            user_agent: restgen-test
            jsonp_callback: cb
            cache:
              enabled: true
              ttl_secs: 30
        "#})
        .unwrap();

        assert_eq!(config.endpoint, "http://endpoint.com/");
        assert_eq!(config.timeout_secs, Some(5));
        assert_eq!(config.user_agent.as_deref(), Some("restgen-test"));
        assert_eq!(config.jsonp_callback, "cb");
        assert_eq!(
            config.cache,
            CacheConfig {
                enabled: true,
                ttl_secs: Some(30),
                capacity: None,
            }
        );
    }

    #[test]
    fn build_adapter_applies_endpoint() {
        let config = ClientConfig {
            endpoint: "http://endpoint.com/".to_string(),
            cache: CacheConfig {
                enabled: true,
                ttl_secs: None,
                capacity: Some(8),
            },
            ..ClientConfig::default()
        };
        let adapter = config.build_adapter().unwrap();
        assert_eq!(adapter.endpoint(), "http://endpoint.com/");
    }

    #[test]
    fn load_from_file() {
        let dir = std::env::temp_dir().join("restgen-http-config-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("client.yaml");
        std::fs::write(&path, "endpoint: http://x/\n").unwrap();

        let config = ClientConfig::load(&path).unwrap();
        assert_eq!(config.endpoint, "http://x/");

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn load_nonexistent_file_returns_io_error() {
        let result = ClientConfig::load(Path::new("/nonexistent/client.yaml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn invalid_yaml_returns_yaml_error() {
        let result = ClientConfig::from_yaml("cache: [[[invalid");
        assert!(matches!(result, Err(ConfigError::Yaml(_))));
    }

    #[test]
    fn interface_file_builds_in_order() {
        let file = InterfaceFile::from_yaml(indoc! {r#"
            name: ListApi
            methods:
              - name: getListWithIdAndQuery
                verb: GET
                url: "getListApi/${}?query=${}"
              - name: addListWithIdAndData
                verb: post
                url: "addListApi/${id}"
        "#})
        .unwrap();

        let interface = file.to_interface().unwrap();
        assert_eq!(interface.name(), "ListApi");

        let methods: Vec<(&str, Verb, usize)> = interface
            .methods()
            .map(|(name, d)| (name, d.verb(), d.url().placeholder_count()))
            .collect();
        assert_eq!(
            methods,
            [
                ("getListWithIdAndQuery", Verb::Get, 2),
                ("addListWithIdAndData", Verb::Post, 1),
            ]
        );
        assert!(interface
            .methods()
            .all(|(_, d)| d.result_type().is_none()));
    }

    #[test]
    fn interface_file_rejects_unknown_verb() {
        let file = InterfaceFile::from_yaml(indoc! {"
            methods:
              - name: patchList
                verb: PATCH
                url: list
        "})
        .unwrap();

        let err = file.to_interface().unwrap_err();
        assert!(
            matches!(
                err,
                ConfigError::Descriptor(DescriptorError::UnknownVerb { ref verb }) if verb == "PATCH"
            ),
            "unexpected error: {err:?}",
        );
    }

    #[test]
    fn interface_file_rejects_duplicates() {
        let file = InterfaceFile::from_yaml(indoc! {"
            methods:
              - { name: getList, verb: GET, url: a }
              - { name: getList, verb: GET, url: b }
        "})
        .unwrap();

        assert!(matches!(
            file.to_interface(),
            Err(ConfigError::Descriptor(DescriptorError::DuplicateMethod { .. }))
        ));
    }
}
