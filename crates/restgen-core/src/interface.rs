//! Interface descriptions: explicit, ordered registries of named descriptors.

use std::sync::Arc;

use crate::descriptor::MethodDescriptor;
use crate::DescriptorError;

/// An ordered set of named [`MethodDescriptor`]s.
///
/// This is what an adapter enumerates to synthesize a service: one service
/// method per entry, named identically. Descriptors are held behind `Arc`, so
/// cloning an interface or building many services from it shares them.
///
/// # Examples
///
/// ```
/// use restgen_core::{Interface, MethodDescriptor};
///
/// let interface = Interface::builder("ListApi")
///     .method("getList", MethodDescriptor::get("getListApi"))
///     .method("addList", MethodDescriptor::post("addListApi"))
///     .build()
///     .unwrap();
///
/// let names: Vec<&str> = interface.methods().map(|(name, _)| name).collect();
/// assert_eq!(names, ["getList", "addList"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interface {
    name: String,
    methods: Vec<(String, Arc<MethodDescriptor>)>,
}

impl Interface {
    /// Start declaring an interface.
    #[must_use]
    pub fn builder(name: &str) -> InterfaceBuilder {
        InterfaceBuilder {
            name: name.to_string(),
            methods: Vec::new(),
        }
    }

    /// Interface name, used in diagnostics.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Descriptors in declaration order.
    pub fn methods(&self) -> impl Iterator<Item = (&str, &Arc<MethodDescriptor>)> {
        self.methods
            .iter()
            .map(|(name, descriptor)| (name.as_str(), descriptor))
    }

    /// Look up a descriptor by method name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Arc<MethodDescriptor>> {
        self.methods
            .iter()
            .find_map(|(method, descriptor)| (method == name).then_some(descriptor))
    }

    /// Number of declared methods.
    #[must_use]
    pub fn len(&self) -> usize {
        self.methods.len()
    }

    /// Whether the interface declares no methods.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

/// Builder returned by [`Interface::builder`].
#[derive(Debug)]
#[must_use]
pub struct InterfaceBuilder {
    name: String,
    methods: Vec<(String, MethodDescriptor)>,
}

impl InterfaceBuilder {
    /// Declare a method.
    pub fn method(mut self, name: &str, descriptor: MethodDescriptor) -> Self {
        self.methods.push((name.to_string(), descriptor));
        self
    }

    /// Finish the interface.
    ///
    /// # Errors
    ///
    /// Returns [`DescriptorError::DuplicateMethod`] if a name was declared twice.
    pub fn build(self) -> Result<Interface, DescriptorError> {
        let mut methods: Vec<(String, Arc<MethodDescriptor>)> =
            Vec::with_capacity(self.methods.len());

        for (name, descriptor) in self.methods {
            if methods.iter().any(|(existing, _)| *existing == name) {
                return Err(DescriptorError::DuplicateMethod { name });
            }
            methods.push((name, Arc::new(descriptor)));
        }

        Ok(Interface {
            name: self.name,
            methods,
        })
    }
}

/// A Rust type that declares a REST interface.
///
/// Implementors typically build the interface once in a `static`
/// [`LazyLock`](std::sync::LazyLock) so every service shares the same
/// descriptors:
///
/// ```
/// use std::sync::LazyLock;
/// use restgen_core::{Interface, MethodDescriptor, RestInterface};
///
/// struct ListApi;
///
/// impl RestInterface for ListApi {
///     fn interface() -> &'static Interface {
///         static INTERFACE: LazyLock<Interface> = LazyLock::new(|| {
///             Interface::builder("ListApi")
///                 .method("getList", MethodDescriptor::get("getListApi"))
///                 .build()
///                 .expect("ListApi declares unique method names")
///         });
///         &INTERFACE
///     }
/// }
///
/// assert!(ListApi::interface().get("getList").is_some());
/// ```
pub trait RestInterface {
    /// The process-wide interface description.
    fn interface() -> &'static Interface;
}
