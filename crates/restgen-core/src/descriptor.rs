//! Method descriptors: the immutable record behind every service method.

use std::any::TypeId;
use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::template::UrlTemplate;
use crate::verb::Verb;

/// Coerce a JSON value through a Rust type.
type CoerceFn = fn(Value) -> Result<Value, serde_json::Error>;

/// Reference to a result type declared on a method.
///
/// Two references are equal when they name the same Rust type. The reference
/// also carries a coercion function that deserializes a JSON value into the
/// type and serializes it back, which parsers use to validate and normalize
/// responses.
///
/// # Examples
///
/// ```
/// use restgen_core::TypeRef;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Serialize, Deserialize)]
/// struct Item {
///     description: String,
/// }
///
/// let item = TypeRef::of::<Item>();
/// assert_eq!(item, TypeRef::of::<Item>());
/// assert!(item.coerce(serde_json::json!({"description": "desc"})).is_ok());
/// assert!(item.coerce(serde_json::json!(42)).is_err());
/// ```
#[derive(Clone, Copy)]
pub struct TypeRef {
    id: TypeId,
    name: &'static str,
    coerce: CoerceFn,
}

impl TypeRef {
    /// Reference the Rust type `T`.
    #[must_use]
    pub fn of<T>() -> Self
    where
        T: DeserializeOwned + Serialize + 'static,
    {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
            coerce: coerce_through::<T>,
        }
    }

    /// Fully-qualified Rust type name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Deserialize `value` as this type and serialize the result back.
    ///
    /// # Errors
    ///
    /// Returns the deserialization error when `value` does not fit the type.
    pub fn coerce(&self, value: Value) -> Result<Value, serde_json::Error> {
        (self.coerce)(value)
    }
}

fn coerce_through<T>(value: Value) -> Result<Value, serde_json::Error>
where
    T: DeserializeOwned + Serialize,
{
    let typed: T = serde_json::from_value(value)?;
    serde_json::to_value(typed)
}

impl PartialEq for TypeRef {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeRef {}

impl fmt::Debug for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TypeRef").field(&self.name).finish()
    }
}

/// Result type annotation of a method: absent, one type, or an ordered list.
///
/// Only parser selection looks at it; it never affects the network call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ResultType {
    /// No annotation.
    #[default]
    None,
    /// A single type.
    Single(TypeRef),
    /// An ordered list of candidate types.
    List(Vec<TypeRef>),
}

impl ResultType {
    /// Whether no type was declared.
    #[must_use]
    pub const fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Declared types in order; empty for [`ResultType::None`].
    #[must_use]
    pub fn types(&self) -> &[TypeRef] {
        match self {
            Self::None => &[],
            Self::Single(ty) => std::slice::from_ref(ty),
            Self::List(types) => types,
        }
    }
}

impl From<TypeRef> for ResultType {
    fn from(ty: TypeRef) -> Self {
        Self::Single(ty)
    }
}

impl From<Vec<TypeRef>> for ResultType {
    fn from(types: Vec<TypeRef>) -> Self {
        Self::List(types)
    }
}

/// Immutable description of one service method: verb, URL template and
/// optional result type.
///
/// Built once per declared method and shared (behind an `Arc`) by every
/// service created from the same interface.
///
/// # Examples
///
/// ```
/// use restgen_core::{MethodDescriptor, Verb};
///
/// let descriptor = MethodDescriptor::get("getListApi/${id}");
/// assert_eq!(descriptor.verb(), Verb::Get);
/// assert_eq!(descriptor.url().placeholder_count(), 1);
/// assert!(descriptor.result_type().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDescriptor {
    verb: Verb,
    url: UrlTemplate,
    result_type: ResultType,
}

impl MethodDescriptor {
    /// Describe a method with no result type annotation.
    #[must_use]
    pub fn new(verb: Verb, url: &str) -> Self {
        Self {
            verb,
            url: UrlTemplate::parse(url),
            result_type: ResultType::None,
        }
    }

    /// `GET` method.
    #[must_use]
    pub fn get(url: &str) -> Self {
        Self::new(Verb::Get, url)
    }

    /// `POST` method.
    #[must_use]
    pub fn post(url: &str) -> Self {
        Self::new(Verb::Post, url)
    }

    /// `PUT` method.
    #[must_use]
    pub fn put(url: &str) -> Self {
        Self::new(Verb::Put, url)
    }

    /// `DELETE` method.
    #[must_use]
    pub fn delete(url: &str) -> Self {
        Self::new(Verb::Delete, url)
    }

    /// `JSONP` method.
    #[must_use]
    pub fn jsonp(url: &str) -> Self {
        Self::new(Verb::Jsonp, url)
    }

    /// `MULTIPART` method.
    #[must_use]
    pub fn multipart(url: &str) -> Self {
        Self::new(Verb::Multipart, url)
    }

    /// Declare a single result type `T`.
    #[must_use]
    pub fn returns<T>(self) -> Self
    where
        T: DeserializeOwned + Serialize + 'static,
    {
        self.with_result_type(TypeRef::of::<T>())
    }

    /// Declare the result type annotation directly.
    #[must_use]
    pub fn with_result_type(mut self, result_type: impl Into<ResultType>) -> Self {
        self.result_type = result_type.into();
        self
    }

    /// The method's verb.
    #[must_use]
    pub const fn verb(&self) -> Verb {
        self.verb
    }

    /// The parsed URL template.
    #[must_use]
    pub const fn url(&self) -> &UrlTemplate {
        &self.url
    }

    /// The declared result type.
    #[must_use]
    pub const fn result_type(&self) -> &ResultType {
        &self.result_type
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Serialize, Deserialize)]
    struct Item {
        description: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    struct Count {
        count: u32,
    }

    #[test]
    fn type_ref_equality_follows_rust_type() {
        assert_eq!(TypeRef::of::<Item>(), TypeRef::of::<Item>());
        assert_ne!(TypeRef::of::<Item>(), TypeRef::of::<Count>());
    }

    #[test]
    fn type_ref_name_is_rust_path() {
        assert!(TypeRef::of::<Item>().name().ends_with("Item"));
    }

    #[test]
    fn coercion_normalizes_through_the_type() {
        let value = json!({"description": "desc", "extra": true});
        let coerced = TypeRef::of::<Item>().coerce(value).unwrap();
        assert_eq!(coerced, json!({"description": "desc"}));
    }

    #[test]
    fn coercion_rejects_mismatched_shape() {
        assert!(TypeRef::of::<Count>().coerce(json!({"count": "many"})).is_err());
    }

    #[test]
    fn result_type_lists_types_in_order() {
        assert!(ResultType::None.types().is_empty());

        let single = ResultType::from(TypeRef::of::<Item>());
        assert_eq!(single.types(), &[TypeRef::of::<Item>()]);

        let list = ResultType::from(vec![TypeRef::of::<Item>(), TypeRef::of::<Count>()]);
        assert_eq!(list.types(), &[TypeRef::of::<Item>(), TypeRef::of::<Count>()]);
    }

    #[test]
    fn descriptor_builders_set_verb_and_template() {
        let descriptor = MethodDescriptor::put("updateListApi/${}").returns::<Item>();
        assert_eq!(descriptor.verb(), Verb::Put);
        assert_eq!(descriptor.url().as_str(), "updateListApi/${}");
        assert_eq!(
            descriptor.result_type(),
            &ResultType::Single(TypeRef::of::<Item>()),
        );
    }

    #[test]
    fn each_verb_constructor() {
        let cases = [
            (MethodDescriptor::get("a"), Verb::Get),
            (MethodDescriptor::post("a"), Verb::Post),
            (MethodDescriptor::put("a"), Verb::Put),
            (MethodDescriptor::delete("a"), Verb::Delete),
            (MethodDescriptor::jsonp("a"), Verb::Jsonp),
            (MethodDescriptor::multipart("a"), Verb::Multipart),
        ];
        for (descriptor, verb) in cases {
            assert_eq!(descriptor.verb(), verb);
        }
    }
}
