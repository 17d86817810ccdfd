//! Errors raised while declaring interfaces.

/// Error returned when a method descriptor or interface is malformed.
///
/// These are configuration defects: they surface at declaration time and are
/// never retried or replaced by a guessed default.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum DescriptorError {
    /// A verb name is not one of `GET`, `POST`, `PUT`, `DELETE`, `JSONP`, `MULTIPART`.
    #[error("unknown verb '{verb}'; expected one of GET, POST, PUT, DELETE, JSONP, MULTIPART")]
    UnknownVerb {
        /// The verb text as written.
        verb: String,
    },

    /// Two methods on one interface share a name.
    #[error("method '{name}' is declared more than once")]
    DuplicateMethod {
        /// The repeated method name.
        name: String,
    },
}
