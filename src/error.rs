use std::collections::TryReserveError;

use thiserror::Error;

/// Errors that can occur when using the type registry.
///
/// Every fallible operation returns one of these; nothing is swallowed.
/// Failures leave the registry in its prior consistent state.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The type table could not grow to hold another descriptor.
    #[error("could not grow the type table")]
    Capacity(#[from] TryReserveError),
    /// Type names are the registry's sort key and may not be empty.
    #[error("type names may not be empty")]
    EmptyName,
    /// Attempted to register a name that is already present.
    #[error("type `{0}` is already registered")]
    DuplicateType(String),
    /// No type with the given name is registered.
    #[error("no type named `{0}`")]
    UnknownType(String),
    /// The type exists but holds nothing under the given key.
    #[error("no entry `{key}` under type `{type_name}`")]
    KeyNotFound { type_name: String, key: String },
    /// An index past the end of the type table.
    #[error("type index {index} out of range for a table of {len}")]
    OutOfRange { index: usize, len: usize },
    /// The supplied hook set is not the one frozen when the type was created.
    #[error("ops do not match the contract frozen for type `{0}`")]
    OpsMismatch(String),
    /// The key is already present in the type's store.
    #[error("key `{key}` already stored under type `{type_name}`")]
    DuplicateKey { type_name: String, key: String },
    /// The stored value is not of the requested Rust type.
    #[error("value under `{type_name}/{key}` is not of the requested type")]
    ValueMismatch { type_name: String, key: String },
}
