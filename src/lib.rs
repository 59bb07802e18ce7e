//! # typereg
//!
//! A runtime-extensible registry of named types, each owning an ordered
//! key/value store and a fixed behavior contract.
//!
//! `typereg` keeps a catalog of "types" identified by name. Each type owns
//! an ordered store of string-keyed opaque values and a [`TypeOps`] table
//! of up to five hooks (print, free, copy, compare, parse) describing how
//! those values are handled. Types can be registered up front or created
//! on the fly by the first store that names them; either way the hook set
//! presented at creation is frozen, and every later writer to that name
//! must present the identical set. This lets independent components share
//! a registry without silently disagreeing about how a type's values are
//! printed, released, or compared.
//!
//! ## Key Features
//!
//! - **Sorted catalog**: types live in a name-sorted table, so every
//!   resolution is a single binary search
//! - **Frozen contracts**: the first writer to a type name fixes its hook
//!   set; later writers must present the identical hooks or are turned away
//! - **Owned values**: a store owns its values outright and releases each
//!   one through the type's `free` hook when the type goes away
//! - **Lazy stores**: registering a type costs a name and a hook table;
//!   the store itself appears on the first value stored under it
//! - **Pluggable output**: catalog printing goes through the [`Reporter`]
//!   trait, with [`LineBuffer`] as a ready-made sink for tests and demos
//!
//! ## Usage Examples
//!
//! ### Basic Usage
//!
//! ```rust
//! use typereg::{TypeOps, TypeRegistry};
//!
//! fn main() -> Result<(), typereg::RegistryError> {
//!     let mut registry = TypeRegistry::new();
//!
//!     // First store under an unknown name registers the type.
//!     registry.store("names", "john", "Smith".to_owned(), TypeOps::new())?;
//!     registry.store("names", "adam", "Jones".to_owned(), TypeOps::new())?;
//!     registry.store("gain", "adc0", 3i32, TypeOps::new())?;
//!
//!     // Retrieve values in a type-safe way
//!     let surname = registry.lookup_as::<String>("names", "john")?;
//!     println!("john maps to {}", surname);
//!
//!     let gain = registry.lookup_as::<i32>("gain", "adc0")?;
//!     println!("adc0 gain is {}", gain);
//!
//!     assert_eq!(registry.len(), 2);
//!     Ok(())
//! }
//! ```
//!
//! ### Printing the Catalog
//!
//! ```rust
//! use typereg::{LineBuffer, TypeOps, TypeRegistry};
//!
//! fn main() -> Result<(), typereg::RegistryError> {
//!     let mut registry = TypeRegistry::new();
//!     registry.store("names", "john", (), TypeOps::new())?;
//!     registry.store("names", "adam", (), TypeOps::new())?;
//!
//!     // Types print in sorted order, keys in sorted order under each.
//!     let mut out = LineBuffer::new();
//!     registry.print_all(&mut out);
//!     assert_eq!(out.into_lines(), vec!["type names", "adam", "john"]);
//!     Ok(())
//! }
//! ```
//!
//! ### Error Handling
//!
//! ```rust
//! use std::any::Any;
//! use typereg::{Reporter, RegistryError, TypeOps, TypeRegistry};
//!
//! fn show(out: &mut dyn Reporter, _value: &(dyn Any + Send)) {
//!     out.entry_record("sensor");
//! }
//!
//! let mut registry = TypeRegistry::new();
//! let hooked = TypeOps {
//!     print: Some(show),
//!     ..TypeOps::new()
//! };
//!
//! if let Err(e) = registry.store("sensor", "s0", 1i32, hooked) {
//!     eprintln!("failed to store: {}", e);
//! }
//!
//! // A later writer that disagrees about the contract is turned away.
//! match registry.store("sensor", "s1", 2i32, TypeOps::new()) {
//!     Ok(()) => println!("stored"),
//!     Err(RegistryError::OpsMismatch(name)) => println!("contract disagreement on {}", name),
//!     Err(other) => println!("other error: {}", other),
//! }
//!
//! // The rejected store left the type untouched.
//! assert_eq!(registry.get("sensor").map(|entry| entry.len()), Some(1));
//! ```

mod entry;
mod error;
mod ops;
mod registry;
mod report;

pub use entry::TypeEntry;
pub use error::RegistryError;
pub use ops::{CompareFn, CopyFn, FreeFn, ParseFn, PrintFn, TypeOps, Value};
pub use registry::{Probe, TypeRegistry};
pub use report::{LineBuffer, Reporter};

// Re-export std::any for convenience
pub use std::any::Any;
