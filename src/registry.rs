use std::any::Any;

use log::{debug, warn};

use crate::entry::TypeEntry;
use crate::error::RegistryError;
use crate::ops::{TypeOps, Value};
use crate::report::Reporter;

/// Result of probing the registry for a type name.
///
/// A single binary search answers both questions a caller has: where the
/// name is, or where it would have to go to keep the table sorted. `Found`
/// carries the matching index, `InsertAt` the sorted insertion position.
/// On an empty registry every probe is `InsertAt(0)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Probe {
    /// The name is registered at this index.
    Found(usize),
    /// The name is absent; inserting here keeps the table sorted.
    InsertAt(usize),
}

impl Probe {
    /// True when the probe hit a registered name.
    pub fn is_found(&self) -> bool {
        matches!(self, Probe::Found(_))
    }
}

/// A registry of named types, each owning an ordered key/value store and
/// a behavior contract fixed at registration.
///
/// The registry keeps its descriptors in a table sorted strictly ascending
/// by name, so every resolution is a binary search. Types are registered
/// explicitly with [`register`](Self::register), or created on the fly by
/// the first [`store`](Self::store) naming them. Once a type exists its
/// [`TypeOps`] contract is frozen: every later store under that name must
/// present the identical hook set or be turned away.
///
/// Values are owned by the store that holds them. Removing a type (or
/// dropping the registry) releases every value it holds through the type's
/// `free` hook, or plain drop when the hook is unset.
///
/// # Examples
///
/// ```rust
/// use typereg::{TypeOps, TypeRegistry};
///
/// let mut registry = TypeRegistry::new();
/// registry.store("names", "john", "Smith".to_owned(), TypeOps::new())?;
/// registry.store("names", "adam", "Jones".to_owned(), TypeOps::new())?;
///
/// let surname = registry.lookup_as::<String>("names", "john")?;
/// assert_eq!(surname, "Smith");
/// assert_eq!(registry.len(), 1);
/// # Ok::<(), typereg::RegistryError>(())
/// ```
#[derive(Debug)]
pub struct TypeRegistry {
    types: Vec<TypeEntry>,
}

impl TypeRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self { types: Vec::new() }
    }

    /// Number of registered types.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// True when no types are registered.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// True when `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.find(name).is_found()
    }

    /// Locates `name` in the sorted table.
    ///
    /// Returns [`Probe::Found`] with the index on a match, otherwise
    /// [`Probe::InsertAt`] with the position that keeps the table sorted.
    /// The insertion position feeds straight into
    /// [`register_at`](Self::register_at), so one search serves both
    /// lookup and registration planning.
    ///
    /// ```rust
    /// use typereg::{Probe, TypeOps, TypeRegistry};
    ///
    /// let mut registry = TypeRegistry::new();
    /// assert_eq!(registry.find("gain"), Probe::InsertAt(0));
    ///
    /// registry.register("gain", TypeOps::new())?;
    /// assert_eq!(registry.find("gain"), Probe::Found(0));
    /// # Ok::<(), typereg::RegistryError>(())
    /// ```
    pub fn find(&self, name: &str) -> Probe {
        match self.types.binary_search_by(|entry| entry.name().cmp(name)) {
            Ok(index) => Probe::Found(index),
            Err(position) => Probe::InsertAt(position),
        }
    }

    /// Borrows the descriptor registered under `name`, if any.
    pub fn get(&self, name: &str) -> Option<&TypeEntry> {
        match self.find(name) {
            Probe::Found(index) => self.types.get(index),
            Probe::InsertAt(_) => None,
        }
    }

    /// Borrows the descriptor at `index`.
    ///
    /// # Errors
    ///
    /// `OutOfRange` when `index` is not below the current count. Indices
    /// are only stable between mutations; any registration or removal
    /// shifts the positions after it.
    pub fn entry(&self, index: usize) -> Result<&TypeEntry, RegistryError> {
        self.types
            .get(index)
            .ok_or_else(|| RegistryError::OutOfRange {
                index,
                len: self.types.len(),
            })
    }

    /// Descriptors in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &TypeEntry> {
        self.types.iter()
    }

    /// Registered type names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.types.iter().map(TypeEntry::name)
    }

    /// Inserts a new type at `index`, shifting later entries one slot.
    ///
    /// This is the raw insertion primitive: it does not search, and it
    /// trusts the caller to supply a position consistent with the sort
    /// order. [`register`](Self::register) computes that position; direct
    /// callers almost always hold one from a preceding
    /// [`find`](Self::find).
    ///
    /// # Errors
    ///
    /// `EmptyName` when `name` is empty, `OutOfRange` when `index` is
    /// past the end of the table, and `Capacity` when the table cannot
    /// grow. All three leave the registry exactly as it was.
    pub fn register_at(
        &mut self,
        index: usize,
        name: &str,
        ops: TypeOps,
    ) -> Result<usize, RegistryError> {
        if name.is_empty() {
            return Err(RegistryError::EmptyName);
        }
        if index > self.types.len() {
            return Err(RegistryError::OutOfRange {
                index,
                len: self.types.len(),
            });
        }
        self.types.try_reserve(1)?;
        self.types.insert(index, TypeEntry::new(name.to_owned(), ops));
        debug!("registered type <{}> at index {}", name, index);
        Ok(index)
    }

    /// Registers a new type under `name` with the given contract.
    ///
    /// The sorted position is found by binary search and the new
    /// descriptor starts with no store; the store appears when the first
    /// value lands under the type. Returns the index the type now
    /// occupies.
    ///
    /// # Errors
    ///
    /// `DuplicateType` when the name is already registered (the registry
    /// is left unchanged), plus everything
    /// [`register_at`](Self::register_at) can return.
    pub fn register(&mut self, name: &str, ops: TypeOps) -> Result<usize, RegistryError> {
        match self.find(name) {
            Probe::Found(_) => {
                warn!("type <{}> is already registered", name);
                Err(RegistryError::DuplicateType(name.to_owned()))
            }
            Probe::InsertAt(position) => self.register_at(position, name, ops),
        }
    }

    /// Removes the type registered under `name`.
    ///
    /// The descriptor's store and every value in it are released through
    /// the type's `free` hook before the table is compacted and its
    /// backing storage shrunk by the vacated slot.
    ///
    /// # Errors
    ///
    /// `UnknownType` when no such type is registered.
    pub fn deregister(&mut self, name: &str) -> Result<(), RegistryError> {
        match self.find(name) {
            Probe::Found(index) => {
                let entry = self.types.remove(index);
                debug!("deregistering type <{}> from index {}", entry.name(), index);
                drop(entry);
                self.types.shrink_to_fit();
                Ok(())
            }
            Probe::InsertAt(_) => {
                debug!("no type <{}> to deregister", name);
                Err(RegistryError::UnknownType(name.to_owned()))
            }
        }
    }

    /// Stores `value` under `type_name`/`key`, creating the type on first
    /// use.
    ///
    /// When `type_name` is not yet registered it is registered here with
    /// the supplied `ops`: the first writer to a name fixes its contract.
    /// Every store, including the one that created the type, must present
    /// a hook set identical (by function address, not behavior) to the
    /// frozen contract.
    ///
    /// The value is boxed internally. A value that is already a [`Value`]
    /// box belongs in [`store_boxed`](Self::store_boxed); passing it here
    /// would box it a second time and hide it from typed lookup.
    ///
    /// # Errors
    ///
    /// `OpsMismatch` when `ops` differs from the type's frozen contract,
    /// `DuplicateKey` when the key is already present in the type's store,
    /// plus the registration errors when the type is created here. On
    /// every failure the registry and the type's store are left untouched;
    /// the rejected value is released through the supplied `free` hook, or
    /// dropped when the hook is unset.
    pub fn store<V: Any + Send>(
        &mut self,
        type_name: &str,
        key: &str,
        value: V,
        ops: TypeOps,
    ) -> Result<(), RegistryError> {
        self.store_boxed(type_name, key, Box::new(value), ops)
    }

    /// [`store`](Self::store) for values that are already boxed, such as
    /// the output of a type's `parse` hook.
    pub fn store_boxed(
        &mut self,
        type_name: &str,
        key: &str,
        value: Value,
        ops: TypeOps,
    ) -> Result<(), RegistryError> {
        let index = match self.find(type_name) {
            Probe::Found(index) => index,
            Probe::InsertAt(position) => {
                debug!("creating type <{}> on first store", type_name);
                match self.register_at(position, type_name, ops) {
                    Ok(index) => index,
                    Err(error) => {
                        if let Some(free) = ops.free {
                            free(value);
                        }
                        return Err(error);
                    }
                }
            }
        };

        let entry = &mut self.types[index];
        if entry.ops() != ops {
            warn!(
                "ops for key <{}> do not match the contract frozen for type <{}>",
                key, type_name
            );
            if let Some(free) = ops.free {
                free(value);
            }
            return Err(RegistryError::OpsMismatch(type_name.to_owned()));
        }
        entry.insert(key, value)
    }

    /// Borrows the value stored under `type_name`/`key`.
    ///
    /// # Errors
    ///
    /// `UnknownType` when the type is not registered, `KeyNotFound` when
    /// the type holds nothing under `key` (a type whose store was never
    /// created holds no keys).
    pub fn lookup(&self, type_name: &str, key: &str) -> Result<&(dyn Any + Send), RegistryError> {
        let entry = self.get(type_name).ok_or_else(|| {
            debug!("no type <{}> for lookup", type_name);
            RegistryError::UnknownType(type_name.to_owned())
        })?;
        entry.get(key).ok_or_else(|| RegistryError::KeyNotFound {
            type_name: type_name.to_owned(),
            key: key.to_owned(),
        })
    }

    /// [`lookup`](Self::lookup) downcast to a concrete type.
    ///
    /// # Errors
    ///
    /// Everything `lookup` returns, plus `ValueMismatch` when the stored
    /// value is not a `T`.
    pub fn lookup_as<T: Any>(&self, type_name: &str, key: &str) -> Result<&T, RegistryError> {
        let value = self.lookup(type_name, key)?;
        value
            .downcast_ref::<T>()
            .ok_or_else(|| RegistryError::ValueMismatch {
                type_name: type_name.to_owned(),
                key: key.to_owned(),
            })
    }

    /// Emits every type's records in sorted order.
    ///
    /// Each descriptor contributes its name record followed by one record
    /// per stored entry, rendered by the type's `print` hook or the
    /// bare-key stub. Harmless on an empty registry.
    pub fn print_all(&self, out: &mut dyn Reporter) {
        for entry in &self.types {
            entry.print(out);
        }
    }

    /// Tears down the registry: every descriptor, its store, and every
    /// stored value are released, and the table's backing storage is
    /// returned.
    ///
    /// Safe to call on an empty registry, and calling it twice is a no-op
    /// the second time. Dropping the registry performs the same release.
    pub fn clear(&mut self) {
        if !self.types.is_empty() {
            debug!("tearing down {} registered types", self.types.len());
        }
        self.types = Vec::new();
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probe_reports_sorted_positions() {
        let mut registry = TypeRegistry::new();
        registry.register("gain", TypeOps::new()).unwrap();
        registry.register("names", TypeOps::new()).unwrap();
        registry.register("string", TypeOps::new()).unwrap();

        assert_eq!(registry.find("gain"), Probe::Found(0));
        assert_eq!(registry.find("names"), Probe::Found(1));
        assert_eq!(registry.find("string"), Probe::Found(2));

        assert_eq!(registry.find("aaa"), Probe::InsertAt(0));
        assert_eq!(registry.find("mode"), Probe::InsertAt(1));
        assert_eq!(registry.find("zeta"), Probe::InsertAt(3));
    }

    #[test]
    fn register_at_shifts_the_tail() {
        let mut registry = TypeRegistry::new();
        registry.register_at(0, "names", TypeOps::new()).unwrap();
        registry.register_at(0, "gain", TypeOps::new()).unwrap();
        registry.register_at(2, "string", TypeOps::new()).unwrap();

        let names: Vec<&str> = registry.names().collect();
        assert_eq!(names, vec!["gain", "names", "string"]);
    }

    #[test]
    fn register_at_rejects_a_gapped_index() {
        let mut registry = TypeRegistry::new();
        let outcome = registry.register_at(3, "names", TypeOps::new());
        assert!(matches!(
            outcome,
            Err(RegistryError::OutOfRange { index: 3, len: 0 })
        ));
        assert!(registry.is_empty());
    }

    #[test]
    fn get_resolves_only_registered_names() {
        let mut registry = TypeRegistry::new();
        registry.register("names", TypeOps::new()).unwrap();

        assert!(registry.get("names").is_some());
        assert!(registry.get("string").is_none());
        assert!(registry.contains("names"));
        assert!(!registry.contains("string"));
    }
}
