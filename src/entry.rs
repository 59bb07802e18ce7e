use std::any::Any;
use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fmt;

use log::debug;

use crate::error::RegistryError;
use crate::ops::{TypeOps, Value};
use crate::report::Reporter;

/// A registered type: its name, its behavior contract, and the ordered
/// store of values held under it.
///
/// Entries are created and destroyed only by the registry. The store is
/// absent until the first value lands in it; a freshly registered type
/// therefore costs one name and one hook set. When the entry is dropped
/// (deregistration, teardown, or the registry itself going away), every
/// contained value is released through the type's `free` hook, or simply
/// dropped when the hook is unset.
pub struct TypeEntry {
    name: String,
    store: Option<BTreeMap<String, Value>>,
    ops: TypeOps,
}

impl TypeEntry {
    pub(crate) fn new(name: String, ops: TypeOps) -> Self {
        Self {
            name,
            store: None,
            ops,
        }
    }

    /// The type's name, the registry's sort and search key.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The behavior contract frozen when the type was registered.
    pub fn ops(&self) -> TypeOps {
        self.ops
    }

    /// Number of values stored under this type.
    pub fn len(&self) -> usize {
        self.store.as_ref().map_or(0, BTreeMap::len)
    }

    /// True when the type holds no values (including before its store
    /// exists).
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True when a value is stored under `key`.
    pub fn contains_key(&self, key: &str) -> bool {
        self.store
            .as_ref()
            .is_some_and(|map| map.contains_key(key))
    }

    /// Borrows the value stored under `key`, if any.
    pub fn get(&self, key: &str) -> Option<&(dyn Any + Send)> {
        self.store.as_ref()?.get(key).map(|value| value.as_ref())
    }

    /// Keys stored under this type, in lexicographic order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.store
            .iter()
            .flat_map(|map| map.keys())
            .map(String::as_str)
    }

    /// Inserts `value` under `key`, creating the store on first use.
    ///
    /// Ownership of the value transfers here unconditionally: on a key
    /// collision it is released through the type's `free` hook and
    /// `DuplicateKey` comes back, with the store keeping its original
    /// entry.
    pub(crate) fn insert(&mut self, key: &str, value: Value) -> Result<(), RegistryError> {
        let ops = self.ops;
        let name = &self.name;
        let map = self.store.get_or_insert_with(|| {
            debug!("creating store for type <{}>", name);
            BTreeMap::new()
        });

        match map.entry(key.to_owned()) {
            btree_map::Entry::Occupied(_) => {
                if let Some(free) = ops.free {
                    free(value);
                }
                Err(RegistryError::DuplicateKey {
                    type_name: self.name.clone(),
                    key: key.to_owned(),
                })
            }
            btree_map::Entry::Vacant(slot) => {
                slot.insert(value);
                debug!("inserted <{}> into the store for type <{}>", key, self.name);
                Ok(())
            }
        }
    }

    /// Emits this type's record and one record per stored entry.
    ///
    /// The type's `print` hook renders each value when set; otherwise the
    /// default stub emits the bare key. A type whose store was never
    /// created emits the name record only.
    pub fn print(&self, out: &mut dyn Reporter) {
        out.type_record(&self.name);
        if let Some(map) = &self.store {
            match self.ops.print {
                Some(print) => {
                    for value in map.values() {
                        print(out, value.as_ref());
                    }
                }
                None => {
                    for key in map.keys() {
                        out.entry_record(key);
                    }
                }
            }
        }
    }
}

impl Drop for TypeEntry {
    fn drop(&mut self) {
        debug!("destroying type <{}>", self.name);
        if let Some(map) = self.store.take() {
            if let Some(free) = self.ops.free {
                for (_, value) in map {
                    free(value);
                }
            }
        }
    }
}

impl fmt::Debug for TypeEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeEntry")
            .field("name", &self.name)
            .field("entries", &self.len())
            .field("ops", &self.ops)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::LineBuffer;

    #[test]
    fn store_is_created_lazily() {
        let mut entry = TypeEntry::new("names".to_owned(), TypeOps::new());
        assert_eq!(entry.len(), 0);
        assert!(entry.is_empty());
        assert!(!entry.contains_key("john"));

        entry.insert("john", Box::new(())).unwrap();
        assert_eq!(entry.len(), 1);
        assert!(entry.contains_key("john"));
    }

    #[test]
    fn keys_iterate_in_lexicographic_order() {
        let mut entry = TypeEntry::new("names".to_owned(), TypeOps::new());
        entry.insert("perry", Box::new(())).unwrap();
        entry.insert("adam", Box::new(())).unwrap();
        entry.insert("john", Box::new(())).unwrap();

        let keys: Vec<&str> = entry.keys().collect();
        assert_eq!(keys, vec!["adam", "john", "perry"]);
    }

    #[test]
    fn print_without_store_emits_name_only() {
        let entry = TypeEntry::new("names".to_owned(), TypeOps::new());
        let mut out = LineBuffer::new();
        entry.print(&mut out);
        assert_eq!(out.into_lines(), vec!["type names"]);
    }

    #[test]
    fn print_uses_the_print_hook_when_set() {
        fn shout(out: &mut dyn Reporter, value: &(dyn Any + Send)) {
            if let Some(text) = value.downcast_ref::<&str>() {
                out.entry_record(&text.to_uppercase());
            }
        }

        let ops = TypeOps {
            print: Some(shout),
            ..TypeOps::new()
        };
        let mut entry = TypeEntry::new("names".to_owned(), ops);
        entry.insert("john", Box::new("john")).unwrap();

        let mut out = LineBuffer::new();
        entry.print(&mut out);
        assert_eq!(out.into_lines(), vec!["type names", "JOHN"]);
    }

    #[test]
    fn duplicate_insert_keeps_the_original() {
        let mut entry = TypeEntry::new("gain".to_owned(), TypeOps::new());
        entry.insert("adc0", Box::new(1i32)).unwrap();

        let outcome = entry.insert("adc0", Box::new(2i32));
        assert!(matches!(
            outcome,
            Err(RegistryError::DuplicateKey { ref key, .. }) if key == "adc0"
        ));

        let stored = entry.get("adc0").and_then(|v| v.downcast_ref::<i32>());
        assert_eq!(stored, Some(&1));
    }
}
