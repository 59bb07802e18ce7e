use std::any::Any;
use std::cmp::Ordering;

use crate::report::Reporter;

/// An opaque owned value held by a type's store.
///
/// Ownership transfers into the store on insertion. Every release path
/// pushes the value through its type's `free` hook when one is set, and
/// the box reclaims the memory either way.
pub type Value = Box<dyn Any + Send>;

/// Renders one stored value as a record on the output sink.
pub type PrintFn = fn(&mut dyn Reporter, &(dyn Any + Send));

/// Disposes one value on release; consumes it.
pub type FreeFn = fn(Value);

/// Produces an owned duplicate of a value, when the type supports it.
pub type CopyFn = fn(&(dyn Any + Send)) -> Option<Value>;

/// Orders two values of the same type.
pub type CompareFn = fn(&(dyn Any + Send), &(dyn Any + Send)) -> Ordering;

/// Builds a value from protocol arguments, when the type supports it.
pub type ParseFn = fn(&[&str]) -> Option<Value>;

/// The behavior contract of a registered type.
///
/// Exactly five hooks (print, free, copy, compare, parse), each either a
/// concrete function or unset. The set a type is created with becomes its
/// frozen contract: every later writer to that type must present the same
/// set. Equality is hook **identity** (function address), never behavior,
/// so two distinct functions with identical bodies do not match.
///
/// # Examples
///
/// ```
/// use typereg::{Reporter, TypeOps};
/// use std::any::Any;
///
/// fn show(out: &mut dyn Reporter, value: &(dyn Any + Send)) {
///     if let Some(text) = value.downcast_ref::<String>() {
///         out.entry_record(text);
///     }
/// }
///
/// let ops = TypeOps { print: Some(show), ..TypeOps::new() };
/// assert_eq!(ops, TypeOps { print: Some(show), ..TypeOps::new() });
/// assert_ne!(ops, TypeOps::new());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TypeOps {
    pub print: Option<PrintFn>,
    pub free: Option<FreeFn>,
    pub copy: Option<CopyFn>,
    pub compare: Option<CompareFn>,
    pub parse: Option<ParseFn>,
}

impl TypeOps {
    /// The all-unset contract.
    pub const fn new() -> Self {
        Self {
            print: None,
            free: None,
            copy: None,
            compare: None,
            parse: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn show_plain(out: &mut dyn Reporter, _value: &(dyn Any + Send)) {
        out.entry_record("plain");
    }

    fn show_loud(out: &mut dyn Reporter, _value: &(dyn Any + Send)) {
        out.entry_record("LOUD");
    }

    fn discard(_value: Value) {}

    #[test]
    fn hook_sets_compare_by_identity() {
        let a = TypeOps {
            print: Some(show_plain),
            ..TypeOps::new()
        };
        let b = TypeOps {
            print: Some(show_plain),
            ..TypeOps::new()
        };
        let c = TypeOps {
            print: Some(show_loud),
            ..TypeOps::new()
        };

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, TypeOps::new());
    }

    #[test]
    fn partial_overlap_is_still_a_mismatch() {
        let print_only = TypeOps {
            print: Some(show_plain),
            ..TypeOps::new()
        };
        let print_and_free = TypeOps {
            print: Some(show_plain),
            free: Some(discard),
            ..TypeOps::new()
        };

        assert_ne!(print_only, print_and_free);
    }

    #[test]
    fn unset_contract_is_the_default() {
        assert_eq!(TypeOps::new(), TypeOps::default());
    }
}
