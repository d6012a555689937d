//! Opaque handles and the tables that mint them.
//!
//! A handle is a process-local integer that native code treats as a pointer.
//! Only the [`HandleTable`] that issued a handle may interpret it; everything else
//! compares it by value.
//!
//! # Minting policy
//!
//! Each table owns a counter. Minting increments it and uses the new value, so the
//! first handle is `1` and `0` stays the null handle. Freeing the handle equal to
//! the counter decrements the counter (stack reuse); freeing any other handle
//! leaves it alone. Every live handle is therefore `<= counter`, and a freshly
//! minted handle can never collide with a live one.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;

use crate::error::{SuiteError, SuiteResult};

/// Integer token that a table can mint and look up.
pub trait OpaqueHandle: Copy + Eq + Hash + fmt::Debug {
    /// Wrap a raw token.
    fn from_raw(raw: usize) -> Self;

    /// The raw token handed to native code.
    fn raw(self) -> usize;

    /// The null token.
    fn null() -> Self {
        Self::from_raw(0)
    }

    /// Whether this is the null token.
    fn is_null(self) -> bool {
        self.raw() == 0
    }
}

/// Declare a handle newtype implementing [`OpaqueHandle`].
#[macro_export]
macro_rules! opaque_handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
        #[repr(transparent)]
        pub struct $name(pub usize);

        impl $crate::handle::OpaqueHandle for $name {
            #[inline]
            fn from_raw(raw: usize) -> Self {
                Self(raw)
            }

            #[inline]
            fn raw(self) -> usize {
                self.0
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                write!(f, "{}#{}", stringify!($name), self.0)
            }
        }
    };
}

opaque_handle!(
    /// Interned string (`ASZString`).
    ZStringHandle
);
opaque_handle!(
    /// Action descriptor (`PIActionDescriptor`).
    DescriptorHandle
);
opaque_handle!(
    /// Action list (`PIActionList`).
    ListHandle
);
opaque_handle!(
    /// Action reference cursor (`PIActionReference`).
    ReferenceHandle
);
opaque_handle!(
    /// Color object (`ColorID`).
    ColorHandle
);

/// Largest raw value a table will mint.
///
/// Kept below the 31-bit boundary so that handles survive callers that squeeze
/// them through 32-bit signed storage.
pub const MAX_MINTED: usize = 0x3FFF_FFFF;

/// Arena of entries keyed by a minted handle.
pub struct HandleTable<H, T> {
    entries: HashMap<H, T>,
    counter: usize,
    _handle: PhantomData<H>,
}

impl<H: OpaqueHandle, T> Default for HandleTable<H, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: OpaqueHandle, T> HandleTable<H, T> {
    /// Create an empty table.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            counter: 0,
            _handle: PhantomData,
        }
    }

    /// Store `value` under a newly minted handle.
    pub fn insert(&mut self, value: T) -> SuiteResult<H> {
        if self.counter >= MAX_MINTED {
            return Err(SuiteError::OutOfMemory);
        }
        self.entries.try_reserve(1)?;
        self.counter += 1;
        let handle = H::from_raw(self.counter);
        self.entries.insert(handle, value);
        Ok(handle)
    }

    /// Remove the entry for `handle`, applying the stack-reuse rule.
    pub fn remove(&mut self, handle: H) -> SuiteResult<T> {
        let value = self
            .entries
            .remove(&handle)
            .ok_or(SuiteError::BadParameter)?;
        if handle.raw() == self.counter {
            self.counter -= 1;
        }
        Ok(value)
    }

    /// Borrow the entry for `handle`.
    pub fn get(&self, handle: H) -> SuiteResult<&T> {
        self.entries.get(&handle).ok_or(SuiteError::BadParameter)
    }

    /// Mutably borrow the entry for `handle`.
    pub fn get_mut(&mut self, handle: H) -> SuiteResult<&mut T> {
        self.entries.get_mut(&handle).ok_or(SuiteError::BadParameter)
    }

    /// Whether `handle` names a live entry.
    pub fn contains(&self, handle: H) -> bool {
        self.entries.contains_key(&handle)
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Current value of the minting counter.
    pub fn counter(&self) -> usize {
        self.counter
    }

    /// Drop every entry and reset the counter.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.counter = 0;
    }
}

impl<H: OpaqueHandle, T> fmt::Debug for HandleTable<H, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandleTable")
            .field("len", &self.entries.len())
            .field("counter", &self.counter)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_handle_is_one() {
        let mut table: HandleTable<ListHandle, &str> = HandleTable::new();
        let h = table.insert("a").unwrap();
        assert_eq!(h, ListHandle(1));
        assert!(!h.is_null());
        assert!(ListHandle::null().is_null());
    }

    #[test]
    fn test_freeing_newest_rewinds_counter() {
        let mut table: HandleTable<ListHandle, u8> = HandleTable::new();
        let a = table.insert(1).unwrap();
        let b = table.insert(2).unwrap();
        assert_eq!(table.counter(), 2);

        table.remove(b).unwrap();
        assert_eq!(table.counter(), 1);
        assert_eq!(table.insert(3).unwrap(), b);

        // Freeing an older handle leaves the counter alone.
        table.remove(a).unwrap();
        assert_eq!(table.counter(), 2);
        assert_eq!(table.insert(4).unwrap(), ListHandle(3));
    }

    #[test]
    fn test_no_collision_after_out_of_order_free() {
        let mut table: HandleTable<ListHandle, u8> = HandleTable::new();
        let a = table.insert(1).unwrap();
        let b = table.insert(2).unwrap();
        let c = table.insert(3).unwrap();
        table.remove(b).unwrap();
        table.remove(c).unwrap();
        let d = table.insert(4).unwrap();
        assert_eq!(d, c);
        assert_eq!(*table.get(a).unwrap(), 1);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_unknown_handle_is_bad_parameter() {
        let mut table: HandleTable<ListHandle, u8> = HandleTable::new();
        assert_eq!(table.get(ListHandle(7)), Err(SuiteError::BadParameter));
        let h = table.insert(1).unwrap();
        table.remove(h).unwrap();
        assert_eq!(table.remove(h), Err(SuiteError::BadParameter));
    }
}
