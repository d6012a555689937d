//! Bookkeeping for acquired suite tables.
//!
//! The first acquisition of a name and version builds its dispatch table;
//! later acquisitions return the same address and bump a count. The table is
//! dropped when every acquisition has been released, so an address stays
//! valid for as long as any caller holds it.

use std::collections::HashMap;
use std::ffi::c_void;

use tracing::{debug, warn};

use crate::tables::{
    ActionDescriptorProcs1, ActionDescriptorProcs2, ActionListProcs1, ActionReferenceProcs2,
    BufferSuite1, ColorSpaceSuite1, HandleSuite1, HandleSuite2, SPBasicSuite4, ZStringSuite1,
};
use crate::version::{negotiate, SuiteAcquireError, SuiteKey, SuiteKind};

/// An owned dispatch table of one concrete suite version.
pub enum SuiteTable {
    Basic4(Box<SPBasicSuite4>),
    ZString1(Box<ZStringSuite1>),
    Descriptor1(Box<ActionDescriptorProcs1>),
    Descriptor2(Box<ActionDescriptorProcs2>),
    List1(Box<ActionListProcs1>),
    Reference2(Box<ActionReferenceProcs2>),
    Handle1(Box<HandleSuite1>),
    Handle2(Box<HandleSuite2>),
    Buffer1(Box<BufferSuite1>),
    ColorSpace1(Box<ColorSpaceSuite1>),
}

impl SuiteTable {
    /// Suite and version this table implements.
    pub fn key(&self) -> SuiteKey {
        let (kind, version) = match self {
            SuiteTable::Basic4(_) => (SuiteKind::Basic, 4),
            SuiteTable::ZString1(_) => (SuiteKind::ZString, 1),
            SuiteTable::Descriptor1(_) => (SuiteKind::ActionDescriptor, 1),
            SuiteTable::Descriptor2(_) => (SuiteKind::ActionDescriptor, 2),
            SuiteTable::List1(_) => (SuiteKind::ActionList, 1),
            SuiteTable::Reference2(_) => (SuiteKind::ActionReference, 2),
            SuiteTable::Handle1(_) => (SuiteKind::Handle, 1),
            SuiteTable::Handle2(_) => (SuiteKind::Handle, 2),
            SuiteTable::Buffer1(_) => (SuiteKind::Buffer, 1),
            SuiteTable::ColorSpace1(_) => (SuiteKind::ColorSpace, 1),
        };
        SuiteKey { kind, version }
    }

    /// Address handed to the plugin.
    pub fn as_ptr(&self) -> *const c_void {
        match self {
            SuiteTable::Basic4(t) => &**t as *const SPBasicSuite4 as *const c_void,
            SuiteTable::ZString1(t) => &**t as *const ZStringSuite1 as *const c_void,
            SuiteTable::Descriptor1(t) => &**t as *const ActionDescriptorProcs1 as *const c_void,
            SuiteTable::Descriptor2(t) => &**t as *const ActionDescriptorProcs2 as *const c_void,
            SuiteTable::List1(t) => &**t as *const ActionListProcs1 as *const c_void,
            SuiteTable::Reference2(t) => &**t as *const ActionReferenceProcs2 as *const c_void,
            SuiteTable::Handle1(t) => &**t as *const HandleSuite1 as *const c_void,
            SuiteTable::Handle2(t) => &**t as *const HandleSuite2 as *const c_void,
            SuiteTable::Buffer1(t) => &**t as *const BufferSuite1 as *const c_void,
            SuiteTable::ColorSpace1(t) => &**t as *const ColorSpaceSuite1 as *const c_void,
        }
    }
}

impl std::fmt::Debug for SuiteTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SuiteTable")
            .field("key", &self.key())
            .field("address", &self.as_ptr())
            .finish()
    }
}

/// Builds dispatch tables for negotiated suites.
pub trait SuiteProvider {
    /// Build a table for `key`. `key` is always one of the offered versions.
    fn build(&self, key: SuiteKey) -> SuiteTable;
}

#[derive(Debug)]
struct Acquired {
    table: SuiteTable,
    count: usize,
}

/// Outstanding suite acquisitions, keyed by suite and version.
#[derive(Debug, Default)]
pub struct SuiteRegistry {
    outstanding: HashMap<SuiteKey, Acquired>,
}

impl SuiteRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Negotiate `name`/`version` and return its table, building it on first
    /// use. Each call must be balanced by a [`release`](Self::release).
    pub fn acquire(
        &mut self,
        provider: &dyn SuiteProvider,
        name: &str,
        version: i32,
    ) -> Result<*const c_void, SuiteAcquireError> {
        let key = negotiate(name, version).map_err(|err| {
            warn!(name, version, "suite acquisition refused: {}", err);
            err
        })?;

        let acquired = self.outstanding.entry(key).or_insert_with(|| {
            let table = provider.build(key);
            debug_assert_eq!(table.key(), key);
            debug!(suite = %key, address = ?table.as_ptr(), "suite table built");
            Acquired { table, count: 0 }
        });
        acquired.count += 1;
        let address = acquired.table.as_ptr();
        debug!(suite = %key, ?address, count = acquired.count, "suite acquired");
        Ok(address)
    }

    /// Release one acquisition of `name`/`version`; the table is dropped with
    /// the last one.
    pub fn release(&mut self, name: &str, version: i32) -> Result<(), SuiteAcquireError> {
        let key = negotiate(name, version)?;
        let acquired = self
            .outstanding
            .get_mut(&key)
            .ok_or(SuiteAcquireError::NotAcquired(key))?;
        acquired.count -= 1;
        let remaining = acquired.count;
        if remaining == 0 {
            self.outstanding.remove(&key);
        }
        debug!(suite = %key, remaining, "suite released");
        Ok(())
    }

    /// Number of unreleased acquisitions of `key`.
    pub fn outstanding(&self, key: SuiteKey) -> usize {
        self.outstanding.get(&key).map_or(0, |acquired| acquired.count)
    }

    /// Number of unreleased acquisitions across all suites.
    pub fn total_outstanding(&self) -> usize {
        self.outstanding.values().map(|acquired| acquired.count).sum()
    }

    /// Drop every outstanding table.
    pub fn clear(&mut self) {
        let leaked = self.total_outstanding();
        if leaked > 0 {
            debug!(leaked, "dropping unreleased suite tables");
        }
        self.outstanding.clear();
    }
}
