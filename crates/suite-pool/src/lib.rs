//! Memory collaborators for the plugin suite host.
//!
//! This crate backs the two suites that hand real memory to native plugins:
//!
//! - [`BlockTable`]: relocatable, lockable, resizable memory blocks (the Handle
//!   suite), with synchronous disposal notifications
//! - [`BufferTable`]: plain buffers with the halve-until-it-fits allocation
//!   policy (the Buffer suite and the SP Basic block procedures)
//!
//! Both draw from a shared [`BlockAllocator`], so a byte budget configured for
//! the host applies to everything a plugin allocates.
//!
//! # Example
//!
//! ```
//! use std::rc::Rc;
//! use suite_pool::{BlockTable, BufferTable, LimitedAllocator};
//!
//! let allocator = Rc::new(LimitedAllocator::new(4_000));
//! let mut buffers = BufferTable::new(allocator.clone());
//! let (_ptr, size) = buffers.allocate(Some(1_000_000), 1_000).unwrap();
//! assert!(size <= 4_000 && size >= 1_000);
//!
//! let mut blocks = BlockTable::new(allocator);
//! assert!(blocks.new_block(1 << 20).is_err());
//! ```

pub mod block;
pub mod buffer;

pub use block::{BlockHandle, BlockTable, DisposalListener, MasterRecord};
pub use buffer::BufferTable;

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use suite_core::limits::MAX_BLOCK_BYTES;
use suite_core::{SuiteError, SuiteResult};

/// Source of zero-initialised byte storage.
///
/// Implementations report failure as [`SuiteError::OutOfMemory`] instead of
/// aborting, so that the suites can translate it into a status code.
pub trait BlockAllocator {
    /// Allocate `size` zeroed bytes.
    fn allocate(&self, size: usize) -> SuiteResult<Vec<u8>>;

    /// Grow or shrink `storage` to `new_size` bytes, zero-filling any growth.
    fn resize(&self, storage: &mut Vec<u8>, new_size: usize) -> SuiteResult<()>;

    /// Return `size` bytes of accounting after storage has been dropped.
    fn release(&self, size: usize);

    /// Bytes still available for allocation.
    fn available(&self) -> usize;
}

/// Allocator backed by the global heap, capped at [`MAX_BLOCK_BYTES`] per
/// allocation.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemAllocator;

impl BlockAllocator for SystemAllocator {
    fn allocate(&self, size: usize) -> SuiteResult<Vec<u8>> {
        if size > MAX_BLOCK_BYTES {
            return Err(SuiteError::OutOfMemory);
        }
        let mut storage = Vec::new();
        storage.try_reserve_exact(size)?;
        storage.resize(size, 0);
        Ok(storage)
    }

    fn resize(&self, storage: &mut Vec<u8>, new_size: usize) -> SuiteResult<()> {
        if new_size > MAX_BLOCK_BYTES {
            return Err(SuiteError::OutOfMemory);
        }
        if new_size > storage.len() {
            storage.try_reserve_exact(new_size - storage.len())?;
        }
        storage.resize(new_size, 0);
        Ok(())
    }

    fn release(&self, _size: usize) {}

    fn available(&self) -> usize {
        MAX_BLOCK_BYTES
    }
}

/// Allocator that refuses to hand out more than a fixed number of bytes in total.
pub struct LimitedAllocator {
    budget: usize,
    used: Cell<usize>,
}

impl LimitedAllocator {
    /// Create an allocator with a total budget of `budget` bytes.
    pub fn new(budget: usize) -> Self {
        Self {
            budget,
            used: Cell::new(0),
        }
    }

    /// Bytes currently accounted as in use.
    pub fn used(&self) -> usize {
        self.used.get()
    }

    fn reserve(&self, size: usize) -> SuiteResult<()> {
        let used = self.used.get();
        match used.checked_add(size) {
            Some(total) if total <= self.budget => {
                self.used.set(total);
                Ok(())
            }
            _ => Err(SuiteError::OutOfMemory),
        }
    }
}

impl fmt::Debug for LimitedAllocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LimitedAllocator")
            .field("budget", &self.budget)
            .field("used", &self.used.get())
            .finish()
    }
}

impl BlockAllocator for LimitedAllocator {
    fn allocate(&self, size: usize) -> SuiteResult<Vec<u8>> {
        self.reserve(size)?;
        SystemAllocator.allocate(size).map_err(|err| {
            self.release(size);
            err
        })
    }

    fn resize(&self, storage: &mut Vec<u8>, new_size: usize) -> SuiteResult<()> {
        let old_size = storage.len();
        if new_size > old_size {
            self.reserve(new_size - old_size)?;
            if let Err(err) = SystemAllocator.resize(storage, new_size) {
                self.release(new_size - old_size);
                return Err(err);
            }
        } else {
            storage.truncate(new_size);
            storage.shrink_to_fit();
            self.release(old_size - new_size);
        }
        Ok(())
    }

    fn release(&self, size: usize) {
        self.used.set(self.used.get().saturating_sub(size));
    }

    fn available(&self) -> usize {
        self.budget.saturating_sub(self.used.get())
    }
}

/// Storage drawn from a [`BlockAllocator`], returned to its accounting on drop.
pub(crate) struct Allocation {
    bytes: Vec<u8>,
    allocator: Rc<dyn BlockAllocator>,
}

impl Allocation {
    pub(crate) fn new(allocator: &Rc<dyn BlockAllocator>, size: usize) -> SuiteResult<Self> {
        let bytes = allocator.allocate(size)?;
        Ok(Self {
            bytes,
            allocator: Rc::clone(allocator),
        })
    }

    pub(crate) fn resize(&mut self, new_size: usize) -> SuiteResult<()> {
        self.allocator.resize(&mut self.bytes, new_size)
    }

    pub(crate) fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.bytes
    }

    pub(crate) fn as_mut_ptr(&mut self) -> *mut u8 {
        self.bytes.as_mut_ptr()
    }

    pub(crate) fn len(&self) -> usize {
        self.bytes.len()
    }
}

impl Drop for Allocation {
    fn drop(&mut self) {
        self.allocator.release(self.bytes.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limited_allocator_budget() {
        let alloc = LimitedAllocator::new(100);
        let a = alloc.allocate(60).unwrap();
        assert_eq!(a.len(), 60);
        assert_eq!(alloc.available(), 40);
        assert_eq!(alloc.allocate(41), Err(SuiteError::OutOfMemory));
        alloc.release(60);
        assert_eq!(alloc.available(), 100);
    }

    #[test]
    fn test_limited_allocator_resize() {
        let alloc = LimitedAllocator::new(100);
        let mut storage = alloc.allocate(10).unwrap();
        alloc.resize(&mut storage, 50).unwrap();
        assert_eq!(storage.len(), 50);
        assert_eq!(alloc.used(), 50);
        assert_eq!(alloc.resize(&mut storage, 101), Err(SuiteError::OutOfMemory));
        assert_eq!(storage.len(), 50);
        alloc.resize(&mut storage, 5).unwrap();
        assert_eq!(alloc.used(), 5);
    }

    #[test]
    fn test_allocation_releases_on_drop() {
        let limited = Rc::new(LimitedAllocator::new(64));
        let allocator: Rc<dyn BlockAllocator> = limited.clone();
        {
            let mut allocation = Allocation::new(&allocator, 32).unwrap();
            allocation.resize(48).unwrap();
            assert_eq!(allocation.len(), 48);
            assert_eq!(limited.used(), 48);
        }
        assert_eq!(limited.used(), 0);
    }

    #[test]
    fn test_system_allocator_zero_fills() {
        let mut storage = SystemAllocator.allocate(4).unwrap();
        storage[0] = 9;
        SystemAllocator.resize(&mut storage, 8).unwrap();
        assert_eq!(storage, vec![9, 0, 0, 0, 0, 0, 0, 0]);
    }
}
