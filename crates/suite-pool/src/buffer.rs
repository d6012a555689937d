//! Plain plugin buffers.
//!
//! Buffers are keyed by the address handed to the plugin. Unlike memory blocks
//! they have no master record and cannot be locked; they are used for scratch
//! space that a plugin sizes opportunistically.
//!
//! ## Allocation policy
//!
//! ```text
//! size = requested
//! while size > minimum:
//!     try allocate(size) -> done
//!     size /= 2
//! try allocate(minimum) -> done, or out of memory
//! ```
//!
//! The allocated size is reported back so the plugin can tile its work to fit.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use suite_core::{SuiteError, SuiteResult};
use tracing::{debug, warn};

use crate::{Allocation, BlockAllocator};

struct Buffer {
    storage: Allocation,
    /// Size reported to the plugin; storage is never smaller than one byte so
    /// that zero-sized buffers still get distinct addresses.
    size: usize,
}

/// Table of live buffers keyed by address.
pub struct BufferTable {
    buffers: HashMap<usize, Buffer>,
    allocator: Rc<dyn BlockAllocator>,
}

impl BufferTable {
    /// Create an empty table drawing storage from `allocator`.
    pub fn new(allocator: Rc<dyn BlockAllocator>) -> Self {
        Self {
            buffers: HashMap::new(),
            allocator,
        }
    }

    /// Allocate a buffer following the halving policy.
    ///
    /// With no requested size, exactly `minimum` bytes are attempted. Returns the
    /// buffer address and the size actually allocated.
    pub fn allocate(&mut self, requested: Option<u32>, minimum: u32) -> SuiteResult<(*mut u8, u32)> {
        let mut size = requested.unwrap_or(minimum);
        while size > minimum {
            match self.allocate_exact(size as usize) {
                Ok(ptr) => return Ok((ptr, size)),
                Err(SuiteError::OutOfMemory) => size /= 2,
                Err(err) => return Err(err),
            }
        }

        match self.allocate_exact(minimum as usize) {
            Ok(ptr) => Ok((ptr, minimum)),
            Err(err) => {
                warn!(
                    requested = requested.unwrap_or(minimum),
                    minimum, "buffer allocation failed at minimum size"
                );
                Err(err)
            }
        }
    }

    /// Allocate exactly `size` bytes.
    pub fn allocate_exact(&mut self, size: usize) -> SuiteResult<*mut u8> {
        let mut storage = Allocation::new(&self.allocator, size.max(1))?;
        self.buffers.try_reserve(1)?;
        let ptr = storage.as_mut_ptr();
        self.buffers.insert(ptr as usize, Buffer { storage, size });
        debug!(address = ptr as usize, size, "buffer allocated");
        Ok(ptr)
    }

    /// Move a buffer's contents into a new allocation of `new_size` bytes.
    ///
    /// The old buffer is released only when the new one was obtained.
    pub fn reallocate(&mut self, ptr: *mut u8, new_size: usize) -> SuiteResult<*mut u8> {
        let old_size = self.size(ptr).ok_or(SuiteError::BadParameter)?;
        let new_ptr = self.allocate_exact(new_size)?;
        let keep = old_size.min(new_size);

        let prefix = self
            .buffers
            .get(&(ptr as usize))
            .map(|buffer| buffer.storage.as_slice()[..keep].to_vec())
            .unwrap_or_default();
        if let Some(buffer) = self.buffers.get_mut(&(new_ptr as usize)) {
            buffer.storage.as_mut_slice()[..keep].copy_from_slice(&prefix);
        }

        self.dispose(ptr)?;
        Ok(new_ptr)
    }

    /// Release a buffer.
    pub fn dispose(&mut self, ptr: *mut u8) -> SuiteResult<()> {
        match self.buffers.remove(&(ptr as usize)) {
            Some(_) => {
                debug!(address = ptr as usize, "buffer disposed");
                Ok(())
            }
            None => {
                warn!(address = ptr as usize, "dispose of unknown buffer ignored");
                Err(SuiteError::BadParameter)
            }
        }
    }

    /// Reported size of a live buffer.
    pub fn size(&self, ptr: *mut u8) -> Option<usize> {
        self.buffers.get(&(ptr as usize)).map(|buffer| buffer.size)
    }

    /// Contents of a live buffer.
    pub fn bytes(&self, ptr: *mut u8) -> Option<&[u8]> {
        self.buffers
            .get(&(ptr as usize))
            .map(|buffer| &buffer.storage.as_slice()[..buffer.size])
    }

    /// Bytes the backing allocator can still provide.
    pub fn space(&self) -> usize {
        self.allocator.available()
    }

    /// Number of live buffers.
    pub fn len(&self) -> usize {
        self.buffers.len()
    }

    /// Whether no buffers are live.
    pub fn is_empty(&self) -> bool {
        self.buffers.is_empty()
    }
}

impl fmt::Debug for BufferTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BufferTable")
            .field("buffers", &self.buffers.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{LimitedAllocator, SystemAllocator};

    #[test]
    fn test_halves_until_allocation_fits() {
        let mut buffers = BufferTable::new(Rc::new(LimitedAllocator::new(4_000)));
        let (ptr, size) = buffers.allocate(Some(1_000_000), 1_000).unwrap();
        assert!(!ptr.is_null());
        assert_eq!(size, 3_906);
        assert!(size <= 4_096 && size >= 1_000);
        assert_eq!(buffers.size(ptr), Some(3_906));
    }

    #[test]
    fn test_falls_back_to_exact_minimum() {
        // 1000 -> 500 (> 300, too big) -> 250 (<= 300) -> try exactly 300.
        let mut buffers = BufferTable::new(Rc::new(LimitedAllocator::new(400)));
        let (_, size) = buffers.allocate(Some(1_000), 300).unwrap();
        assert_eq!(size, 300);
    }

    #[test]
    fn test_never_below_minimum() {
        let mut buffers = BufferTable::new(Rc::new(LimitedAllocator::new(100)));
        assert_eq!(
            buffers.allocate(Some(10_000), 200),
            Err(SuiteError::OutOfMemory)
        );
        let (_, size) = buffers.allocate(Some(10), 50).unwrap();
        assert_eq!(size, 50);
    }

    #[test]
    fn test_missing_request_uses_minimum() {
        let mut buffers = BufferTable::new(Rc::new(SystemAllocator));
        let (_, size) = buffers.allocate(None, 64).unwrap();
        assert_eq!(size, 64);
    }

    #[test]
    fn test_zero_sized_buffers_are_distinct() {
        let mut buffers = BufferTable::new(Rc::new(SystemAllocator));
        let a = buffers.allocate_exact(0).unwrap();
        let b = buffers.allocate_exact(0).unwrap();
        assert_ne!(a, b);
        assert_eq!(buffers.size(a), Some(0));
        assert_eq!(buffers.len(), 2);
    }

    #[test]
    fn test_reallocate_keeps_prefix() {
        let mut buffers = BufferTable::new(Rc::new(SystemAllocator));
        let ptr = buffers.allocate_exact(4).unwrap();
        // SAFETY: ptr addresses four bytes owned by the table.
        unsafe { std::ptr::copy_nonoverlapping([1u8, 2, 3, 4].as_ptr(), ptr, 4) };

        let grown = buffers.reallocate(ptr, 6).unwrap();
        assert_eq!(buffers.bytes(grown), Some(&[1, 2, 3, 4, 0, 0][..]));
        assert_eq!(buffers.size(ptr), None);
        assert_eq!(buffers.dispose(ptr), Err(SuiteError::BadParameter));
    }
}
