//! Relocatable memory blocks backing the Handle suite.
//!
//! A block handle is the address of a `#[repr(C)]` [`MasterRecord`] owned by the
//! table. The record's first field points at the block's bytes, so a plugin that
//! dereferences the handle directly (the classic `*handle` idiom) reaches the
//! data, and the handle itself never moves while the block lives.
//!
//! # Locking
//!
//! `set_lock(true)` pins the block and returns its data address; while locked the
//! block cannot be resized. Unlocking invalidates the address from the caller's
//! point of view.
//!
//! # Disposal notifications
//!
//! Other components may keep side tables keyed by block handle. They register a
//! [`DisposalListener`]; [`BlockTable::dispose`] notifies every live listener
//! synchronously, before the block's storage is released. Listeners observe the
//! disposal; they never own or free the block.

use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};

use suite_core::limits::MAX_BLOCK_BYTES;
use suite_core::{opaque_handle, OpaqueHandle, SuiteError, SuiteResult};
use tracing::{debug, warn};

use crate::{Allocation, BlockAllocator};

opaque_handle!(
    /// Memory block (`Handle`); the raw value is the master record's address.
    BlockHandle
);

/// What native code sees behind a block handle.
#[repr(C)]
#[derive(Debug)]
pub struct MasterRecord {
    /// Address of the block's bytes.
    pub data: *mut u8,
    /// Logical size in bytes.
    pub size: i32,
}

/// Observer of block disposal.
pub trait DisposalListener {
    /// Called synchronously when `handle` is disposed.
    fn block_disposed(&self, handle: BlockHandle);
}

struct Block {
    record: Box<MasterRecord>,
    storage: Allocation,
    locked: bool,
}

impl Block {
    fn refresh_record(&mut self) {
        self.record.data = self.storage.as_mut_ptr();
        // Sizes are capped at MAX_BLOCK_BYTES, which fits in i32.
        self.record.size = i32::try_from(self.storage.len()).unwrap_or(i32::MAX);
    }
}

/// Table of live memory blocks.
pub struct BlockTable {
    blocks: HashMap<BlockHandle, Block>,
    allocator: Rc<dyn BlockAllocator>,
    listeners: Vec<Weak<dyn DisposalListener>>,
}

impl BlockTable {
    /// Create an empty table drawing storage from `allocator`.
    pub fn new(allocator: Rc<dyn BlockAllocator>) -> Self {
        Self {
            blocks: HashMap::new(),
            allocator,
            listeners: Vec::new(),
        }
    }

    /// Allocate a zero-filled block of `size` bytes.
    pub fn new_block(&mut self, size: usize) -> SuiteResult<BlockHandle> {
        if size > MAX_BLOCK_BYTES {
            return Err(SuiteError::OutOfMemory);
        }
        let storage = Allocation::new(&self.allocator, size)?;
        self.blocks.try_reserve(1)?;

        let mut block = Block {
            record: Box::new(MasterRecord {
                data: std::ptr::null_mut(),
                size: 0,
            }),
            storage,
            locked: false,
        };
        block.refresh_record();

        let handle = BlockHandle(&*block.record as *const MasterRecord as usize);
        self.blocks.insert(handle, block);
        debug!(%handle, size, "memory block allocated");
        Ok(handle)
    }

    /// Allocate a block holding a copy of `bytes`.
    pub fn new_block_from(&mut self, bytes: &[u8]) -> SuiteResult<BlockHandle> {
        let handle = self.new_block(bytes.len())?;
        self.bytes_mut(handle)?.copy_from_slice(bytes);
        Ok(handle)
    }

    /// Dispose a block, notifying every subscribed listener first.
    pub fn dispose(&mut self, handle: BlockHandle) -> SuiteResult<()> {
        if !self.blocks.contains_key(&handle) {
            warn!(%handle, "dispose of unknown memory block ignored");
            return Err(SuiteError::BadParameter);
        }

        self.listeners.retain(|listener| match listener.upgrade() {
            Some(listener) => {
                listener.block_disposed(handle);
                true
            }
            None => false,
        });

        if let Some(block) = self.blocks.remove(&handle) {
            if block.locked {
                debug!(%handle, "disposing a locked memory block");
            }
        }
        debug!(%handle, "memory block disposed");
        Ok(())
    }

    /// Lock or unlock a block.
    ///
    /// Returns the data address while locked (null after unlocking) and the
    /// previous lock state.
    pub fn set_lock(&mut self, handle: BlockHandle, lock: bool) -> SuiteResult<(*mut u8, bool)> {
        let block = self.block_mut(handle)?;
        let was_locked = block.locked;
        block.locked = lock;
        let address = if lock {
            block.storage.as_mut_ptr()
        } else {
            std::ptr::null_mut()
        };
        Ok((address, was_locked))
    }

    /// Whether the block is currently locked.
    pub fn is_locked(&self, handle: BlockHandle) -> SuiteResult<bool> {
        Ok(self.block(handle)?.locked)
    }

    /// Logical size of a block.
    pub fn size(&self, handle: BlockHandle) -> SuiteResult<usize> {
        Ok(self.block(handle)?.storage.len())
    }

    /// Resize an unlocked block, preserving its leading bytes.
    pub fn set_size(&mut self, handle: BlockHandle, new_size: usize) -> SuiteResult<()> {
        let block = self.blocks.get_mut(&handle).ok_or(SuiteError::NilHandle)?;
        if block.locked {
            warn!(%handle, "resize of locked memory block refused");
            return Err(SuiteError::BadParameter);
        }
        if new_size > MAX_BLOCK_BYTES {
            return Err(SuiteError::OutOfMemory);
        }
        block.storage.resize(new_size)?;
        block.refresh_record();
        Ok(())
    }

    /// Contents of a block.
    pub fn bytes(&self, handle: BlockHandle) -> SuiteResult<&[u8]> {
        Ok(self.block(handle)?.storage.as_slice())
    }

    /// Mutable contents of a block.
    pub fn bytes_mut(&mut self, handle: BlockHandle) -> SuiteResult<&mut [u8]> {
        Ok(self.block_mut(handle)?.storage.as_mut_slice())
    }

    /// Whether `handle` names a live block.
    pub fn contains(&self, handle: BlockHandle) -> bool {
        self.blocks.contains_key(&handle)
    }

    /// Number of live blocks.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Whether no blocks are live.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Register a disposal listener. Dropped listeners are pruned lazily.
    pub fn subscribe(&mut self, listener: Weak<dyn DisposalListener>) {
        self.listeners.push(listener);
    }

    /// Bytes the backing allocator can still provide.
    pub fn available(&self) -> usize {
        self.allocator.available()
    }

    fn block(&self, handle: BlockHandle) -> SuiteResult<&Block> {
        if handle.is_null() {
            return Err(SuiteError::BadParameter);
        }
        self.blocks.get(&handle).ok_or(SuiteError::BadParameter)
    }

    fn block_mut(&mut self, handle: BlockHandle) -> SuiteResult<&mut Block> {
        if handle.is_null() {
            return Err(SuiteError::BadParameter);
        }
        self.blocks.get_mut(&handle).ok_or(SuiteError::BadParameter)
    }
}

impl fmt::Debug for BlockTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockTable")
            .field("blocks", &self.blocks.len())
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{LimitedAllocator, SystemAllocator};
    use std::cell::RefCell;

    fn table() -> BlockTable {
        BlockTable::new(Rc::new(SystemAllocator))
    }

    #[derive(Default)]
    struct Recorder {
        seen: RefCell<Vec<BlockHandle>>,
    }

    impl DisposalListener for Recorder {
        fn block_disposed(&self, handle: BlockHandle) {
            self.seen.borrow_mut().push(handle);
        }
    }

    #[test]
    fn test_handle_dereferences_to_data() {
        let mut blocks = table();
        let h = blocks.new_block_from(b"abc").unwrap();

        // SAFETY: the handle is the address of the live master record.
        let record = unsafe { &*(h.0 as *const MasterRecord) };
        assert_eq!(record.size, 3);
        // SAFETY: data points at three initialised bytes owned by the table.
        let data = unsafe { std::slice::from_raw_parts(record.data, 3) };
        assert_eq!(data, b"abc");
    }

    #[test]
    fn test_lock_returns_previous_state() {
        let mut blocks = table();
        let h = blocks.new_block(8).unwrap();

        let (addr, was_locked) = blocks.set_lock(h, true).unwrap();
        assert!(!addr.is_null());
        assert!(!was_locked);

        let (_, was_locked) = blocks.set_lock(h, true).unwrap();
        assert!(was_locked);

        let (addr, was_locked) = blocks.set_lock(h, false).unwrap();
        assert!(addr.is_null());
        assert!(was_locked);
    }

    #[test]
    fn test_resize_preserves_prefix_and_refuses_locked() {
        let mut blocks = table();
        let h = blocks.new_block_from(&[1, 2, 3]).unwrap();
        blocks.set_size(h, 5).unwrap();
        assert_eq!(blocks.bytes(h).unwrap(), &[1, 2, 3, 0, 0]);

        blocks.set_lock(h, true).unwrap();
        assert_eq!(blocks.set_size(h, 1), Err(SuiteError::BadParameter));
        blocks.set_lock(h, false).unwrap();
        blocks.set_size(h, 1).unwrap();
        assert_eq!(blocks.size(h).unwrap(), 1);

        assert_eq!(blocks.set_size(BlockHandle(12), 4), Err(SuiteError::NilHandle));
    }

    #[test]
    fn test_dispose_notifies_listeners() {
        let mut blocks = table();
        let recorder = Rc::new(Recorder::default());
        let listener: Rc<dyn DisposalListener> = recorder.clone();
        blocks.subscribe(Rc::downgrade(&listener));

        let h = blocks.new_block(4).unwrap();
        blocks.dispose(h).unwrap();
        assert_eq!(*recorder.seen.borrow(), vec![h]);
        assert!(!blocks.contains(h));

        // Second dispose is reported, not repeated.
        assert_eq!(blocks.dispose(h), Err(SuiteError::BadParameter));
        assert_eq!(recorder.seen.borrow().len(), 1);
    }

    #[test]
    fn test_dropped_listener_is_pruned() {
        let mut blocks = table();
        {
            let recorder: Rc<dyn DisposalListener> = Rc::new(Recorder::default());
            blocks.subscribe(Rc::downgrade(&recorder));
        }
        let h = blocks.new_block(1).unwrap();
        blocks.dispose(h).unwrap();
        assert_eq!(blocks.listeners.len(), 0);
    }

    #[test]
    fn test_budget_exhaustion_is_out_of_memory() {
        let mut blocks = BlockTable::new(Rc::new(LimitedAllocator::new(16)));
        let h = blocks.new_block(16).unwrap();
        assert_eq!(blocks.new_block(1), Err(SuiteError::OutOfMemory));
        blocks.dispose(h).unwrap();
        assert!(blocks.new_block(1).is_ok());
    }

    #[test]
    #[tracing_test::traced_test]
    fn test_unknown_dispose_is_logged() {
        let mut blocks = table();
        let _ = blocks.dispose(BlockHandle(0x40));
        assert!(logs_contain("dispose of unknown memory block ignored"));
    }
}
