//! Insertion-ordered descriptors behind the Action Descriptor suite.
//!
//! # Snapshots as memory blocks
//!
//! `as_handle` freezes a deep copy of a descriptor into a memory block: the
//! block holds the persisted binary form, and a side table keyed by block
//! handle keeps the frozen tree itself. `handle_to_descriptor` prefers the side
//! table and falls back to decoding the block, so blocks written by an earlier
//! host session still convert.
//!
//! The side table observes block disposal and drops its entry; it never owns
//! or frees the block.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use suite_core::terms::{DescriptorKeyId, DescriptorTypeId};
use suite_core::{DescriptorHandle, HandleTable, SuiteError, SuiteResult};
use suite_pool::{BlockHandle, BlockTable, DisposalListener};
use tracing::{debug, warn};

use crate::list::leading_integers;
use crate::persist;
use crate::scripting::ScriptingDictionary;
use crate::value::{AeteValue, Descriptor, TaggedValue};

#[derive(Debug, Default)]
struct FrozenSnapshots {
    by_block: RefCell<HashMap<BlockHandle, Descriptor>>,
}

impl DisposalListener for FrozenSnapshots {
    fn block_disposed(&self, handle: BlockHandle) {
        if self.by_block.borrow_mut().remove(&handle).is_some() {
            debug!(%handle, "frozen descriptor dropped with its block");
        }
    }
}

/// Table of live action descriptors.
#[derive(Debug, Default)]
pub struct ActionDescriptorTable {
    descriptors: HandleTable<DescriptorHandle, Descriptor>,
    snapshots: Rc<FrozenSnapshots>,
    dictionary: ScriptingDictionary,
}

impl ActionDescriptorTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Table whose stored values take their flags from `dictionary`.
    pub fn with_dictionary(dictionary: ScriptingDictionary) -> Self {
        Self {
            dictionary,
            ..Self::default()
        }
    }

    pub fn set_dictionary(&mut self, dictionary: ScriptingDictionary) {
        self.dictionary = dictionary;
    }

    pub fn dictionary(&self) -> &ScriptingDictionary {
        &self.dictionary
    }

    /// Listener to subscribe on the block table backing `as_handle`.
    pub fn disposal_listener(&self) -> Weak<dyn DisposalListener> {
        let listener: Rc<dyn DisposalListener> = self.snapshots.clone();
        Rc::downgrade(&listener)
    }

    pub fn make(&mut self) -> SuiteResult<DescriptorHandle> {
        self.insert(Descriptor::new())
    }

    /// Register an existing tree under a new handle.
    pub fn insert(&mut self, descriptor: Descriptor) -> SuiteResult<DescriptorHandle> {
        let handle = self.descriptors.insert(descriptor)?;
        debug!(%handle, "action descriptor created");
        Ok(handle)
    }

    pub fn free(&mut self, descriptor: DescriptorHandle) -> SuiteResult<()> {
        self.descriptors.remove(descriptor).map_err(|err| {
            warn!(handle = %descriptor, "free of unknown action descriptor");
            err
        })?;
        debug!(handle = %descriptor, "action descriptor freed");
        Ok(())
    }

    pub fn descriptor(&self, descriptor: DescriptorHandle) -> SuiteResult<&Descriptor> {
        self.descriptors.get(descriptor)
    }

    /// Value under `key`; bad-parameter when the key is absent.
    pub fn value(&self, descriptor: DescriptorHandle, key: DescriptorKeyId) -> SuiteResult<&AeteValue> {
        self.descriptor(descriptor)?.value(key)
    }

    /// Store `value` under `key`, annotated from the scripting dictionary.
    pub fn put(&mut self, descriptor: DescriptorHandle, key: DescriptorKeyId, value: AeteValue) -> SuiteResult<()> {
        let flags = self.dictionary.flags_for(key);
        self.descriptors
            .get_mut(descriptor)?
            .insert(key, TaggedValue::with_flags(value, flags));
        Ok(())
    }

    pub fn type_of(&self, descriptor: DescriptorHandle, key: DescriptorKeyId) -> SuiteResult<DescriptorTypeId> {
        Ok(self.value(descriptor, key)?.type_id())
    }

    /// Key at insertion position `index`.
    pub fn key_at(&self, descriptor: DescriptorHandle, index: usize) -> SuiteResult<DescriptorKeyId> {
        self.descriptor(descriptor)?
            .key_at(index)
            .ok_or(SuiteError::BadParameter)
    }

    pub fn has_key(&self, descriptor: DescriptorHandle, key: DescriptorKeyId) -> SuiteResult<bool> {
        Ok(self.descriptor(descriptor)?.contains_key(key))
    }

    /// Whether every key in `keys` is present.
    pub fn has_keys(&self, descriptor: DescriptorHandle, keys: &[DescriptorKeyId]) -> SuiteResult<bool> {
        let d = self.descriptor(descriptor)?;
        Ok(keys.iter().all(|&key| d.contains_key(key)))
    }

    pub fn count(&self, descriptor: DescriptorHandle) -> SuiteResult<usize> {
        Ok(self.descriptor(descriptor)?.len())
    }

    /// Remove `key`; absent keys are not an error.
    pub fn erase(&mut self, descriptor: DescriptorHandle, key: DescriptorKeyId) -> SuiteResult<()> {
        self.descriptors.get_mut(descriptor)?.remove(key);
        Ok(())
    }

    pub fn clear(&mut self, descriptor: DescriptorHandle) -> SuiteResult<()> {
        self.descriptors.get_mut(descriptor)?.clear();
        Ok(())
    }

    /// Descriptor equality is not offered by this host.
    pub fn is_equal(&self, _a: DescriptorHandle, _b: DescriptorHandle) -> SuiteResult<bool> {
        Err(SuiteError::Unimplemented)
    }

    /// Store `values` as a list of integers under `key`.
    pub fn put_integers(&mut self, descriptor: DescriptorHandle, key: DescriptorKeyId, values: &[i32]) -> SuiteResult<()> {
        let mut items = Vec::new();
        items.try_reserve_exact(values.len())?;
        items.extend(values.iter().map(|&v| TaggedValue::new(AeteValue::Integer(v))));
        self.put(descriptor, key, AeteValue::List(items))
    }

    /// Read the leading integers of the list under `key`.
    pub fn get_integers(&self, descriptor: DescriptorHandle, key: DescriptorKeyId, out: &mut [i32]) -> SuiteResult<()> {
        leading_integers(self.value(descriptor, key)?.as_list()?, out)
    }

    /// Snapshot a live descriptor into a new memory block.
    pub fn as_handle(&mut self, descriptor: DescriptorHandle, blocks: &mut BlockTable) -> SuiteResult<BlockHandle> {
        let snapshot = self.descriptor(descriptor)?.clone();
        self.freeze(snapshot, blocks)
    }

    /// Write `snapshot` into a new memory block and remember it by block handle.
    pub fn freeze(&mut self, snapshot: Descriptor, blocks: &mut BlockTable) -> SuiteResult<BlockHandle> {
        let bytes = persist::encode(&snapshot)?;
        let block = blocks.new_block_from(&bytes)?;
        self.snapshots.by_block.borrow_mut().insert(block, snapshot);
        debug!(%block, size = bytes.len(), "descriptor frozen");
        Ok(block)
    }

    /// Tree held by a snapshot block.
    pub fn thaw(&self, block: BlockHandle, blocks: &BlockTable) -> SuiteResult<Descriptor> {
        if let Some(snapshot) = self.snapshots.by_block.borrow().get(&block) {
            return Ok(snapshot.clone());
        }
        let bytes = blocks.bytes(block)?;
        persist::decode(bytes).map_err(|err| {
            warn!(%block, "memory block is not a descriptor snapshot: {}", err);
            SuiteError::from(err)
        })
    }

    /// Fresh descriptor from a snapshot block.
    pub fn handle_to_descriptor(&mut self, block: BlockHandle, blocks: &BlockTable) -> SuiteResult<DescriptorHandle> {
        let descriptor = self.thaw(block, blocks)?;
        self.insert(descriptor)
    }

    /// Number of snapshots still tracked by block handle.
    pub fn frozen_count(&self) -> usize {
        self.snapshots.by_block.borrow().len()
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scripting::{flags, ScriptingParameter};
    use suite_core::four_char_code;
    use suite_core::terms::types;
    use suite_pool::SystemAllocator;

    const KEY_A: DescriptorKeyId = four_char_code(*b"keyA");
    const KEY_B: DescriptorKeyId = four_char_code(*b"keyB");
    const KEY_C: DescriptorKeyId = four_char_code(*b"keyC");

    fn blocks_for(table: &ActionDescriptorTable) -> BlockTable {
        let mut blocks = BlockTable::new(Rc::new(SystemAllocator));
        blocks.subscribe(table.disposal_listener());
        blocks
    }

    #[test]
    fn test_keys_enumerate_in_insertion_order() {
        let mut table = ActionDescriptorTable::new();
        let d = table.make().unwrap();
        table.put(d, KEY_C, AeteValue::Integer(1)).unwrap();
        table.put(d, KEY_A, AeteValue::Integer(2)).unwrap();
        table.put(d, KEY_B, AeteValue::Integer(3)).unwrap();

        let keys: Vec<_> = (0..3).map(|i| table.key_at(d, i).unwrap()).collect();
        assert_eq!(keys, vec![KEY_C, KEY_A, KEY_B]);
        assert_eq!(table.key_at(d, 3), Err(SuiteError::BadParameter));
        assert!(table.has_keys(d, &[KEY_A, KEY_B]).unwrap());
        assert!(!table.has_keys(d, &[KEY_A, four_char_code(*b"none")]).unwrap());
    }

    #[test]
    fn test_missing_or_mistyped_key_is_bad_parameter() {
        let mut table = ActionDescriptorTable::new();
        let d = table.make().unwrap();
        table.put(d, KEY_A, AeteValue::Float(1.0)).unwrap();

        assert_eq!(table.value(d, KEY_B), Err(SuiteError::BadParameter));
        assert_eq!(table.value(d, KEY_A).unwrap().as_integer(), Err(SuiteError::BadParameter));
        table.erase(d, KEY_B).unwrap();
        table.erase(d, KEY_A).unwrap();
        assert_eq!(table.count(d).unwrap(), 0);
    }

    #[test]
    fn test_nested_object_reports_object_type() {
        let mut table = ActionDescriptorTable::new();
        let d = table.make().unwrap();
        table
            .put(
                d,
                KEY_A,
                AeteValue::Object { class: 1, global: true, descriptor: Descriptor::new() },
            )
            .unwrap();
        assert_eq!(table.type_of(d, KEY_A).unwrap(), types::OBJECT);
    }

    #[test]
    fn test_dictionary_flags_are_recorded() {
        let dictionary: ScriptingDictionary = [ScriptingParameter {
            key: KEY_A,
            name: "amount".into(),
            type_id: types::INTEGER,
            flags: flags::OPTIONAL,
        }]
        .into_iter()
        .collect();
        let mut table = ActionDescriptorTable::with_dictionary(dictionary);
        let d = table.make().unwrap();
        table.put(d, KEY_A, AeteValue::Integer(1)).unwrap();
        table.put(d, KEY_B, AeteValue::Integer(2)).unwrap();

        let stored = table.descriptor(d).unwrap();
        assert_eq!(stored.get(KEY_A).unwrap().flags, Some(flags::OPTIONAL));
        assert_eq!(stored.get(KEY_B).unwrap().flags, None);
    }

    #[test]
    fn test_integers_round_trip_through_a_list() {
        let mut table = ActionDescriptorTable::new();
        let d = table.make().unwrap();
        table.put_integers(d, KEY_A, &[3, 4, 5]).unwrap();
        assert_eq!(table.type_of(d, KEY_A).unwrap(), types::VALUE_LIST);

        let mut out = [0; 3];
        table.get_integers(d, KEY_A, &mut out).unwrap();
        assert_eq!(out, [3, 4, 5]);

        table.put(d, KEY_B, AeteValue::List(vec![AeteValue::Boolean(true).into()])).unwrap();
        let mut one = [0; 1];
        assert_eq!(table.get_integers(d, KEY_B, &mut one), Err(SuiteError::LogicError));
    }

    #[test]
    fn test_as_handle_is_independent_of_later_mutation() {
        let mut table = ActionDescriptorTable::new();
        let mut blocks = blocks_for(&table);
        let d = table.make().unwrap();
        table.put(d, KEY_B, AeteValue::Integer(1)).unwrap();
        table.put(d, KEY_A, AeteValue::Text(b"x".to_vec())).unwrap();

        let block = table.as_handle(d, &mut blocks).unwrap();
        table.put(d, KEY_B, AeteValue::Integer(99)).unwrap();
        table.clear(d).unwrap();

        let copy = table.handle_to_descriptor(block, &blocks).unwrap();
        let restored = table.descriptor(copy).unwrap();
        assert_eq!(restored.keys().collect::<Vec<_>>(), vec![KEY_B, KEY_A]);
        assert_eq!(restored.value(KEY_B).unwrap(), &AeteValue::Integer(1));
    }

    #[test]
    fn test_block_disposal_drops_snapshot_only() {
        let mut table = ActionDescriptorTable::new();
        let mut blocks = blocks_for(&table);
        let d = table.make().unwrap();
        let block = table.as_handle(d, &mut blocks).unwrap();
        assert_eq!(table.frozen_count(), 1);

        blocks.dispose(block).unwrap();
        assert_eq!(table.frozen_count(), 0);
        assert!(table.descriptor(d).is_ok());
        assert_eq!(
            table.handle_to_descriptor(block, &blocks),
            Err(SuiteError::BadParameter)
        );
    }

    #[test]
    fn test_foreign_block_decodes_or_fails_cleanly() {
        let mut table = ActionDescriptorTable::new();
        let mut blocks = blocks_for(&table);

        let mut saved = Descriptor::new();
        saved.insert(KEY_A, AeteValue::Boolean(true).into());
        let written = blocks.new_block_from(&persist::encode(&saved).unwrap()).unwrap();
        let d = table.handle_to_descriptor(written, &blocks).unwrap();
        assert_eq!(table.descriptor(d).unwrap(), &saved);

        let junk = blocks.new_block_from(b"not a descriptor").unwrap();
        assert_eq!(
            table.handle_to_descriptor(junk, &blocks),
            Err(SuiteError::BadParameter)
        );
    }

    #[test]
    fn test_equality_is_unimplemented() {
        let mut table = ActionDescriptorTable::new();
        let a = table.make().unwrap();
        let b = table.make().unwrap();
        assert_eq!(table.is_equal(a, b), Err(SuiteError::Unimplemented));
    }
}
