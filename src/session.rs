//! The explicit context every suite call runs against.
//!
//! A [`SuiteSession`] owns one instance of every object table plus the memory
//! collaborators and the registry of acquired dispatch tables. Nothing in the
//! crate is a process-wide singleton: two hosts have two sessions and never
//! see each other's handles.
//!
//! The methods here are the glue between tables. Descriptor, list and
//! reference values that arrive by handle are snapshotted into owned
//! [`AeteValue`]s; values read back out are minted as fresh handles in the
//! owning table.

use std::rc::Rc;

use suite_api::SuiteRegistry;
use suite_core::terms::DescriptorClassId;
use suite_core::{DescriptorHandle, ListHandle, ReferenceHandle, SuiteResult, ZStringHandle};
use suite_pool::{BlockAllocator, BlockHandle, BlockTable, BufferTable, LimitedAllocator, SystemAllocator};
use tracing::{debug, info};

use crate::color_space::ColorTable;
use crate::config::MemoryConfig;
use crate::descriptor::ActionDescriptorTable;
use crate::list::ActionListTable;
use crate::reference::ActionReferenceTable;
use crate::scripting::ScriptingDictionary;
use crate::value::{AeteValue, Descriptor, ReferenceStep, TaggedValue};
use crate::zstring::ZStringTable;

/// Live object counts, for diagnostics and leak checks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct SessionStats {
    pub zstrings: usize,
    pub descriptors: usize,
    pub lists: usize,
    pub references: usize,
    pub blocks: usize,
    pub buffers: usize,
    pub colors: usize,
    pub suites: usize,
}

/// Every table a plugin can reach through its suites.
pub struct SuiteSession {
    pub zstrings: ZStringTable,
    pub descriptors: ActionDescriptorTable,
    pub lists: ActionListTable,
    pub references: ActionReferenceTable,
    pub blocks: BlockTable,
    pub buffers: BufferTable,
    pub colors: ColorTable,
    pub suites: SuiteRegistry,
    space_override: Option<i32>,
}

impl std::fmt::Debug for SuiteSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SuiteSession")
            .field("stats", &self.stats())
            .field("space_override", &self.space_override)
            .finish()
    }
}

impl SuiteSession {
    /// Session drawing plugin memory according to `memory`.
    pub fn new(memory: &MemoryConfig) -> Self {
        let allocator: Rc<dyn BlockAllocator> = match memory.budget {
            Some(budget) => {
                info!(budget, "plugin memory limited");
                Rc::new(LimitedAllocator::new(budget))
            }
            None => Rc::new(SystemAllocator),
        };
        let mut session = Self::with_allocator(allocator);
        session.space_override = memory.space;
        session
    }

    /// Session drawing plugin memory from `allocator`.
    pub fn with_allocator(allocator: Rc<dyn BlockAllocator>) -> Self {
        let descriptors = ActionDescriptorTable::new();
        let mut blocks = BlockTable::new(allocator.clone());
        blocks.subscribe(descriptors.disposal_listener());
        Self {
            zstrings: ZStringTable::new(),
            descriptors,
            lists: ActionListTable::new(),
            references: ActionReferenceTable::new(),
            blocks,
            buffers: BufferTable::new(allocator),
            colors: ColorTable::new(),
            suites: SuiteRegistry::new(),
            space_override: None,
        }
    }

    /// Flags for newly stored descriptor values come from `dictionary`.
    pub fn set_dictionary(&mut self, dictionary: ScriptingDictionary) {
        self.descriptors.set_dictionary(dictionary);
    }

    /// Answer to the Buffer suite's space query.
    pub fn buffer_space(&self) -> i32 {
        self.space_override
            .unwrap_or_else(|| i32::try_from(self.buffers.space()).unwrap_or(i32::MAX))
    }

    pub fn stats(&self) -> SessionStats {
        SessionStats {
            zstrings: self.zstrings.len(),
            descriptors: self.descriptors.len(),
            lists: self.lists.len(),
            references: self.references.len(),
            blocks: self.blocks.len(),
            buffers: self.buffers.len(),
            colors: self.colors.len(),
            suites: self.suites.total_outstanding(),
        }
    }

    // Handle -> owned value

    /// Copy of a list's current items.
    pub fn list_value(&self, list: ListHandle) -> SuiteResult<AeteValue> {
        Ok(AeteValue::List(self.lists.items(list)?.to_vec()))
    }

    /// Copy of a descriptor's current contents as an object of `class`.
    pub fn object_value(
        &self,
        class: DescriptorClassId,
        global: bool,
        descriptor: DescriptorHandle,
    ) -> SuiteResult<AeteValue> {
        Ok(AeteValue::Object {
            class,
            global,
            descriptor: self.descriptors.descriptor(descriptor)?.clone(),
        })
    }

    /// Copy of a reference chain from the cursor onward.
    pub fn reference_value(&self, reference: ReferenceHandle) -> SuiteResult<AeteValue> {
        Ok(AeteValue::Reference(self.references.snapshot(reference)?))
    }

    /// Text of an interned string.
    pub fn zstring_value(&self, zstring: ZStringHandle) -> SuiteResult<AeteValue> {
        Ok(AeteValue::UnicodeText(self.zstrings.text(zstring)?.to_owned()))
    }

    /// Copy of a memory block's bytes.
    pub fn alias_value(&self, block: BlockHandle) -> SuiteResult<AeteValue> {
        Ok(AeteValue::Alias(self.blocks.bytes(block)?.to_vec()))
    }

    // Owned value -> fresh handle

    pub fn mint_list(&mut self, items: &[TaggedValue]) -> SuiteResult<ListHandle> {
        self.lists.insert(items.to_vec())
    }

    pub fn mint_descriptor(&mut self, descriptor: &Descriptor) -> SuiteResult<DescriptorHandle> {
        self.descriptors.insert(descriptor.clone())
    }

    pub fn mint_reference(&mut self, steps: &[ReferenceStep]) -> SuiteResult<ReferenceHandle> {
        self.references.insert(steps.to_vec())
    }

    /// New interned string with a reference count of one.
    pub fn mint_zstring(&mut self, text: String) -> SuiteResult<ZStringHandle> {
        self.zstrings.make(text)
    }

    /// New memory block holding `bytes`.
    pub fn mint_block(&mut self, bytes: &[u8]) -> SuiteResult<BlockHandle> {
        self.blocks.new_block_from(bytes)
    }

    // Scripting exchange with the outer pipeline

    /// Freeze `parameters` into a block the plugin reads its previous
    /// settings from.
    pub fn set_scripting_data(&mut self, parameters: Descriptor) -> SuiteResult<BlockHandle> {
        let block = self.descriptors.freeze(parameters, &mut self.blocks)?;
        debug!(%block, "scripting data handed to plugin");
        Ok(block)
    }

    /// Collect the parameters a plugin returned as a descriptor block, and
    /// dispose of the block.
    pub fn take_scripting_data(&mut self, block: BlockHandle) -> SuiteResult<Descriptor> {
        let parameters = self.descriptors.thaw(block, &self.blocks)?;
        self.blocks.dispose(block)?;
        debug!(%block, keys = parameters.len(), "scripting data collected");
        Ok(parameters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use suite_core::four_char_code;
    use suite_core::SuiteError;

    const KEY: u32 = four_char_code(*b"Amnt");

    #[test]
    fn test_values_are_snapshots() {
        let mut session = SuiteSession::new(&MemoryConfig::default());
        let list = session.lists.make().unwrap();
        session.lists.append(list, AeteValue::Integer(7)).unwrap();

        let value = session.list_value(list).unwrap();
        session.lists.append(list, AeteValue::Integer(8)).unwrap();
        assert_eq!(value.as_list().unwrap().len(), 1);

        let copy = session.mint_list(value.as_list().unwrap()).unwrap();
        assert_ne!(copy, list);
        assert_eq!(session.lists.count(copy).unwrap(), 1);
    }

    #[test]
    fn test_zstring_value_is_text() {
        let mut session = SuiteSession::new(&MemoryConfig::default());
        let z = session.mint_zstring("Radius".into()).unwrap();
        let value = session.zstring_value(z).unwrap();
        assert_eq!(value.text_string().unwrap(), "Radius");

        session.zstrings.release(z).unwrap();
        assert_eq!(session.zstring_value(z), Err(SuiteError::BadParameter));
    }

    #[test]
    fn test_scripting_exchange() {
        let mut session = SuiteSession::new(&MemoryConfig::default());
        let mut parameters = Descriptor::new();
        parameters.insert(KEY, AeteValue::Integer(50).into());

        let block = session.set_scripting_data(parameters.clone()).unwrap();
        assert_eq!(session.descriptors.frozen_count(), 1);

        let returned = session.take_scripting_data(block).unwrap();
        assert_eq!(returned, parameters);
        assert_eq!(session.descriptors.frozen_count(), 0);
        assert!(!session.blocks.contains(block));
    }

    #[test]
    fn test_budget_limits_blocks_and_buffers() {
        let memory = MemoryConfig {
            budget: Some(1024),
            space: None,
        };
        let mut session = SuiteSession::new(&memory);
        assert_eq!(session.buffer_space(), 1024);

        session.blocks.new_block(1000).unwrap();
        assert_eq!(session.blocks.new_block(100), Err(SuiteError::OutOfMemory));
        assert_eq!(session.buffer_space(), 24);

        let fixed = SuiteSession::new(&MemoryConfig {
            budget: None,
            space: Some(4096),
        });
        assert_eq!(fixed.buffer_space(), 4096);
    }

    #[test]
    fn test_stats_count_live_objects() {
        let mut session = SuiteSession::new(&MemoryConfig::default());
        session.descriptors.make().unwrap();
        session.colors.make().unwrap();
        let stats = session.stats();
        assert_eq!(stats.descriptors, 1);
        assert_eq!(stats.colors, 1);
        assert_eq!(stats.zstrings, 0);
    }
}
