//! Reference chains behind the Action Reference suite.
//!
//! A handle is a cursor: a shared chain of steps plus a position in it.
//! `get_container` mints a second cursor over the same chain one step further
//! on. Appending through a cursor whose chain is shared copies the chain first,
//! so other cursors never observe the change.

use std::rc::Rc;

use suite_core::terms::{DescriptorClassId, DescriptorFormId};
use suite_core::{HandleTable, OpaqueHandle, ReferenceHandle, SuiteError, SuiteResult};
use tracing::debug;

use crate::value::{ReferenceForm, ReferenceStep};

#[derive(Debug)]
struct Cursor {
    steps: Rc<Vec<ReferenceStep>>,
    position: usize,
}

/// Table of live reference cursors.
#[derive(Debug, Default)]
pub struct ActionReferenceTable {
    cursors: HandleTable<ReferenceHandle, Cursor>,
}

impl ActionReferenceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty chain.
    pub fn make(&mut self) -> SuiteResult<ReferenceHandle> {
        self.insert(Vec::new())
    }

    /// Register a chain of steps under a new cursor at its first step.
    pub fn insert(&mut self, steps: Vec<ReferenceStep>) -> SuiteResult<ReferenceHandle> {
        let handle = self.cursors.insert(Cursor {
            steps: Rc::new(steps),
            position: 0,
        })?;
        debug!(%handle, "action reference created");
        Ok(handle)
    }

    pub fn free(&mut self, reference: ReferenceHandle) -> SuiteResult<()> {
        self.cursors.remove(reference)?;
        debug!(handle = %reference, "action reference freed");
        Ok(())
    }

    /// Append a step to the cursor's chain.
    pub fn put(&mut self, reference: ReferenceHandle, step: ReferenceStep) -> SuiteResult<()> {
        let cursor = self.cursors.get_mut(reference)?;
        let steps = Rc::make_mut(&mut cursor.steps);
        steps.try_reserve(1)?;
        steps.push(step);
        Ok(())
    }

    /// Step under the cursor.
    pub fn current(&self, reference: ReferenceHandle) -> SuiteResult<&ReferenceStep> {
        let cursor = self.cursors.get(reference)?;
        cursor
            .steps
            .get(cursor.position)
            .ok_or(SuiteError::BadParameter)
    }

    pub fn form(&self, reference: ReferenceHandle) -> SuiteResult<DescriptorFormId> {
        Ok(self.current(reference)?.form.form_id())
    }

    pub fn desired_class(&self, reference: ReferenceHandle) -> SuiteResult<DescriptorClassId> {
        Ok(self.current(reference)?.desired_class)
    }

    /// Name payload of a name-form step.
    pub fn name(&self, reference: ReferenceHandle) -> SuiteResult<&[u8]> {
        match &self.current(reference)?.form {
            ReferenceForm::Name(name) => Ok(name),
            _ => Err(SuiteError::BadParameter),
        }
    }

    pub fn index(&self, reference: ReferenceHandle) -> SuiteResult<u32> {
        match self.current(reference)?.form {
            ReferenceForm::Index(v) => Ok(v),
            _ => Err(SuiteError::BadParameter),
        }
    }

    pub fn identifier(&self, reference: ReferenceHandle) -> SuiteResult<u32> {
        match self.current(reference)?.form {
            ReferenceForm::Identifier(v) => Ok(v),
            _ => Err(SuiteError::BadParameter),
        }
    }

    pub fn offset(&self, reference: ReferenceHandle) -> SuiteResult<i32> {
        match self.current(reference)?.form {
            ReferenceForm::Offset(v) => Ok(v),
            _ => Err(SuiteError::BadParameter),
        }
    }

    pub fn enumerated(&self, reference: ReferenceHandle) -> SuiteResult<(u32, u32)> {
        match self.current(reference)?.form {
            ReferenceForm::Enumerated { type_id, value } => Ok((type_id, value)),
            _ => Err(SuiteError::BadParameter),
        }
    }

    pub fn property(&self, reference: ReferenceHandle) -> SuiteResult<u32> {
        match self.current(reference)?.form {
            ReferenceForm::Property(v) => Ok(v),
            _ => Err(SuiteError::BadParameter),
        }
    }

    /// Cursor over the same chain one step further on, or the null handle when
    /// the cursor is already at the last step.
    pub fn get_container(&mut self, reference: ReferenceHandle) -> SuiteResult<ReferenceHandle> {
        let cursor = self.cursors.get(reference)?;
        let next = cursor.position + 1;
        if next >= cursor.steps.len() {
            return Ok(ReferenceHandle::null());
        }
        let container = Cursor {
            steps: Rc::clone(&cursor.steps),
            position: next,
        };
        let handle = self.cursors.insert(container)?;
        debug!(%handle, from = %reference, position = next, "reference container");
        Ok(handle)
    }

    /// Copy of the steps from the cursor's position to the end of the chain.
    pub fn snapshot(&self, reference: ReferenceHandle) -> SuiteResult<Vec<ReferenceStep>> {
        let cursor = self.cursors.get(reference)?;
        Ok(cursor.steps.get(cursor.position..).unwrap_or_default().to_vec())
    }

    pub fn len(&self) -> usize {
        self.cursors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cursors.is_empty()
    }
}
