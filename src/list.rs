//! Ordered value lists behind the Action List suite.

use suite_core::terms::DescriptorTypeId;
use suite_core::{HandleTable, ListHandle, SuiteError, SuiteResult};
use tracing::debug;

use crate::value::{AeteValue, TaggedValue};

/// Table of live action lists.
#[derive(Debug, Default)]
pub struct ActionListTable {
    lists: HandleTable<ListHandle, Vec<TaggedValue>>,
}

impl ActionListTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty list.
    pub fn make(&mut self) -> SuiteResult<ListHandle> {
        self.insert(Vec::new())
    }

    /// Register existing items under a new handle.
    pub fn insert(&mut self, items: Vec<TaggedValue>) -> SuiteResult<ListHandle> {
        let handle = self.lists.insert(items)?;
        debug!(%handle, "action list created");
        Ok(handle)
    }

    pub fn free(&mut self, list: ListHandle) -> SuiteResult<()> {
        self.lists.remove(list)?;
        debug!(handle = %list, "action list freed");
        Ok(())
    }

    pub fn count(&self, list: ListHandle) -> SuiteResult<usize> {
        Ok(self.items(list)?.len())
    }

    /// Type id of the item at `index`.
    pub fn type_of(&self, list: ListHandle, index: usize) -> SuiteResult<DescriptorTypeId> {
        Ok(self.item(list, index)?.type_id())
    }

    /// Item at `index`, bounds checked.
    pub fn item(&self, list: ListHandle, index: usize) -> SuiteResult<&AeteValue> {
        self.items(list)?
            .get(index)
            .map(|item| &item.value)
            .ok_or(SuiteError::BadParameter)
    }

    pub fn items(&self, list: ListHandle) -> SuiteResult<&[TaggedValue]> {
        self.lists.get(list).map(Vec::as_slice)
    }

    /// Append one value.
    pub fn append(&mut self, list: ListHandle, value: AeteValue) -> SuiteResult<()> {
        let items = self.lists.get_mut(list)?;
        items.try_reserve(1)?;
        items.push(TaggedValue::new(value));
        Ok(())
    }

    /// Append each integer as its own item.
    pub fn put_integers(&mut self, list: ListHandle, values: &[i32]) -> SuiteResult<()> {
        let items = self.lists.get_mut(list)?;
        items.try_reserve(values.len())?;
        items.extend(values.iter().map(|&v| TaggedValue::new(AeteValue::Integer(v))));
        Ok(())
    }

    /// Copy the leading `out.len()` integers; see [`leading_integers`].
    pub fn get_integers(&self, list: ListHandle, out: &mut [i32]) -> SuiteResult<()> {
        leading_integers(self.items(list)?, out)
    }

    pub fn len(&self) -> usize {
        self.lists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }
}

/// Fill `out` from the first `out.len()` items.
///
/// Fails with bad-parameter when the list is shorter than `out` and with
/// logic-error when any of those items is not an integer. `out` is untouched on
/// failure.
pub fn leading_integers(items: &[TaggedValue], out: &mut [i32]) -> SuiteResult<()> {
    let run = items.get(..out.len()).ok_or(SuiteError::BadParameter)?;
    let mut values = Vec::new();
    values.try_reserve_exact(run.len())?;
    for item in run {
        match item.value {
            AeteValue::Integer(v) => values.push(v),
            _ => return Err(SuiteError::LogicError),
        }
    }
    out.copy_from_slice(&values);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use suite_core::terms::types;

    #[test]
    fn test_append_and_read_by_index() {
        let mut lists = ActionListTable::new();
        let l = lists.make().unwrap();
        lists.append(l, AeteValue::Integer(5)).unwrap();
        lists.append(l, AeteValue::Text(b"abc".to_vec())).unwrap();

        assert_eq!(lists.count(l).unwrap(), 2);
        assert_eq!(lists.type_of(l, 0).unwrap(), types::INTEGER);
        assert_eq!(lists.type_of(l, 1).unwrap(), types::CHAR);
        assert_eq!(lists.item(l, 0).unwrap().as_integer(), Ok(5));
        assert_eq!(lists.item(l, 2), Err(SuiteError::BadParameter));
    }

    #[test]
    fn test_get_integers_requires_all_integers() {
        let mut lists = ActionListTable::new();
        let l = lists.make().unwrap();
        lists.put_integers(l, &[1, 2]).unwrap();
        lists.append(l, AeteValue::Float(3.0)).unwrap();
        lists.append(l, AeteValue::Integer(4)).unwrap();

        let mut two = [0; 2];
        lists.get_integers(l, &mut two).unwrap();
        assert_eq!(two, [1, 2]);

        let mut three = [-1; 3];
        assert_eq!(lists.get_integers(l, &mut three), Err(SuiteError::LogicError));
        assert_eq!(three, [-1; 3]);

        let mut five = [-1; 5];
        assert_eq!(lists.get_integers(l, &mut five), Err(SuiteError::BadParameter));
        assert_eq!(five, [-1; 5]);
    }

    #[test]
    fn test_freed_list_is_unknown() {
        let mut lists = ActionListTable::new();
        let l = lists.make().unwrap();
        lists.free(l).unwrap();
        assert_eq!(lists.count(l), Err(SuiteError::BadParameter));
        assert_eq!(lists.free(l), Err(SuiteError::BadParameter));
        assert_eq!(lists.append(l, AeteValue::Boolean(true)), Err(SuiteError::BadParameter));
    }

    #[test]
    fn test_handles_reuse_top_of_stack() {
        let mut lists = ActionListTable::new();
        let a = lists.make().unwrap();
        let b = lists.make().unwrap();
        lists.free(b).unwrap();
        assert_eq!(lists.make().unwrap(), b);
        lists.free(a).unwrap();
        let c = lists.make().unwrap();
        assert_ne!(c, a);
    }
}
