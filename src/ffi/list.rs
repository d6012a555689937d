//! Action List suite trampolines.

use abi_stable::sabi_extern_fn;
use suite_core::limits::validate_integer_run;
use suite_core::terms::{
    DescriptorClassId, DescriptorEnumId, DescriptorEnumTypeId, DescriptorTypeId, DescriptorUnitId,
};
use suite_core::ListHandle;

use super::descriptor::{block_of, handle_token};
use super::*;
use crate::value::AeteValue;

pub(super) fn table() -> ActionListProcs1 {
    ActionListProcs1 {
        make,
        free,
        get_type,
        get_count,
        put_integer,
        put_float,
        put_unit_float,
        put_string,
        put_boolean,
        put_list,
        put_object,
        put_global_object,
        put_enumerated,
        put_reference,
        put_class,
        put_global_class,
        put_alias,
        get_integer,
        get_float,
        get_unit_float,
        get_string_length,
        get_string,
        get_boolean,
        get_list,
        get_object,
        get_global_object,
        get_enumerated,
        get_reference,
        get_class,
        get_global_class,
        get_alias,
        put_integers,
        get_integers,
        put_data,
        get_data_length,
        get_data,
        put_zstring,
        get_zstring,
    }
}

fn list_of(token: PIActionList) -> ListHandle {
    handle_of(token)
}

/// Append the value built by `build`.
fn append(list: PIActionList, build: impl FnOnce(&mut SuiteSession) -> SuiteResult<AeteValue>) -> SPErr {
    call(|session| {
        let value = build(session)?;
        session.lists.append(list_of(list), value)
    })
}

/// Read item `index` and write what `read` extracts through `out`.
fn get<T>(list: PIActionList, index: u32, out: *mut T, read: impl FnOnce(&AeteValue) -> SuiteResult<T>) -> SPErr {
    call(|session| {
        let value = read(session.lists.item(list_of(list), index as usize)?)?;
        write_out(out, value)
    })
}

#[sabi_extern_fn]
fn make(list: *mut PIActionList) -> SPErr {
    call(|session| {
        if list.is_null() {
            return Err(SuiteError::BadParameter);
        }
        let handle = session.lists.make()?;
        write_out(list, token_of(handle))
    })
}

#[sabi_extern_fn]
fn free(list: PIActionList) -> SPErr {
    call(|session| session.lists.free(list_of(list)))
}

#[sabi_extern_fn]
fn get_type(list: PIActionList, index: u32, value: *mut DescriptorTypeId) -> SPErr {
    call(|session| {
        let type_id = session.lists.type_of(list_of(list), index as usize)?;
        write_out(value, type_id)
    })
}

#[sabi_extern_fn]
fn get_count(list: PIActionList, value: *mut u32) -> SPErr {
    call(|session| {
        let n = length_u32(session.lists.count(list_of(list))?)?;
        write_out(value, n)
    })
}

#[sabi_extern_fn]
fn put_integer(list: PIActionList, value: i32) -> SPErr {
    append(list, |_| Ok(AeteValue::Integer(value)))
}

#[sabi_extern_fn]
fn put_float(list: PIActionList, value: f64) -> SPErr {
    append(list, |_| Ok(AeteValue::Float(value)))
}

#[sabi_extern_fn]
fn put_unit_float(list: PIActionList, unit: DescriptorUnitId, value: f64) -> SPErr {
    append(list, |_| Ok(AeteValue::UnitFloat { unit, value }))
}

#[sabi_extern_fn]
fn put_string(list: PIActionList, value: *const c_char) -> SPErr {
    append(list, |_| Ok(AeteValue::Text(c_string_bytes(value)?.to_vec())))
}

#[sabi_extern_fn]
fn put_boolean(list: PIActionList, value: Boolean) -> SPErr {
    append(list, |_| Ok(AeteValue::Boolean(value != 0)))
}

#[sabi_extern_fn]
fn put_list(list: PIActionList, value: PIActionList) -> SPErr {
    // Appending a list to itself stores a copy of its items before the append.
    append(list, |session| session.list_value(list_of(value)))
}

#[sabi_extern_fn]
fn put_object(list: PIActionList, type_: DescriptorClassId, value: PIActionDescriptor) -> SPErr {
    append(list, |session| session.object_value(type_, false, handle_of(value)))
}

#[sabi_extern_fn]
fn put_global_object(list: PIActionList, type_: DescriptorClassId, value: PIActionDescriptor) -> SPErr {
    append(list, |session| session.object_value(type_, true, handle_of(value)))
}

#[sabi_extern_fn]
fn put_enumerated(list: PIActionList, type_: DescriptorEnumTypeId, value: DescriptorEnumId) -> SPErr {
    append(list, |_| Ok(AeteValue::Enumerated { type_id: type_, value }))
}

#[sabi_extern_fn]
fn put_reference(list: PIActionList, value: PIActionReference) -> SPErr {
    append(list, |session| session.reference_value(handle_of(value)))
}

#[sabi_extern_fn]
fn put_class(list: PIActionList, value: DescriptorClassId) -> SPErr {
    append(list, |_| Ok(AeteValue::Class(value)))
}

#[sabi_extern_fn]
fn put_global_class(list: PIActionList, value: DescriptorClassId) -> SPErr {
    append(list, |_| Ok(AeteValue::GlobalClass(value)))
}

#[sabi_extern_fn]
fn put_alias(list: PIActionList, value: Handle) -> SPErr {
    append(list, |session| session.alias_value(block_of(value)))
}

#[sabi_extern_fn]
fn get_integer(list: PIActionList, index: u32, value: *mut i32) -> SPErr {
    get(list, index, value, AeteValue::as_integer)
}

#[sabi_extern_fn]
fn get_float(list: PIActionList, index: u32, value: *mut f64) -> SPErr {
    get(list, index, value, AeteValue::as_float)
}

#[sabi_extern_fn]
fn get_unit_float(list: PIActionList, index: u32, unit: *mut DescriptorUnitId, value: *mut f64) -> SPErr {
    call(|session| {
        let (u, v) = session.lists.item(list_of(list), index as usize)?.as_unit_float()?;
        if unit.is_null() || value.is_null() {
            return Err(SuiteError::BadParameter);
        }
        write_out(unit, u)?;
        write_out(value, v)
    })
}

#[sabi_extern_fn]
fn get_string_length(list: PIActionList, index: u32, length: *mut u32) -> SPErr {
    get(list, index, length, |value| length_u32(value.text_bytes()?.len()))
}

#[sabi_extern_fn]
fn get_string(list: PIActionList, index: u32, value: *mut c_char, max_length: u32) -> SPErr {
    call(|session| {
        let bytes = session.lists.item(list_of(list), index as usize)?.text_bytes()?;
        write_c_buffer(value, max_length, &bytes)
    })
}

#[sabi_extern_fn]
fn get_boolean(list: PIActionList, index: u32, value: *mut Boolean) -> SPErr {
    get(list, index, value, |v| Ok(boolean(v.as_boolean()?)))
}

#[sabi_extern_fn]
fn get_list(list: PIActionList, index: u32, value: *mut PIActionList) -> SPErr {
    call(|session| {
        if value.is_null() {
            return Err(SuiteError::BadParameter);
        }
        let items = session.lists.item(list_of(list), index as usize)?.as_list()?.to_vec();
        let nested = session.lists.insert(items)?;
        write_out(value, token_of(nested))
    })
}

fn get_object_impl(
    list: PIActionList,
    index: u32,
    global: bool,
    type_: *mut DescriptorClassId,
    value: *mut PIActionDescriptor,
) -> SPErr {
    call(|session| {
        if value.is_null() {
            return Err(SuiteError::BadParameter);
        }
        let (class, nested) = session.lists.item(list_of(list), index as usize)?.as_object(global)?;
        let nested = nested.clone();
        let handle = session.descriptors.insert(nested)?;
        if !type_.is_null() {
            write_out(type_, class)?;
        }
        write_out(value, token_of(handle))
    })
}

#[sabi_extern_fn]
fn get_object(list: PIActionList, index: u32, type_: *mut DescriptorClassId, value: *mut PIActionDescriptor) -> SPErr {
    get_object_impl(list, index, false, type_, value)
}

#[sabi_extern_fn]
fn get_global_object(
    list: PIActionList,
    index: u32,
    type_: *mut DescriptorClassId,
    value: *mut PIActionDescriptor,
) -> SPErr {
    get_object_impl(list, index, true, type_, value)
}

#[sabi_extern_fn]
fn get_enumerated(
    list: PIActionList,
    index: u32,
    type_: *mut DescriptorEnumTypeId,
    value: *mut DescriptorEnumId,
) -> SPErr {
    call(|session| {
        let (t, v) = session.lists.item(list_of(list), index as usize)?.as_enumerated()?;
        if value.is_null() {
            return Err(SuiteError::BadParameter);
        }
        if !type_.is_null() {
            write_out(type_, t)?;
        }
        write_out(value, v)
    })
}

#[sabi_extern_fn]
fn get_reference(list: PIActionList, index: u32, value: *mut PIActionReference) -> SPErr {
    call(|session| {
        if value.is_null() {
            return Err(SuiteError::BadParameter);
        }
        let steps = session.lists.item(list_of(list), index as usize)?.as_reference()?.to_vec();
        let reference = session.references.insert(steps)?;
        write_out(value, token_of(reference))
    })
}

#[sabi_extern_fn]
fn get_class(list: PIActionList, index: u32, value: *mut DescriptorClassId) -> SPErr {
    get(list, index, value, AeteValue::as_class)
}

#[sabi_extern_fn]
fn get_global_class(list: PIActionList, index: u32, value: *mut DescriptorClassId) -> SPErr {
    get(list, index, value, AeteValue::as_global_class)
}

#[sabi_extern_fn]
fn get_alias(list: PIActionList, index: u32, value: *mut Handle) -> SPErr {
    call(|session| {
        if value.is_null() {
            return Err(SuiteError::BadParameter);
        }
        let bytes = session.lists.item(list_of(list), index as usize)?.as_alias()?.to_vec();
        let block = session.mint_block(&bytes)?;
        write_out(value, handle_token(block))
    })
}

#[sabi_extern_fn]
fn put_integers(list: PIActionList, count: u32, values: *const i32) -> SPErr {
    call(|session| {
        let values = input_slice(values, validate_integer_run(count)?)?;
        session.lists.put_integers(list_of(list), values)
    })
}

#[sabi_extern_fn]
fn get_integers(list: PIActionList, count: u32, values: *mut i32) -> SPErr {
    call(|session| {
        let out = output_slice(values, validate_integer_run(count)?)?;
        session.lists.get_integers(list_of(list), out)
    })
}

#[sabi_extern_fn]
fn put_data(list: PIActionList, length: i32, value: *const c_void) -> SPErr {
    append(list, |_| {
        let length = usize::try_from(length).map_err(|_| SuiteError::BadParameter)?;
        Ok(AeteValue::RawData(input_slice(value.cast::<u8>(), length)?.to_vec()))
    })
}

#[sabi_extern_fn]
fn get_data_length(list: PIActionList, index: u32, length: *mut i32) -> SPErr {
    get(list, index, length, |value| {
        i32::try_from(value.as_raw_data()?.len()).map_err(|_| SuiteError::BadParameter)
    })
}

#[sabi_extern_fn]
fn get_data(list: PIActionList, index: u32, value: *mut c_void) -> SPErr {
    call(|session| {
        let data = session.lists.item(list_of(list), index as usize)?.as_raw_data()?;
        let out = output_slice(value.cast::<u8>(), data.len())?;
        out.copy_from_slice(data);
        Ok(())
    })
}

#[sabi_extern_fn]
fn put_zstring(list: PIActionList, zstring: ASZString) -> SPErr {
    append(list, |session| session.zstring_value(handle_of(zstring)))
}

#[sabi_extern_fn]
fn get_zstring(list: PIActionList, index: u32, zstring: *mut ASZString) -> SPErr {
    call(|session| {
        if zstring.is_null() {
            return Err(SuiteError::BadParameter);
        }
        let text = session.lists.item(list_of(list), index as usize)?.text_string()?;
        let handle = session.mint_zstring(text)?;
        write_out(zstring, token_of(handle))
    })
}
