//! Action Descriptor suite trampolines (versions 1 and 2).

use abi_stable::sabi_extern_fn;
use suite_core::limits::{validate_integer_run, MAX_INTEGER_RUN};
use suite_core::terms::{
    DescriptorClassId, DescriptorEnumId, DescriptorEnumTypeId, DescriptorKeyId, DescriptorTypeId,
    DescriptorUnitId,
};
use suite_core::DescriptorHandle;
use suite_pool::BlockHandle;

use super::*;
use crate::value::AeteValue;

macro_rules! descriptor_table {
    ($name:ident { $($extra:ident),* $(,)? }) => {
        $name {
            make,
            free,
            get_type,
            get_key,
            has_key,
            get_count,
            is_equal,
            erase,
            clear,
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
            has_keys,
            put_integers,
            get_integers,
            as_handle,
            handle_to_descriptor,
            $($extra,)*
        }
    };
}

pub(super) fn table_v1() -> ActionDescriptorProcs1 {
    descriptor_table!(ActionDescriptorProcs1 {})
}

pub(super) fn table_v2() -> ActionDescriptorProcs2 {
    descriptor_table!(ActionDescriptorProcs2 {
        put_zstring,
        get_zstring,
        put_data,
        get_data_length,
        get_data,
    })
}

fn desc(token: PIActionDescriptor) -> DescriptorHandle {
    handle_of(token)
}

pub(super) fn block_of(h: Handle) -> BlockHandle {
    BlockHandle(h as usize)
}

pub(super) fn handle_token(block: BlockHandle) -> Handle {
    block.0 as Handle
}

/// Store the value built by `build` under `key`.
fn put(
    descriptor: PIActionDescriptor,
    key: DescriptorKeyId,
    build: impl FnOnce(&mut SuiteSession) -> SuiteResult<AeteValue>,
) -> SPErr {
    call(|session| {
        let value = build(session)?;
        session.descriptors.put(desc(descriptor), key, value)
    })
}

/// Read the value under `key` and write what `read` extracts through `out`.
fn get<T>(
    descriptor: PIActionDescriptor,
    key: DescriptorKeyId,
    out: *mut T,
    read: impl FnOnce(&AeteValue) -> SuiteResult<T>,
) -> SPErr {
    call(|session| {
        let value = read(session.descriptors.value(desc(descriptor), key)?)?;
        write_out(out, value)
    })
}

#[sabi_extern_fn]
fn make(descriptor: *mut PIActionDescriptor) -> SPErr {
    call(|session| {
        if descriptor.is_null() {
            return Err(SuiteError::BadParameter);
        }
        let handle = session.descriptors.make()?;
        write_out(descriptor, token_of(handle))
    })
}

#[sabi_extern_fn]
fn free(descriptor: PIActionDescriptor) -> SPErr {
    call(|session| session.descriptors.free(desc(descriptor)))
}

#[sabi_extern_fn]
fn get_type(descriptor: PIActionDescriptor, key: DescriptorKeyId, type_: *mut DescriptorTypeId) -> SPErr {
    get(descriptor, key, type_, |value| Ok(value.type_id()))
}

#[sabi_extern_fn]
fn get_key(descriptor: PIActionDescriptor, index: u32, key: *mut DescriptorKeyId) -> SPErr {
    call(|session| {
        let found = session.descriptors.key_at(desc(descriptor), index as usize)?;
        write_out(key, found)
    })
}

#[sabi_extern_fn]
fn has_key(descriptor: PIActionDescriptor, key: DescriptorKeyId, has_key: *mut Boolean) -> SPErr {
    call(|session| {
        let present = session.descriptors.has_key(desc(descriptor), key)?;
        write_out(has_key, boolean(present))
    })
}

#[sabi_extern_fn]
fn get_count(descriptor: PIActionDescriptor, count: *mut u32) -> SPErr {
    call(|session| {
        let n = length_u32(session.descriptors.count(desc(descriptor))?)?;
        write_out(count, n)
    })
}

#[sabi_extern_fn]
fn is_equal(descriptor: PIActionDescriptor, other: PIActionDescriptor, is_equal: *mut Boolean) -> SPErr {
    call(|session| {
        let equal = session.descriptors.is_equal(desc(descriptor), desc(other))?;
        write_out(is_equal, boolean(equal))
    })
}

#[sabi_extern_fn]
fn erase(descriptor: PIActionDescriptor, key: DescriptorKeyId) -> SPErr {
    call(|session| session.descriptors.erase(desc(descriptor), key))
}

#[sabi_extern_fn]
fn clear(descriptor: PIActionDescriptor) -> SPErr {
    call(|session| session.descriptors.clear(desc(descriptor)))
}

#[sabi_extern_fn]
fn put_integer(descriptor: PIActionDescriptor, key: DescriptorKeyId, value: i32) -> SPErr {
    put(descriptor, key, |_| Ok(AeteValue::Integer(value)))
}

#[sabi_extern_fn]
fn put_float(descriptor: PIActionDescriptor, key: DescriptorKeyId, value: f64) -> SPErr {
    put(descriptor, key, |_| Ok(AeteValue::Float(value)))
}

#[sabi_extern_fn]
fn put_unit_float(descriptor: PIActionDescriptor, key: DescriptorKeyId, unit: DescriptorUnitId, value: f64) -> SPErr {
    put(descriptor, key, |_| Ok(AeteValue::UnitFloat { unit, value }))
}

#[sabi_extern_fn]
fn put_string(descriptor: PIActionDescriptor, key: DescriptorKeyId, value: *const c_char) -> SPErr {
    put(descriptor, key, |_| Ok(AeteValue::Text(c_string_bytes(value)?.to_vec())))
}

#[sabi_extern_fn]
fn put_boolean(descriptor: PIActionDescriptor, key: DescriptorKeyId, value: Boolean) -> SPErr {
    put(descriptor, key, |_| Ok(AeteValue::Boolean(value != 0)))
}

#[sabi_extern_fn]
fn put_list(descriptor: PIActionDescriptor, key: DescriptorKeyId, value: PIActionList) -> SPErr {
    put(descriptor, key, |session| session.list_value(handle_of(value)))
}

#[sabi_extern_fn]
fn put_object(descriptor: PIActionDescriptor, key: DescriptorKeyId, type_: DescriptorClassId, value: PIActionDescriptor) -> SPErr {
    put(descriptor, key, |session| session.object_value(type_, false, desc(value)))
}

#[sabi_extern_fn]
fn put_global_object(descriptor: PIActionDescriptor, key: DescriptorKeyId, type_: DescriptorClassId, value: PIActionDescriptor) -> SPErr {
    put(descriptor, key, |session| session.object_value(type_, true, desc(value)))
}

#[sabi_extern_fn]
fn put_enumerated(
    descriptor: PIActionDescriptor,
    key: DescriptorKeyId,
    type_: DescriptorEnumTypeId,
    value: DescriptorEnumId,
) -> SPErr {
    put(descriptor, key, |_| Ok(AeteValue::Enumerated { type_id: type_, value }))
}

#[sabi_extern_fn]
fn put_reference(descriptor: PIActionDescriptor, key: DescriptorKeyId, value: PIActionReference) -> SPErr {
    put(descriptor, key, |session| session.reference_value(handle_of(value)))
}

#[sabi_extern_fn]
fn put_class(descriptor: PIActionDescriptor, key: DescriptorKeyId, value: DescriptorClassId) -> SPErr {
    put(descriptor, key, |_| Ok(AeteValue::Class(value)))
}

#[sabi_extern_fn]
fn put_global_class(descriptor: PIActionDescriptor, key: DescriptorKeyId, value: DescriptorClassId) -> SPErr {
    put(descriptor, key, |_| Ok(AeteValue::GlobalClass(value)))
}

#[sabi_extern_fn]
fn put_alias(descriptor: PIActionDescriptor, key: DescriptorKeyId, value: Handle) -> SPErr {
    put(descriptor, key, |session| session.alias_value(block_of(value)))
}

#[sabi_extern_fn]
fn get_integer(descriptor: PIActionDescriptor, key: DescriptorKeyId, value: *mut i32) -> SPErr {
    get(descriptor, key, value, AeteValue::as_integer)
}

#[sabi_extern_fn]
fn get_float(descriptor: PIActionDescriptor, key: DescriptorKeyId, value: *mut f64) -> SPErr {
    get(descriptor, key, value, AeteValue::as_float)
}

#[sabi_extern_fn]
fn get_unit_float(
    descriptor: PIActionDescriptor,
    key: DescriptorKeyId,
    unit: *mut DescriptorUnitId,
    value: *mut f64,
) -> SPErr {
    call(|session| {
        let (u, v) = session.descriptors.value(desc(descriptor), key)?.as_unit_float()?;
        if unit.is_null() || value.is_null() {
            return Err(SuiteError::BadParameter);
        }
        write_out(unit, u)?;
        write_out(value, v)
    })
}

#[sabi_extern_fn]
fn get_string_length(descriptor: PIActionDescriptor, key: DescriptorKeyId, length: *mut u32) -> SPErr {
    get(descriptor, key, length, |value| length_u32(value.text_bytes()?.len()))
}

#[sabi_extern_fn]
fn get_string(descriptor: PIActionDescriptor, key: DescriptorKeyId, value: *mut c_char, max_length: u32) -> SPErr {
    call(|session| {
        let bytes = session.descriptors.value(desc(descriptor), key)?.text_bytes()?;
        write_c_buffer(value, max_length, &bytes)
    })
}

#[sabi_extern_fn]
fn get_boolean(descriptor: PIActionDescriptor, key: DescriptorKeyId, value: *mut Boolean) -> SPErr {
    get(descriptor, key, value, |v| Ok(boolean(v.as_boolean()?)))
}

#[sabi_extern_fn]
fn get_list(descriptor: PIActionDescriptor, key: DescriptorKeyId, value: *mut PIActionList) -> SPErr {
    call(|session| {
        if value.is_null() {
            return Err(SuiteError::BadParameter);
        }
        let items = session.descriptors.value(desc(descriptor), key)?.as_list()?.to_vec();
        let list = session.lists.insert(items)?;
        write_out(value, token_of(list))
    })
}

fn get_object_impl(
    descriptor: PIActionDescriptor,
    key: DescriptorKeyId,
    global: bool,
    type_: *mut DescriptorClassId,
    value: *mut PIActionDescriptor,
) -> SPErr {
    call(|session| {
        if value.is_null() {
            return Err(SuiteError::BadParameter);
        }
        let (class, nested) = session.descriptors.value(desc(descriptor), key)?.as_object(global)?;
        let nested = nested.clone();
        let handle = session.descriptors.insert(nested)?;
        if !type_.is_null() {
            write_out(type_, class)?;
        }
        write_out(value, token_of(handle))
    })
}

#[sabi_extern_fn]
fn get_object(
    descriptor: PIActionDescriptor,
    key: DescriptorKeyId,
    type_: *mut DescriptorClassId,
    value: *mut PIActionDescriptor,
) -> SPErr {
    get_object_impl(descriptor, key, false, type_, value)
}

#[sabi_extern_fn]
fn get_global_object(
    descriptor: PIActionDescriptor,
    key: DescriptorKeyId,
    type_: *mut DescriptorClassId,
    value: *mut PIActionDescriptor,
) -> SPErr {
    get_object_impl(descriptor, key, true, type_, value)
}

#[sabi_extern_fn]
fn get_enumerated(
    descriptor: PIActionDescriptor,
    key: DescriptorKeyId,
    type_: *mut DescriptorEnumTypeId,
    value: *mut DescriptorEnumId,
) -> SPErr {
    call(|session| {
        let (t, v) = session.descriptors.value(desc(descriptor), key)?.as_enumerated()?;
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
fn get_reference(descriptor: PIActionDescriptor, key: DescriptorKeyId, value: *mut PIActionReference) -> SPErr {
    call(|session| {
        if value.is_null() {
            return Err(SuiteError::BadParameter);
        }
        let steps = session.descriptors.value(desc(descriptor), key)?.as_reference()?.to_vec();
        let reference = session.references.insert(steps)?;
        write_out(value, token_of(reference))
    })
}

#[sabi_extern_fn]
fn get_class(descriptor: PIActionDescriptor, key: DescriptorKeyId, value: *mut DescriptorClassId) -> SPErr {
    get(descriptor, key, value, AeteValue::as_class)
}

#[sabi_extern_fn]
fn get_global_class(descriptor: PIActionDescriptor, key: DescriptorKeyId, value: *mut DescriptorClassId) -> SPErr {
    get(descriptor, key, value, AeteValue::as_global_class)
}

#[sabi_extern_fn]
fn get_alias(descriptor: PIActionDescriptor, key: DescriptorKeyId, value: *mut Handle) -> SPErr {
    call(|session| {
        if value.is_null() {
            return Err(SuiteError::BadParameter);
        }
        let bytes = session.descriptors.value(desc(descriptor), key)?.as_alias()?.to_vec();
        let block = session.mint_block(&bytes)?;
        write_out(value, handle_token(block))
    })
}

#[sabi_extern_fn]
fn has_keys(descriptor: PIActionDescriptor, required_keys: *const DescriptorKeyId, has_keys: *mut Boolean) -> SPErr {
    call(|session| {
        if required_keys.is_null() {
            return Err(SuiteError::BadParameter);
        }
        let mut keys = Vec::new();
        // SAFETY: the key array is terminated by a zero key.
        unsafe {
            while *required_keys.add(keys.len()) != 0 {
                if keys.len() == MAX_INTEGER_RUN {
                    return Err(SuiteError::BadParameter);
                }
                keys.push(*required_keys.add(keys.len()));
            }
        }
        let present = session.descriptors.has_keys(desc(descriptor), &keys)?;
        write_out(has_keys, boolean(present))
    })
}

#[sabi_extern_fn]
fn put_integers(descriptor: PIActionDescriptor, key: DescriptorKeyId, count: u32, values: *const i32) -> SPErr {
    call(|session| {
        let values = input_slice(values, validate_integer_run(count)?)?;
        session.descriptors.put_integers(desc(descriptor), key, values)
    })
}

#[sabi_extern_fn]
fn get_integers(descriptor: PIActionDescriptor, key: DescriptorKeyId, count: u32, values: *mut i32) -> SPErr {
    call(|session| {
        let out = output_slice(values, validate_integer_run(count)?)?;
        session.descriptors.get_integers(desc(descriptor), key, out)
    })
}

#[sabi_extern_fn]
fn as_handle(descriptor: PIActionDescriptor, value: *mut PIDescriptorHandle) -> SPErr {
    call(|session| {
        if value.is_null() {
            return Err(SuiteError::BadParameter);
        }
        let block = session.descriptors.as_handle(desc(descriptor), &mut session.blocks)?;
        write_out(value, handle_token(block))
    })
}

#[sabi_extern_fn]
fn handle_to_descriptor(value: PIDescriptorHandle, descriptor: *mut PIActionDescriptor) -> SPErr {
    call(|session| {
        if descriptor.is_null() {
            return Err(SuiteError::BadParameter);
        }
        let handle = session.descriptors.handle_to_descriptor(block_of(value), &session.blocks)?;
        write_out(descriptor, token_of(handle))
    })
}

#[sabi_extern_fn]
fn put_zstring(descriptor: PIActionDescriptor, key: DescriptorKeyId, zstring: ASZString) -> SPErr {
    put(descriptor, key, |session| session.zstring_value(handle_of(zstring)))
}

#[sabi_extern_fn]
fn get_zstring(descriptor: PIActionDescriptor, key: DescriptorKeyId, zstring: *mut ASZString) -> SPErr {
    call(|session| {
        if zstring.is_null() {
            return Err(SuiteError::BadParameter);
        }
        let text = session.descriptors.value(desc(descriptor), key)?.text_string()?;
        let handle = session.mint_zstring(text)?;
        write_out(zstring, token_of(handle))
    })
}

#[sabi_extern_fn]
fn put_data(descriptor: PIActionDescriptor, key: DescriptorKeyId, length: i32, value: *const c_void) -> SPErr {
    put(descriptor, key, |_| {
        let length = usize::try_from(length).map_err(|_| SuiteError::BadParameter)?;
        Ok(AeteValue::RawData(input_slice(value.cast::<u8>(), length)?.to_vec()))
    })
}

#[sabi_extern_fn]
fn get_data_length(descriptor: PIActionDescriptor, key: DescriptorKeyId, length: *mut i32) -> SPErr {
    get(descriptor, key, length, |value| {
        i32::try_from(value.as_raw_data()?.len()).map_err(|_| SuiteError::BadParameter)
    })
}

#[sabi_extern_fn]
fn get_data(descriptor: PIActionDescriptor, key: DescriptorKeyId, value: *mut c_void) -> SPErr {
    call(|session| {
        let data = session.descriptors.value(desc(descriptor), key)?.as_raw_data()?;
        let out = output_slice(value.cast::<u8>(), data.len())?;
        out.copy_from_slice(data);
        Ok(())
    })
}
