//! Action Reference suite trampolines.

use abi_stable::sabi_extern_fn;
use suite_core::terms::{
    DescriptorClassId, DescriptorEnumId, DescriptorEnumTypeId, DescriptorFormId, DescriptorKeyId,
};
use suite_core::ReferenceHandle;

use super::*;
use crate::value::{ReferenceForm, ReferenceStep};

pub(super) fn table() -> ActionReferenceProcs2 {
    ActionReferenceProcs2 {
        make,
        free,
        get_form,
        get_desired_class,
        put_name,
        put_index,
        put_identifier,
        put_offset,
        put_enumerated,
        put_property,
        put_class,
        get_name_length,
        get_name,
        get_index,
        get_identifier,
        get_offset,
        get_enumerated,
        get_property,
        get_container,
    }
}

fn refr(token: PIActionReference) -> ReferenceHandle {
    handle_of(token)
}

fn put(reference: PIActionReference, desired_class: DescriptorClassId, form: ReferenceForm) -> SPErr {
    call(|session| session.references.put(refr(reference), ReferenceStep { desired_class, form }))
}

fn get<T>(
    reference: PIActionReference,
    out: *mut T,
    read: impl FnOnce(&SuiteSession, ReferenceHandle) -> SuiteResult<T>,
) -> SPErr {
    call(|session| {
        let value = read(session, refr(reference))?;
        write_out(out, value)
    })
}

#[sabi_extern_fn]
fn make(reference: *mut PIActionReference) -> SPErr {
    call(|session| {
        if reference.is_null() {
            return Err(SuiteError::BadParameter);
        }
        let handle = session.references.make()?;
        write_out(reference, token_of(handle))
    })
}

#[sabi_extern_fn]
fn free(reference: PIActionReference) -> SPErr {
    call(|session| session.references.free(refr(reference)))
}

#[sabi_extern_fn]
fn get_form(reference: PIActionReference, value: *mut DescriptorFormId) -> SPErr {
    get(reference, value, |s, r| s.references.form(r))
}

#[sabi_extern_fn]
fn get_desired_class(reference: PIActionReference, value: *mut DescriptorClassId) -> SPErr {
    get(reference, value, |s, r| s.references.desired_class(r))
}

#[sabi_extern_fn]
fn put_name(reference: PIActionReference, desired_class: DescriptorClassId, value: *const c_char) -> SPErr {
    match c_string_bytes(value) {
        Ok(name) => put(reference, desired_class, ReferenceForm::Name(name.to_vec())),
        Err(err) => err.code(),
    }
}

#[sabi_extern_fn]
fn put_index(reference: PIActionReference, desired_class: DescriptorClassId, value: u32) -> SPErr {
    put(reference, desired_class, ReferenceForm::Index(value))
}

#[sabi_extern_fn]
fn put_identifier(reference: PIActionReference, desired_class: DescriptorClassId, value: u32) -> SPErr {
    put(reference, desired_class, ReferenceForm::Identifier(value))
}

#[sabi_extern_fn]
fn put_offset(reference: PIActionReference, desired_class: DescriptorClassId, value: i32) -> SPErr {
    put(reference, desired_class, ReferenceForm::Offset(value))
}

#[sabi_extern_fn]
fn put_enumerated(
    reference: PIActionReference,
    desired_class: DescriptorClassId,
    type_: DescriptorEnumTypeId,
    value: DescriptorEnumId,
) -> SPErr {
    put(reference, desired_class, ReferenceForm::Enumerated { type_id: type_, value })
}

#[sabi_extern_fn]
fn put_property(reference: PIActionReference, desired_class: DescriptorClassId, value: DescriptorKeyId) -> SPErr {
    put(reference, desired_class, ReferenceForm::Property(value))
}

#[sabi_extern_fn]
fn put_class(reference: PIActionReference, desired_class: DescriptorClassId) -> SPErr {
    put(reference, desired_class, ReferenceForm::Class)
}

#[sabi_extern_fn]
fn get_name_length(reference: PIActionReference, length: *mut u32) -> SPErr {
    get(reference, length, |s, r| length_u32(s.references.name(r)?.len()))
}

#[sabi_extern_fn]
fn get_name(reference: PIActionReference, name: *mut c_char, max_length: u32) -> SPErr {
    call(|session| write_c_buffer(name, max_length, session.references.name(refr(reference))?))
}

#[sabi_extern_fn]
fn get_index(reference: PIActionReference, value: *mut u32) -> SPErr {
    get(reference, value, |s, r| s.references.index(r))
}

#[sabi_extern_fn]
fn get_identifier(reference: PIActionReference, value: *mut u32) -> SPErr {
    get(reference, value, |s, r| s.references.identifier(r))
}

#[sabi_extern_fn]
fn get_offset(reference: PIActionReference, value: *mut i32) -> SPErr {
    get(reference, value, |s, r| s.references.offset(r))
}

#[sabi_extern_fn]
fn get_enumerated(reference: PIActionReference, type_: *mut DescriptorEnumTypeId, value: *mut DescriptorEnumId) -> SPErr {
    call(|session| {
        let (t, v) = session.references.enumerated(refr(reference))?;
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
fn get_property(reference: PIActionReference, value: *mut DescriptorKeyId) -> SPErr {
    get(reference, value, |s, r| s.references.property(r))
}

#[sabi_extern_fn]
fn get_container(reference: PIActionReference, value: *mut PIActionReference) -> SPErr {
    call(|session| {
        if value.is_null() {
            return Err(SuiteError::BadParameter);
        }
        let container = session.references.get_container(refr(reference))?;
        write_out(value, token_of(container))
    })
}
