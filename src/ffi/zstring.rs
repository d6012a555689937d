//! ZString suite trampolines.

use abi_stable::sabi_extern_fn;
use suite_core::ZStringHandle;

use super::*;
use crate::zstring::EMPTY_ZSTRING;

pub(super) fn table() -> ZStringSuite1 {
    ZStringSuite1 {
        make_from_unicode,
        make_from_c_string,
        make_from_pascal_string,
        make_romanization_of_integer,
        make_romanization_of_fixed,
        make_romanization_of_double,
        get_empty,
        copy,
        replace,
        trim_ellipsis,
        trim_spaces,
        remove_accelerators,
        add_ref,
        release,
        is_all_white_space,
        is_empty,
        will_replace,
        length_as_unicode_c_string,
        as_unicode_c_string,
        length_as_c_string,
        as_c_string,
        length_as_pascal_string,
        as_pascal_string,
    }
}

fn zstr(token: ASZString) -> ZStringHandle {
    handle_of(token)
}

fn mint(
    new_zstring: *mut ASZString,
    make: impl FnOnce(&mut SuiteSession) -> SuiteResult<ZStringHandle>,
) -> SPErr {
    call(|session| {
        if new_zstring.is_null() {
            return Err(SuiteError::BadParameter);
        }
        let handle = make(session)?;
        write_out(new_zstring, token_of(handle))
    })
}

#[sabi_extern_fn]
fn make_from_unicode(src: *const ASUnicode, byte_count: usize, new_zstring: *mut ASZString) -> SPErr {
    mint(new_zstring, |session| {
        let units = input_slice(src, byte_count / 2)?;
        session.zstrings.make_from_unicode(units)
    })
}

#[sabi_extern_fn]
fn make_from_c_string(src: *const c_char, byte_count: usize, new_zstring: *mut ASZString) -> SPErr {
    mint(new_zstring, |session| {
        let bytes = input_slice(src.cast::<u8>(), byte_count)?;
        session.zstrings.make_from_c_string(bytes)
    })
}

#[sabi_extern_fn]
fn make_from_pascal_string(src: *const u8, byte_count: usize, new_zstring: *mut ASZString) -> SPErr {
    mint(new_zstring, |session| {
        let bytes = input_slice(src, byte_count)?;
        session.zstrings.make_from_pascal_string(bytes)
    })
}

#[sabi_extern_fn]
fn make_romanization_of_integer(value: i32, new_zstring: *mut ASZString) -> SPErr {
    mint(new_zstring, |session| session.zstrings.make_romanization_of_integer(value))
}

#[sabi_extern_fn]
fn make_romanization_of_fixed(
    value: i32,
    places: i16,
    trim: Boolean,
    is_signed: Boolean,
    new_zstring: *mut ASZString,
) -> SPErr {
    mint(new_zstring, |session| {
        session
            .zstrings
            .make_romanization_of_fixed(value, places, trim != 0, is_signed != 0)
    })
}

#[sabi_extern_fn]
fn make_romanization_of_double(value: f64, new_zstring: *mut ASZString) -> SPErr {
    mint(new_zstring, |session| session.zstrings.make_romanization_of_double(value))
}

#[sabi_extern_fn]
fn get_empty() -> ASZString {
    token_of(EMPTY_ZSTRING)
}

#[sabi_extern_fn]
fn copy(source: ASZString, copy: *mut ASZString) -> SPErr {
    mint(copy, |session| session.zstrings.copy(zstr(source)))
}

#[sabi_extern_fn]
fn replace(zstring: ASZString, index: u32, replacement: ASZString) -> SPErr {
    call(|session| session.zstrings.replace(zstr(zstring), index as usize, zstr(replacement)))
}

#[sabi_extern_fn]
fn trim_ellipsis(zstring: ASZString) -> SPErr {
    call(|session| session.zstrings.trim_ellipsis(zstr(zstring)))
}

#[sabi_extern_fn]
fn trim_spaces(zstring: ASZString) -> SPErr {
    call(|session| session.zstrings.trim_spaces(zstr(zstring)))
}

#[sabi_extern_fn]
fn remove_accelerators(zstring: ASZString) -> SPErr {
    call(|session| session.zstrings.remove_accelerators(zstr(zstring)))
}

#[sabi_extern_fn]
fn add_ref(zstring: ASZString) -> SPErr {
    call(|session| session.zstrings.add_ref(zstr(zstring)))
}

#[sabi_extern_fn]
fn release(zstring: ASZString) -> SPErr {
    call(|session| session.zstrings.release(zstr(zstring)))
}

#[sabi_extern_fn]
fn is_all_white_space(zstring: ASZString) -> Boolean {
    query(0, |session| Ok(boolean(session.zstrings.is_all_white_space(zstr(zstring))?)))
}

#[sabi_extern_fn]
fn is_empty(zstring: ASZString) -> Boolean {
    query(0, |session| Ok(boolean(session.zstrings.is_empty_string(zstr(zstring))?)))
}

#[sabi_extern_fn]
fn will_replace(zstring: ASZString, index: u32) -> Boolean {
    query(0, |session| Ok(boolean(session.zstrings.will_replace(zstr(zstring), index as usize)?)))
}

#[sabi_extern_fn]
fn length_as_unicode_c_string(zstring: ASZString) -> u32 {
    query(0, |session| length_u32(session.zstrings.length_as_unicode_c_string(zstr(zstring))?))
}

#[sabi_extern_fn]
fn as_unicode_c_string(zstring: ASZString, buffer: *mut ASUnicode, buffer_size: u32, _check_size: Boolean) -> SPErr {
    call(|session| {
        let needed = session.zstrings.length_as_unicode_c_string(zstr(zstring))?;
        if (buffer_size as usize) < needed {
            return Err(SuiteError::BufferTooSmall);
        }
        let out = output_slice(buffer, needed)?;
        session.zstrings.write_unicode_c_string(zstr(zstring), out)
    })
}

#[sabi_extern_fn]
fn length_as_c_string(zstring: ASZString) -> u32 {
    query(0, |session| length_u32(session.zstrings.length_as_c_string(zstr(zstring))?))
}

#[sabi_extern_fn]
fn as_c_string(zstring: ASZString, buffer: *mut c_char, buffer_size: u32, _check_size: Boolean) -> SPErr {
    call(|session| {
        let needed = session.zstrings.length_as_c_string(zstr(zstring))?;
        if (buffer_size as usize) < needed {
            return Err(SuiteError::BufferTooSmall);
        }
        let out = output_slice(buffer.cast::<u8>(), needed)?;
        session.zstrings.write_c_string(zstr(zstring), out)
    })
}

#[sabi_extern_fn]
fn length_as_pascal_string(zstring: ASZString) -> u32 {
    query(0, |session| length_u32(session.zstrings.length_as_pascal_string(zstr(zstring))?))
}

#[sabi_extern_fn]
fn as_pascal_string(zstring: ASZString, buffer: *mut c_char, buffer_size: u32, _check_size: Boolean) -> SPErr {
    call(|session| {
        let needed = session.zstrings.length_as_pascal_string(zstr(zstring))?;
        if (buffer_size as usize) < needed {
            return Err(SuiteError::BufferTooSmall);
        }
        let out = output_slice(buffer.cast::<u8>(), needed)?;
        session.zstrings.write_pascal_string(zstr(zstring), out)
    })
}
