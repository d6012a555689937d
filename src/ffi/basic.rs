//! SP Basic suite: acquisition of every other suite, plus raw blocks.

use abi_stable::sabi_extern_fn;

use super::*;
use crate::host::acquire_into;

pub(super) fn table() -> SPBasicSuite4 {
    SPBasicSuite4 {
        acquire_suite,
        release_suite,
        is_equal,
        allocate_block,
        free_block,
        reallocate_block,
        undefined,
    }
}

fn suite_name<'a>(name: *const c_char) -> SuiteResult<&'a str> {
    std::str::from_utf8(c_string_bytes(name)?).map_err(|_| SuiteError::SuiteNotFound)
}

#[sabi_extern_fn]
fn acquire_suite(name: *const c_char, version: i32, suite: *mut *const c_void) -> SPErr {
    call(|session| {
        if suite.is_null() {
            return Err(SuiteError::BadParameter);
        }
        let name = suite_name(name)?;
        let address = acquire_into(&mut session.suites, name, version)?;
        write_out(suite, address)
    })
}

#[sabi_extern_fn]
fn release_suite(name: *const c_char, version: i32) -> SPErr {
    call(|session| {
        let name = suite_name(name)?;
        session.suites.release(name, version)?;
        Ok(())
    })
}

#[sabi_extern_fn]
fn is_equal(token1: *const c_char, token2: *const c_char) -> SPBoolean {
    match (c_string_bytes(token1), c_string_bytes(token2)) {
        (Ok(a), Ok(b)) => boolean(a == b),
        _ => boolean(false),
    }
}

#[sabi_extern_fn]
fn allocate_block(size: usize, block: *mut *mut c_void) -> SPErr {
    call(|session| {
        if block.is_null() {
            return Err(SuiteError::BadParameter);
        }
        let ptr = session.buffers.allocate_exact(size)?;
        write_out(block, ptr.cast())
    })
}

#[sabi_extern_fn]
fn free_block(block: *mut c_void) -> SPErr {
    call(|session| session.buffers.dispose(block.cast()))
}

#[sabi_extern_fn]
fn reallocate_block(block: *mut c_void, new_size: usize, new_block: *mut *mut c_void) -> SPErr {
    call(|session| {
        if new_block.is_null() {
            return Err(SuiteError::BadParameter);
        }
        let ptr = if block.is_null() {
            session.buffers.allocate_exact(new_size)?
        } else {
            session.buffers.reallocate(block.cast(), new_size)?
        };
        write_out(new_block, ptr.cast())
    })
}

#[sabi_extern_fn]
fn undefined() -> SPErr {
    NO_ERROR
}
