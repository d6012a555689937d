//! Handle suite trampolines over the session's memory blocks.

use abi_stable::sabi_extern_fn;
use suite_core::limits::validate_block_size;
use tracing::debug;

use super::descriptor::{block_of, handle_token};
use super::*;

pub(super) fn table_v1() -> HandleSuite1 {
    HandleSuite1 {
        new,
        dispose,
        set_lock,
        get_size,
        set_size,
        recover_space,
    }
}

pub(super) fn table_v2() -> HandleSuite2 {
    HandleSuite2 {
        new,
        dispose,
        dispose_regular_handle,
        set_lock,
        get_size,
        set_size,
        recover_space,
    }
}

#[sabi_extern_fn]
fn new(size: i32) -> Handle {
    query(std::ptr::null_mut(), |session| {
        let size = validate_block_size(i64::from(size))?;
        Ok(handle_token(session.blocks.new_block(size)?))
    })
}

#[sabi_extern_fn]
fn dispose(h: Handle) {
    if let Err(err) = with_session(|session| session.blocks.dispose(block_of(h))) {
        debug!(handle = h as usize, %err, "dispose failed");
    }
}

#[sabi_extern_fn]
fn dispose_regular_handle(h: Handle) {
    if let Err(err) = with_session(|session| session.blocks.dispose(block_of(h))) {
        debug!(handle = h as usize, %err, "dispose_regular_handle failed");
    }
}

#[sabi_extern_fn]
fn set_lock(h: Handle, lock: Boolean, address: *mut Ptr, old_lock: *mut Boolean) {
    let result = with_session(|session| {
        let (data, was_locked) = session.blocks.set_lock(block_of(h), lock != 0)?;
        if !address.is_null() {
            write_out(address, data.cast::<c_char>())?;
        }
        if !old_lock.is_null() {
            write_out(old_lock, boolean(was_locked))?;
        }
        Ok(())
    });
    if let Err(err) = result {
        debug!(handle = h as usize, %err, "set_lock failed");
    }
}

#[sabi_extern_fn]
fn get_size(h: Handle) -> i32 {
    query(0, |session| {
        let size = session.blocks.size(block_of(h))?;
        i32::try_from(size).map_err(|_| SuiteError::BadParameter)
    })
}

#[sabi_extern_fn]
fn set_size(h: Handle, new_size: i32) -> i16 {
    let status = call(|session| {
        let size = validate_block_size(i64::from(new_size))?;
        session.blocks.set_size(block_of(h), size)
    });
    // The narrow status only carries the classic negative codes intact.
    status as i16
}

#[sabi_extern_fn]
fn recover_space(_size: i32) {}
