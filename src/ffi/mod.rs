//! Native trampolines for every suite.
//!
//! Each procedure in a dispatch table is a `#[sabi_extern_fn]` function: a
//! panic inside it aborts the process instead of unwinding into plugin code.
//! A trampoline validates the raw arguments, resolves the active session via
//! [`with_session`] and collapses the outcome to a status code.
//!
//! Pointer arguments are trusted to be either null or valid for the access the
//! ABI documents; null is always reported as bad-parameter.

#![allow(unsafe_code)] // raw pointers from plugin code
#![allow(clippy::not_unsafe_ptr_arg_deref)] // trampolines are only reachable through dispatch tables

mod basic;
mod buffer;
mod color;
mod descriptor;
mod handle;
mod list;
mod reference;
mod zstring;

use std::ffi::{c_char, c_void};
use std::slice;

use suite_api::prelude::*;
use suite_core::limits::MAX_C_STRING_SCAN;
use suite_core::OpaqueHandle;

use crate::host::with_session;
use crate::session::SuiteSession;

/// Builds the host's dispatch tables.
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeSuites;

impl SuiteProvider for NativeSuites {
    fn build(&self, key: SuiteKey) -> SuiteTable {
        match (key.kind, key.version) {
            (SuiteKind::Basic, _) => SuiteTable::Basic4(Box::new(basic::table())),
            (SuiteKind::ZString, _) => SuiteTable::ZString1(Box::new(zstring::table())),
            (SuiteKind::ActionDescriptor, 1) => SuiteTable::Descriptor1(Box::new(descriptor::table_v1())),
            (SuiteKind::ActionDescriptor, _) => SuiteTable::Descriptor2(Box::new(descriptor::table_v2())),
            (SuiteKind::ActionList, _) => SuiteTable::List1(Box::new(list::table())),
            (SuiteKind::ActionReference, _) => SuiteTable::Reference2(Box::new(reference::table())),
            (SuiteKind::Handle, 1) => SuiteTable::Handle1(Box::new(handle::table_v1())),
            (SuiteKind::Handle, _) => SuiteTable::Handle2(Box::new(handle::table_v2())),
            (SuiteKind::Buffer, _) => SuiteTable::Buffer1(Box::new(buffer::table())),
            (SuiteKind::ColorSpace, _) => SuiteTable::ColorSpace1(Box::new(color::table())),
        }
    }
}

/// Run a status-returning procedure against the active session.
fn call(f: impl FnOnce(&mut SuiteSession) -> SuiteResult<()>) -> SPErr {
    status_of(with_session(f))
}

/// Run a procedure without a status result; failures yield `fallback`.
fn query<R>(fallback: R, f: impl FnOnce(&mut SuiteSession) -> SuiteResult<R>) -> R {
    with_session(f).unwrap_or(fallback)
}

fn handle_of<H: OpaqueHandle>(token: *mut c_void) -> H {
    H::from_raw(token as usize)
}

fn token_of<H: OpaqueHandle>(handle: H) -> *mut c_void {
    handle.raw() as *mut c_void
}

fn boolean(value: bool) -> Boolean {
    Boolean::from(value)
}

/// Store `value` through an output pointer.
fn write_out<T>(out: *mut T, value: T) -> SuiteResult<()> {
    if out.is_null() {
        return Err(SuiteError::BadParameter);
    }
    // SAFETY: non-null output pointers are valid for writes per the ABI.
    unsafe { out.write(value) };
    Ok(())
}

/// Bytes of a NUL-terminated string, without the terminator.
fn c_string_bytes<'a>(ptr: *const c_char) -> SuiteResult<&'a [u8]> {
    if ptr.is_null() {
        return Err(SuiteError::BadParameter);
    }
    let bytes = ptr.cast::<u8>();
    let mut len = 0;
    // SAFETY: the string is NUL-terminated; the scan is bounded regardless.
    unsafe {
        while *bytes.add(len) != 0 {
            len += 1;
            if len == MAX_C_STRING_SCAN {
                return Err(SuiteError::BadParameter);
            }
        }
        Ok(slice::from_raw_parts(bytes, len))
    }
}

/// Input array of `len` elements.
fn input_slice<'a, T>(ptr: *const T, len: usize) -> SuiteResult<&'a [T]> {
    if len == 0 {
        return Ok(&[]);
    }
    if ptr.is_null() {
        return Err(SuiteError::BadParameter);
    }
    // SAFETY: the caller passes a buffer of at least `len` elements.
    Ok(unsafe { slice::from_raw_parts(ptr, len) })
}

/// Output array of `len` elements.
fn output_slice<'a, T>(ptr: *mut T, len: usize) -> SuiteResult<&'a mut [T]> {
    if len == 0 {
        return Ok(&mut []);
    }
    if ptr.is_null() {
        return Err(SuiteError::BadParameter);
    }
    // SAFETY: the caller passes a writable buffer of at least `len` elements.
    Ok(unsafe { slice::from_raw_parts_mut(ptr, len) })
}

/// Copy `bytes` plus a terminator into a caller buffer of `capacity` bytes.
/// Nothing is written unless everything fits.
fn write_c_buffer(dst: *mut c_char, capacity: u32, bytes: &[u8]) -> SuiteResult<()> {
    if (capacity as usize) < bytes.len() + 1 {
        return Err(SuiteError::BadParameter);
    }
    let out = output_slice(dst.cast::<u8>(), bytes.len() + 1)?;
    out[..bytes.len()].copy_from_slice(bytes);
    out[bytes.len()] = 0;
    Ok(())
}

/// Length of a byte payload as reported through a `u32` out parameter.
fn length_u32(len: usize) -> SuiteResult<u32> {
    u32::try_from(len).map_err(|_| SuiteError::BadParameter)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_c_string_bytes_stops_at_nul() {
        let text = b"Radius\0ignored";
        let bytes = c_string_bytes(text.as_ptr().cast()).unwrap();
        assert_eq!(bytes, b"Radius");
        assert_eq!(c_string_bytes(std::ptr::null()), Err(SuiteError::BadParameter));
    }

    #[test]
    fn test_write_c_buffer_never_truncates() {
        let mut buffer = [0x55u8; 4];
        assert_eq!(
            write_c_buffer(buffer.as_mut_ptr().cast(), 4, b"abcd"),
            Err(SuiteError::BadParameter)
        );
        assert_eq!(buffer, [0x55; 4]);

        write_c_buffer(buffer.as_mut_ptr().cast(), 4, b"abc").unwrap();
        assert_eq!(&buffer, b"abc\0");
    }

    #[test]
    fn test_null_outputs_are_refused() {
        assert_eq!(write_out::<u32>(std::ptr::null_mut(), 1), Err(SuiteError::BadParameter));
        assert!(output_slice::<i32>(std::ptr::null_mut(), 0).unwrap().is_empty());
        assert!(input_slice::<i32>(std::ptr::null(), 2).is_err());
    }

    #[test]
    fn test_provider_builds_requested_versions() {
        for info in suite_api::offered_suites() {
            for &version in info.versions {
                let key = SuiteKey { kind: info.kind, version };
                assert_eq!(NativeSuites.build(key).key(), key);
            }
        }
    }
}
