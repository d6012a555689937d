//! Buffer suite trampolines.

use abi_stable::sabi_extern_fn;

use super::*;

pub(super) fn table() -> BufferSuite1 {
    BufferSuite1 {
        new,
        dispose,
        get_size,
        get_space,
    }
}

#[sabi_extern_fn]
fn new(requested_size: *mut u32, minimum_size: u32) -> Ptr {
    query(std::ptr::null_mut(), |session| {
        let requested = if requested_size.is_null() {
            None
        } else {
            // SAFETY: non-null in/out size pointers are valid per the ABI.
            Some(unsafe { requested_size.read() })
        };
        let (ptr, size) = session.buffers.allocate(requested, minimum_size)?;
        if !requested_size.is_null() {
            write_out(requested_size, size)?;
        }
        Ok(ptr.cast::<c_char>())
    })
}

#[sabi_extern_fn]
fn dispose(buffer: *mut Ptr) {
    if buffer.is_null() {
        return;
    }
    // SAFETY: checked non-null above; the caller owns the pointer slot.
    let ptr = unsafe { buffer.read() };
    if with_session(|session| session.buffers.dispose(ptr.cast())).is_ok() {
        // SAFETY: as above.
        unsafe { buffer.write(std::ptr::null_mut()) };
    }
}

#[sabi_extern_fn]
fn get_size(buffer: Ptr) -> u32 {
    query(0, |session| {
        let size = session.buffers.size(buffer.cast()).unwrap_or(0);
        length_u32(size)
    })
}

#[sabi_extern_fn]
fn get_space() -> i32 {
    query(0, |session| Ok(session.buffer_space()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{HostConfig, MemoryConfig};
    use crate::host::SuiteHost;

    #[test]
    fn test_new_reports_allocated_size_and_dispose_nulls() {
        let host = SuiteHost::new(&HostConfig::default());
        let _scope = host.enter();
        let suite = table();

        unsafe {
            let mut requested = 64u32;
            let mut ptr = (suite.new)(&mut requested, 16);
            assert!(!ptr.is_null());
            assert_eq!(requested, 64);
            assert_eq!((suite.get_size)(ptr), 64);

            (suite.dispose)(&mut ptr);
            assert!(ptr.is_null());
            assert_eq!((suite.get_size)(ptr), 0);

            let mut exact = (suite.new)(std::ptr::null_mut(), 10);
            assert_eq!((suite.get_size)(exact), 10);
            (suite.dispose)(&mut exact);
        }
    }

    #[test]
    fn test_budget_halves_request_and_reports_space() {
        let config = HostConfig {
            memory: MemoryConfig {
                budget: Some(1000),
                space: None,
            },
            ..HostConfig::default()
        };
        let host = SuiteHost::new(&config);
        let _scope = host.enter();
        let suite = table();

        unsafe {
            assert_eq!((suite.get_space)(), 1000);
            let mut requested = 4000u32;
            let mut ptr = (suite.new)(&mut requested, 100);
            assert!(!ptr.is_null());
            assert_eq!(requested, 1000);
            assert_eq!((suite.get_space)(), 0);
            (suite.dispose)(&mut ptr);
            assert_eq!((suite.get_space)(), 1000);
        }
    }
}
