//! Shared hard limits for native-supplied sizes.
//!
//! Native callers pass raw counts and lengths; these caps keep a corrupt value
//! from turning into an unbounded allocation before the allocator gets a say.

use crate::error::{SuiteError, SuiteResult};

/// Longest Pascal string payload (the length prefix is one byte).
pub const MAX_PASCAL_LEN: usize = 255;

/// Maximum bytes scanned when reading a null-terminated C string from native
/// memory (16MB).
pub const MAX_C_STRING_SCAN: usize = 16 * 1024 * 1024;

/// Maximum element count accepted by integer-array procedures.
pub const MAX_INTEGER_RUN: usize = 16 * 1024 * 1024;

/// Maximum size of a single memory block or buffer (1GB).
pub const MAX_BLOCK_BYTES: usize = 1024 * 1024 * 1024;

/// Maximum nesting depth accepted when decoding persisted descriptor trees.
pub const MAX_DECODE_DEPTH: usize = 64;

/// Validate a native element count against [`MAX_INTEGER_RUN`].
pub fn validate_integer_run(count: u32) -> SuiteResult<usize> {
    let count = count as usize;
    if count > MAX_INTEGER_RUN {
        return Err(SuiteError::BadParameter);
    }
    Ok(count)
}

/// Validate a native byte size against [`MAX_BLOCK_BYTES`].
pub fn validate_block_size(size: i64) -> SuiteResult<usize> {
    if size < 0 {
        return Err(SuiteError::BadParameter);
    }
    let size = usize::try_from(size).map_err(|_| SuiteError::OutOfMemory)?;
    if size > MAX_BLOCK_BYTES {
        return Err(SuiteError::OutOfMemory);
    }
    Ok(size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_block_size() {
        assert_eq!(validate_block_size(0), Ok(0));
        assert_eq!(validate_block_size(4096), Ok(4096));
        assert_eq!(validate_block_size(-1), Err(SuiteError::BadParameter));
        assert_eq!(
            validate_block_size(MAX_BLOCK_BYTES as i64 + 1),
            Err(SuiteError::OutOfMemory)
        );
    }

    #[test]
    fn test_validate_integer_run() {
        assert_eq!(validate_integer_run(3), Ok(3));
        assert!(validate_integer_run(u32::MAX).is_err());
    }
}
