//! Status codes and the internal error type for suite operations.
//!
//! Native plugins only ever see a fixed-width status code. Inside the host every
//! fallible table operation returns [`SuiteResult`], and the native trampolines
//! collapse it to a code with [`status_of`] at the boundary.
//!
//! ## Vocabulary
//!
//! The set of codes is closed and externally defined:
//!
//! - **`BadParameter`**: unknown handle, out-of-range index, wrong value tag, or a
//!   caller buffer that cannot hold the complete result.
//! - **`OutOfMemory`**: an allocation failed and was caught by the host.
//! - **`Unimplemented`**: the host deliberately does not provide the capability
//!   (descriptor equality, fixed-point romanization, colour picking).
//! - **`BufferTooSmall`**: string-suite extraction into an undersized buffer.
//! - **`LogicError`**: the request is well formed but contradicts the stored data,
//!   e.g. reading a run of integers that contains a non-integer.
//! - **`NilHandle`**: handle-suite resize of a block the host never issued.
//! - **`SuiteNotFound`** / **`SuiteVersionUnsupported`**: suite acquisition
//!   failures; a known suite requested at an unknown version gets the latter.

use thiserror::Error;

use crate::fourcc::four_char_code;

/// Native status type returned by every suite procedure.
pub type SPErr = i32;

/// Success.
pub const NO_ERROR: SPErr = 0;
/// Bad parameter (`'Parm'`).
pub const BAD_PARAMETER: SPErr = four_char_code(*b"Parm") as SPErr;
/// Out of memory (same value as the classic `memFullErr`).
pub const OUT_OF_MEMORY: SPErr = -108;
/// Capability not provided by this host (`'!IMP'`).
pub const UNIMPLEMENTED: SPErr = four_char_code(*b"!IMP") as SPErr;
/// Destination buffer too small (`'BFS!'`).
pub const BUFFER_TOO_SMALL: SPErr = four_char_code(*b"BFS!") as SPErr;
/// A required parameter is missing.
pub const MISSING_PARAMETER: SPErr = -1715;
/// The user canceled the operation.
pub const USER_CANCELED: SPErr = -128;
/// Internal logic error (`'fbar'`).
pub const LOGIC_ERROR: SPErr = four_char_code(*b"fbar") as SPErr;
/// Handle not issued by this host.
pub const NIL_HANDLE: SPErr = -109;
/// No suite registered under the requested name (`'S!Fd'`).
pub const SUITE_NOT_FOUND: SPErr = four_char_code(*b"S!Fd") as SPErr;
/// Suite known, version not offered (`'SIVs'`).
pub const SUITE_VERSION_UNSUPPORTED: SPErr = four_char_code(*b"SIVs") as SPErr;

/// Convenience alias for results of suite table operations.
pub type SuiteResult<T> = std::result::Result<T, SuiteError>;

/// Error raised by a suite table operation.
///
/// Every variant corresponds to exactly one native status code; see
/// [`SuiteError::code`].
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SuiteError {
    /// Unknown handle, bad index, wrong tag, or an undersized output buffer.
    #[error("bad parameter")]
    BadParameter,

    /// An allocation failed.
    #[error("out of memory")]
    OutOfMemory,

    /// The capability is intentionally not provided by this host.
    #[error("operation not implemented by this host")]
    Unimplemented,

    /// The destination buffer cannot hold the result and its terminator/prefix.
    #[error("destination buffer too small")]
    BufferTooSmall,

    /// A required parameter was not supplied.
    #[error("missing parameter")]
    MissingParameter,

    /// The user canceled.
    #[error("user canceled")]
    UserCanceled,

    /// The request contradicts the stored data.
    #[error("logic error")]
    LogicError,

    /// The memory block handle was not issued by this host.
    #[error("nil handle")]
    NilHandle,

    /// No suite is registered under the requested name.
    #[error("suite not found")]
    SuiteNotFound,

    /// The suite exists but not at the requested version.
    #[error("suite version not supported")]
    SuiteVersionUnsupported,
}

impl SuiteError {
    /// The fixed native status code for this error.
    pub const fn code(self) -> SPErr {
        match self {
            SuiteError::BadParameter => BAD_PARAMETER,
            SuiteError::OutOfMemory => OUT_OF_MEMORY,
            SuiteError::Unimplemented => UNIMPLEMENTED,
            SuiteError::BufferTooSmall => BUFFER_TOO_SMALL,
            SuiteError::MissingParameter => MISSING_PARAMETER,
            SuiteError::UserCanceled => USER_CANCELED,
            SuiteError::LogicError => LOGIC_ERROR,
            SuiteError::NilHandle => NIL_HANDLE,
            SuiteError::SuiteNotFound => SUITE_NOT_FOUND,
            SuiteError::SuiteVersionUnsupported => SUITE_VERSION_UNSUPPORTED,
        }
    }

    /// Inverse of [`SuiteError::code`]. Returns `None` for success and for
    /// codes outside the vocabulary.
    pub const fn from_code(code: SPErr) -> Option<Self> {
        match code {
            BAD_PARAMETER => Some(SuiteError::BadParameter),
            OUT_OF_MEMORY => Some(SuiteError::OutOfMemory),
            UNIMPLEMENTED => Some(SuiteError::Unimplemented),
            BUFFER_TOO_SMALL => Some(SuiteError::BufferTooSmall),
            MISSING_PARAMETER => Some(SuiteError::MissingParameter),
            USER_CANCELED => Some(SuiteError::UserCanceled),
            LOGIC_ERROR => Some(SuiteError::LogicError),
            NIL_HANDLE => Some(SuiteError::NilHandle),
            SUITE_NOT_FOUND => Some(SuiteError::SuiteNotFound),
            SUITE_VERSION_UNSUPPORTED => Some(SuiteError::SuiteVersionUnsupported),
            _ => None,
        }
    }
}

impl From<std::collections::TryReserveError> for SuiteError {
    fn from(_: std::collections::TryReserveError) -> Self {
        SuiteError::OutOfMemory
    }
}

/// Collapse a unit result into the native status code.
#[inline]
pub fn status_of(result: SuiteResult<()>) -> SPErr {
    match result {
        Ok(()) => NO_ERROR,
        Err(err) => err.code(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [SuiteError; 10] = [
        SuiteError::BadParameter,
        SuiteError::OutOfMemory,
        SuiteError::Unimplemented,
        SuiteError::BufferTooSmall,
        SuiteError::MissingParameter,
        SuiteError::UserCanceled,
        SuiteError::LogicError,
        SuiteError::NilHandle,
        SuiteError::SuiteNotFound,
        SuiteError::SuiteVersionUnsupported,
    ];

    #[test]
    fn test_codes_are_distinct_and_nonzero() {
        let mut seen = std::collections::HashSet::new();
        for err in ALL {
            assert_ne!(err.code(), NO_ERROR, "{err} must not map to success");
            assert!(seen.insert(err.code()), "duplicate code for {err}");
        }
    }

    #[test]
    fn test_from_code_inverts_code() {
        for err in ALL {
            assert_eq!(SuiteError::from_code(err.code()), Some(err));
        }
        assert_eq!(SuiteError::from_code(NO_ERROR), None);
        assert_eq!(SuiteError::from_code(12345), None);
    }

    #[test]
    fn test_four_char_codes() {
        assert_eq!(BAD_PARAMETER, 0x5061_726D);
        assert_eq!(UNIMPLEMENTED, 0x2149_4D50);
        assert_eq!(status_of(Ok(())), NO_ERROR);
        assert_eq!(status_of(Err(SuiteError::LogicError)), LOGIC_ERROR);
    }
}
