//! Core types shared by every suite of the plugin host.
//!
//! - [`error`]: the closed status-code vocabulary and [`SuiteError`]
//! - [`handle`]: opaque handle newtypes and the minting [`HandleTable`]
//! - [`fourcc`] / [`terms`]: four-character codes and the scripting type ids
//! - [`limits`]: caps applied to native-supplied sizes

pub mod error;
pub mod fourcc;
pub mod handle;
pub mod limits;
pub mod terms;

pub use error::{status_of, SPErr, SuiteError, SuiteResult, NO_ERROR};
pub use fourcc::{four_char_code, FourCc};
pub use handle::{
    ColorHandle, DescriptorHandle, HandleTable, ListHandle, OpaqueHandle, ReferenceHandle,
    ZStringHandle,
};
