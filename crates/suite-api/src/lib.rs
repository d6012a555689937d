//! Native-facing surface of the plugin suite host.
//!
#![allow(unsafe_code)] // dispatch tables hold raw function pointers
//! This crate describes what a native plugin sees: the `#[repr(C)]` dispatch
//! tables of every suite, the names and versions under which they are offered,
//! and the registry that keeps acquired tables alive.
//!
//! # Architecture
//!
//! ```text
//! SP Basic AcquireSuite(name, version)
//! ├── negotiate()          ← version.rs
//! ├── SuiteProvider::build ← host trampolines
//! └── SuiteRegistry        ← registry.rs (owns the boxed table)
//! ```

pub mod registry;
pub mod tables;
pub mod version;

pub use registry::{SuiteProvider, SuiteRegistry, SuiteTable};
pub use version::{negotiate, offered_suites, SuiteAcquireError, SuiteInfo, SuiteKey, SuiteKind};

/// Everything a trampoline module needs.
pub mod prelude {
    pub use crate::registry::{SuiteProvider, SuiteRegistry, SuiteTable};
    pub use crate::tables::*;
    pub use crate::version::{negotiate, SuiteAcquireError, SuiteKey, SuiteKind};
    pub use suite_core::{status_of, SPErr, SuiteError, SuiteResult, NO_ERROR};
}
