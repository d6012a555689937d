//! # Suite Host
//!
//! Host-side implementation of the callback suites a native image-processing
//! plug-in acquires from its host: interned strings, action descriptors,
//! lists and references, memory handles and buffers, and color conversion.
//!
//! ## Crate Structure
//!
//! - **`zstring`**, **`descriptor`**, **`list`**, **`reference`**: the handle
//!   tables behind the string and scripting suites.
//! - **`value`**: the tagged value model shared by descriptors and lists.
//! - **`color_space`**: color objects and the 8/16-bit converters.
//! - **`session`**: one set of tables per plug-in session.
//! - **`host`**: the façade the plug-in pipeline talks to, and the
//!   thread-local scope native callbacks resolve their session through.
//! - **`ffi`**: `#[repr(C)]` dispatch-table trampolines.
//! - **`persist`**: binary descriptor snapshots and the last-used settings
//!   store.
//! - **`config`** / **`tracing_setup`** / **`error`**: ambient plumbing.
//!
//! Handle arenas, status codes and the memory pools live in the `suite-core`,
//! `suite-pool` and `suite-api` workspace crates.

pub mod color_space;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod ffi;
pub mod host;
pub mod list;
pub mod persist;
pub mod reference;
pub mod scripting;
pub mod session;
pub mod tracing_setup;
pub mod value;
pub mod zstring;

pub use config::HostConfig;
pub use error::{HostError, HostResult};
pub use host::{SessionScope, SuiteHost};
pub use persist::SettingsStore;
pub use scripting::{ScriptingDictionary, ScriptingParameter};
pub use session::{SessionStats, SuiteSession};
pub use value::{AeteValue, Descriptor, ReferenceForm, ReferenceStep, TaggedValue};

pub use suite_api::{SuiteAcquireError, SuiteKind};
pub use suite_core::{SuiteError, SuiteResult};
