//! The façade the plugin pipeline talks to.
//!
//! Native suite procedures receive no context pointer, so the host publishes
//! its session in a thread-local slot while a plugin runs:
//!
//! ```text
//! let _scope = host.enter();     // slot = this host's session
//! plugin_main(basic_suite, ..);  // callbacks find the session in the slot
//! drop(_scope);                  // slot = whatever was there before
//! ```
//!
//! A callback that arrives outside any scope, or while the session is already
//! borrowed by another callback on the stack, is refused with bad-parameter.

use std::cell::RefCell;
use std::ffi::c_void;
use std::marker::PhantomData;
use std::path::PathBuf;
use std::rc::Rc;

use suite_api::tables::SPBasicSuite4;
use suite_api::{SuiteKind, SuiteRegistry};
use suite_core::{SuiteError, SuiteResult};
use suite_pool::BlockHandle;
use tracing::{info, warn};

use crate::config::HostConfig;
use crate::error::HostResult;
use crate::ffi::NativeSuites;
use crate::persist::SettingsStore;
use crate::scripting::ScriptingDictionary;
use crate::session::{SessionStats, SuiteSession};
use crate::value::Descriptor;

type SharedSession = Rc<RefCell<SuiteSession>>;

thread_local! {
    static ACTIVE: RefCell<Option<SharedSession>> = const { RefCell::new(None) };
}

/// Run `f` against the session of the innermost active scope.
pub(crate) fn with_session<R>(f: impl FnOnce(&mut SuiteSession) -> SuiteResult<R>) -> SuiteResult<R> {
    let session = ACTIVE.with(|slot| slot.borrow().clone()).ok_or_else(|| {
        warn!("suite procedure called outside a host scope");
        SuiteError::BadParameter
    })?;
    let mut session = session.try_borrow_mut().map_err(|_| {
        warn!("re-entrant suite procedure call refused");
        SuiteError::BadParameter
    })?;
    f(&mut session)
}

/// Keeps a host's session published to native callbacks on this thread.
///
/// Dropping the scope restores the previously published session, so scopes
/// nest.
#[must_use = "the session is only published while the scope is alive"]
pub struct SessionScope {
    previous: Option<SharedSession>,
    _not_send: PhantomData<*const ()>,
}

impl Drop for SessionScope {
    fn drop(&mut self) {
        let previous = self.previous.take();
        ACTIVE.with(|slot| *slot.borrow_mut() = previous);
    }
}

/// Owner of one session and the persisted settings directory.
#[derive(Debug)]
pub struct SuiteHost {
    session: SharedSession,
    settings: SettingsStore,
}

impl SuiteHost {
    pub fn new(config: &HostConfig) -> Self {
        Self {
            session: Rc::new(RefCell::new(SuiteSession::new(&config.memory))),
            settings: SettingsStore::new(&config.persistence.dir),
        }
    }

    /// Host around an existing session.
    pub fn from_session(session: SuiteSession, settings: SettingsStore) -> Self {
        Self {
            session: Rc::new(RefCell::new(session)),
            settings,
        }
    }

    /// Publish this host's session to native callbacks until the scope drops.
    pub fn enter(&self) -> SessionScope {
        let previous = ACTIVE.with(|slot| slot.borrow_mut().replace(Rc::clone(&self.session)));
        SessionScope {
            previous,
            _not_send: PhantomData,
        }
    }

    /// Run `f` with this host's session published.
    pub fn scoped<R>(&self, f: impl FnOnce() -> R) -> R {
        let _scope = self.enter();
        f()
    }

    /// Borrow the session directly. Fails while a callback holds it.
    pub fn with<R>(&self, f: impl FnOnce(&mut SuiteSession) -> SuiteResult<R>) -> HostResult<R> {
        let mut session = self
            .session
            .try_borrow_mut()
            .map_err(|_| SuiteError::BadParameter)?;
        Ok(f(&mut session)?)
    }

    /// Acquire a dispatch table by suite name and version.
    ///
    /// The returned pointer stays valid until the matching
    /// [`release_suite`](Self::release_suite) or until the host is dropped.
    pub fn acquire_suite(&self, name: &str, version: i32) -> HostResult<*const c_void> {
        let address = self.with(|session| Ok(acquire_into(&mut session.suites, name, version)))??;
        Ok(address)
    }

    pub fn release_suite(&self, name: &str, version: i32) -> HostResult<()> {
        self.with(|session| Ok(session.suites.release(name, version)))??;
        Ok(())
    }

    /// The SP Basic table handed to a plugin's entry point.
    pub fn basic_suite(&self) -> HostResult<*const SPBasicSuite4> {
        let address = self.acquire_suite(SuiteKind::Basic.name(), 4)?;
        Ok(address.cast())
    }

    pub fn set_dictionary(&self, dictionary: ScriptingDictionary) -> HostResult<()> {
        self.with(|session| {
            session.set_dictionary(dictionary);
            Ok(())
        })
    }

    /// Hand a previous run's parameters to the plugin as a descriptor block.
    pub fn set_scripting_data(&self, parameters: Descriptor) -> HostResult<BlockHandle> {
        self.with(|session| session.set_scripting_data(parameters))
    }

    /// Collect the plugin's final parameters from a descriptor block.
    pub fn take_scripting_data(&self, block: BlockHandle) -> HostResult<Descriptor> {
        self.with(|session| session.take_scripting_data(block))
    }

    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    /// Last-used parameters of `plugin_id`, if any were saved.
    pub fn load_settings(&self, plugin_id: &str) -> HostResult<Option<Descriptor>> {
        self.settings.load(plugin_id)
    }

    pub fn save_settings(&self, plugin_id: &str, parameters: &Descriptor) -> HostResult<PathBuf> {
        self.settings.save(plugin_id, parameters)
    }

    pub fn stats(&self) -> HostResult<SessionStats> {
        self.with(|session| Ok(session.stats()))
    }
}

/// Acquire through the registry with the native trampolines as provider.
pub(crate) fn acquire_into(
    registry: &mut SuiteRegistry,
    name: &str,
    version: i32,
) -> Result<*const c_void, suite_api::SuiteAcquireError> {
    let address = registry.acquire(&NativeSuites, name, version)?;
    info!(name, version, "suite acquired");
    Ok(address)
}

#[cfg(test)]
mod tests {
    use super::*;
    use suite_api::SuiteAcquireError;

    fn host() -> SuiteHost {
        SuiteHost::new(&HostConfig::default())
    }

    #[test]
    fn test_no_scope_means_no_session() {
        let result = with_session(|_| Ok(()));
        assert_eq!(result, Err(SuiteError::BadParameter));
    }

    #[test]
    fn test_scopes_nest_and_restore() {
        let outer = host();
        let inner = host();
        outer.with(|s| s.zstrings.make("outer".into()).map(|_| ())).unwrap();

        let _outer_scope = outer.enter();
        assert_eq!(with_session(|s| Ok(s.zstrings.len())), Ok(1));
        {
            let _inner_scope = inner.enter();
            assert_eq!(with_session(|s| Ok(s.zstrings.len())), Ok(0));
        }
        assert_eq!(with_session(|s| Ok(s.zstrings.len())), Ok(1));
    }

    #[test]
    #[tracing_test::traced_test]
    fn test_reentrant_call_is_refused() {
        let host = host();
        host.scoped(|| {
            let nested = with_session(|_| with_session(|_| Ok(())));
            assert_eq!(nested, Err(SuiteError::BadParameter));
        });
        assert!(logs_contain("re-entrant suite procedure call refused"));
    }

    #[test]
    fn test_acquire_and_release() {
        let host = host();
        let basic = host.basic_suite().unwrap();
        assert!(!basic.is_null());
        assert_eq!(host.stats().unwrap().suites, 1);

        host.release_suite(SuiteKind::Basic.name(), 4).unwrap();
        assert_eq!(host.stats().unwrap().suites, 0);

        let err = host.acquire_suite(SuiteKind::Handle.name(), 3).unwrap_err();
        assert!(matches!(
            err,
            crate::HostError::Acquire(SuiteAcquireError::UnsupportedVersion { .. })
        ));
    }
}
