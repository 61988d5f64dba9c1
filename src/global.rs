//! Process-wide resolver instance.
//!
//! Optional: embedders that want a single shared resolver install one here
//! and reach it through `with`. Tests build isolated instances instead.

use crate::error::ConfigError;
use crate::resolver::SettingsResolver;
use crate::sources::BootEnvironment;
use parking_lot::{const_mutex, Mutex};
use tracing::warn;

static INSTANCE: Mutex<Option<SettingsResolver>> = const_mutex(None);

/// Build, initialize and install a resolver. Installing twice replaces the
/// previous instance.
pub fn install(env: BootEnvironment) -> Result<(), ConfigError> {
    let mut resolver = SettingsResolver::new(env);
    resolver.init()?;
    install_resolver(resolver);
    Ok(())
}

pub fn install_resolver(resolver: SettingsResolver) {
    let mut slot = INSTANCE.lock();
    if slot.is_some() {
        warn!("Replacing the installed settings resolver");
    }
    *slot = Some(resolver);
}

pub fn is_installed() -> bool {
    INSTANCE.lock().is_some()
}

/// Run `f` against the installed resolver; `None` when nothing is installed.
///
/// The lock is held while `f` runs, so `f` must not call back into this
/// module.
pub fn with<R>(f: impl FnOnce(&mut SettingsResolver) -> R) -> Option<R> {
    INSTANCE.lock().as_mut().map(f)
}

/// Remove and return the installed resolver.
pub fn teardown() -> Option<SettingsResolver> {
    INSTANCE.lock().take()
}
