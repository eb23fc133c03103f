//! File-manager integration: a context-menu entry that invokes the
//! sanitizer on the selected file or directory.
//!
//! This collaborator is opaque to the sanitization core; its failures
//! never affect a running batch.

use std::path::Path;

use thiserror::Error;

#[cfg(windows)]
mod windows;

#[cfg(all(unix, not(target_os = "macos")))]
mod linux;

/// Error raised by the platform shell integration.
#[derive(Debug, Error)]
#[error("shell registration failed: {0}")]
pub struct RegistrationError(pub String);

/// Add the context-menu entry for the current user.
pub fn register_shell_action(exe_path: &Path) -> Result<(), RegistrationError> {
    #[cfg(windows)]
    {
        windows::register(exe_path)
    }

    #[cfg(all(unix, not(target_os = "macos")))]
    {
        linux::register(exe_path)
    }

    #[cfg(not(any(windows, all(unix, not(target_os = "macos")))))]
    {
        let _ = exe_path;
        Err(RegistrationError(
            "shell integration is not supported on this platform".to_string(),
        ))
    }
}

/// Remove the context-menu entry for the current user.
pub fn unregister_shell_action() -> Result<(), RegistrationError> {
    #[cfg(windows)]
    {
        windows::unregister()
    }

    #[cfg(all(unix, not(target_os = "macos")))]
    {
        linux::unregister()
    }

    #[cfg(not(any(windows, all(unix, not(target_os = "macos")))))]
    {
        Err(RegistrationError(
            "shell integration is not supported on this platform".to_string(),
        ))
    }
}
