use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use super::RegistrationError;

const NAUTILUS_SCRIPT: &str = "Secure erase with SafeWipe";
const DOLPHIN_SERVICE: &str = "safewipe.desktop";

/// Install a Nautilus script and a Dolphin service menu for the current
/// user (per the XDG data-dir layout).
pub fn register(exe_path: &Path) -> Result<(), RegistrationError> {
    let data_dir = data_dir()?;
    let exe = exe_path.display();

    let scripts_dir = data_dir.join("nautilus/scripts");
    fs::create_dir_all(&scripts_dir)
        .map_err(|e| install_error(&scripts_dir, e))?;

    let script_path = scripts_dir.join(NAUTILUS_SCRIPT);
    let script = format!(
        r#"#!/bin/bash
# Nautilus script for SafeWipe secure deletion
if [ $# -eq 0 ]; then
  while read file; do
    "{exe}" --yes "$file"
  done < <(echo "$NAUTILUS_SCRIPT_SELECTED_FILE_PATHS" | tr '\n' '\0' | xargs -0 -n1 echo)
else
  for file in "$@"; do
    "{exe}" --yes "$file"
  done
fi
"#
    );
    fs::write(&script_path, script).map_err(|e| install_error(&script_path, e))?;
    fs::set_permissions(&script_path, fs::Permissions::from_mode(0o755))
        .map_err(|e| install_error(&script_path, e))?;

    let service_dir = data_dir.join("kservices5/ServiceMenus");
    fs::create_dir_all(&service_dir).map_err(|e| install_error(&service_dir, e))?;

    let service_path = service_dir.join(DOLPHIN_SERVICE);
    let service = format!(
        r#"[Desktop Entry]
Type=Service
X-KDE-ServiceTypes=KonqPopupMenu/Plugin
MimeType=all/all;
Actions=secureErase;

[Desktop Action secureErase]
Name=Secure erase with SafeWipe
Icon=edit-delete-shred
Exec="{exe}" --yes %f
"#
    );
    fs::write(&service_path, service).map_err(|e| install_error(&service_path, e))?;

    Ok(())
}

/// Remove the Nautilus script and Dolphin service menu; missing files
/// are not an error.
pub fn unregister() -> Result<(), RegistrationError> {
    let data_dir = data_dir()?;

    for path in [
        data_dir.join("nautilus/scripts").join(NAUTILUS_SCRIPT),
        data_dir.join("kservices5/ServiceMenus").join(DOLPHIN_SERVICE),
    ] {
        if path.exists() {
            fs::remove_file(&path)
                .map_err(|e| RegistrationError(format!("failed to remove '{}': {e}", path.display())))?;
        }
    }

    Ok(())
}

fn data_dir() -> Result<PathBuf, RegistrationError> {
    dirs::data_local_dir()
        .ok_or_else(|| RegistrationError("could not determine local data directory".to_string()))
}

fn install_error(path: &Path, err: std::io::Error) -> RegistrationError {
    RegistrationError(format!("failed to install '{}': {err}", path.display()))
}
