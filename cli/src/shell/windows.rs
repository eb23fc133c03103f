use std::io;
use std::path::Path;

use winreg::enums::HKEY_CLASSES_ROOT;
use winreg::RegKey;

use super::RegistrationError;

const FILE_KEY: &str = r"*\shell\SafeWipe";
const DIR_KEY: &str = r"Directory\shell\SafeWipe";
const MENU_TEXT: &str = "Secure erase";

/// Create the context-menu keys for both files and directories.
pub fn register(exe_path: &Path) -> Result<(), RegistrationError> {
    let classes = RegKey::predef(HKEY_CLASSES_ROOT);
    let icon = exe_path.display().to_string();
    let command = format!("\"{}\" --yes \"%1\"", exe_path.display());

    for root in [FILE_KEY, DIR_KEY] {
        let (menu, _) = classes
            .create_subkey(root)
            .map_err(|e| key_error("create", root, e))?;
        menu.set_value("", &MENU_TEXT)
            .map_err(|e| key_error("set name on", root, e))?;
        menu.set_value("Icon", &icon)
            .map_err(|e| key_error("set icon on", root, e))?;

        let command_key = format!(r"{root}\command");
        let (cmd, _) = classes
            .create_subkey(&command_key)
            .map_err(|e| key_error("create", &command_key, e))?;
        cmd.set_value("", &command)
            .map_err(|e| key_error("set command on", &command_key, e))?;
    }

    Ok(())
}

/// Delete the context-menu keys; missing keys are not an error.
pub fn unregister() -> Result<(), RegistrationError> {
    let classes = RegKey::predef(HKEY_CLASSES_ROOT);

    for root in [FILE_KEY, DIR_KEY] {
        for key in [format!(r"{root}\command"), root.to_string()] {
            match classes.delete_subkey(&key) {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => return Err(key_error("delete", &key, e)),
            }
        }
    }

    Ok(())
}

fn key_error(action: &str, key: &str, err: io::Error) -> RegistrationError {
    RegistrationError(format!("failed to {action} registry key '{key}': {err}"))
}
