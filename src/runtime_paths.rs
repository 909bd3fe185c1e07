use std::{env, path::PathBuf};

use crate::DESKTOP_ROOT_ENV;

pub(crate) fn default_packaged_root_dir() -> Option<PathBuf> {
    if let Ok(root) = env::var(DESKTOP_ROOT_ENV) {
        let path = PathBuf::from(root.trim());
        if !path.as_os_str().is_empty() {
            return Some(path);
        }
    }

    home::home_dir().map(|home| home.join(".ryh-admin"))
}
