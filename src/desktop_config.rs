use std::{env, path::PathBuf};

use url::Url;

use crate::{
    HostPlatform, WindowSpec, DEBUGGING_ENV, DEFAULT_DEV_SERVER_URL, DEFAULT_PRELOAD_EXTENSION,
    DEV_MODE_ENV, DEV_SERVER_URL_ENV, PACKAGED_ENTRY_FILE, PRELOAD_EXTENSION_ENV,
    PRELOAD_FOLDER_ENV, PRELOAD_SCRIPT_STEM,
};

/// Process-wide settings, read once before the Tauri builder runs.
#[derive(Debug, Clone)]
pub(crate) struct DesktopConfig {
    pub(crate) dev_mode: bool,
    pub(crate) debugging: bool,
    pub(crate) dev_server_url: Url,
    pub(crate) packaged_entry: String,
    pub(crate) window: WindowSpec,
    pub(crate) platform: HostPlatform,
    /// Set when a configured value was rejected and replaced by its default.
    pub(crate) warnings: Vec<String>,
}

impl DesktopConfig {
    pub(crate) fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut warnings = Vec::new();

        let dev_server_url = match lookup(DEV_SERVER_URL_ENV) {
            Some(raw) => match normalize_dev_server_url(&raw) {
                Some(url) => url,
                None => {
                    warnings.push(format!(
                        "invalid {DEV_SERVER_URL_ENV} '{raw}', using {DEFAULT_DEV_SERVER_URL}"
                    ));
                    default_dev_server_url()?
                }
            },
            None => default_dev_server_url()?,
        };

        let preload_script = lookup(PRELOAD_FOLDER_ENV)
            .map(|folder| folder.trim().to_string())
            .filter(|folder| !folder.is_empty())
            .map(|folder| {
                let extension = lookup(PRELOAD_EXTENSION_ENV)
                    .map(|value| value.trim().to_string())
                    .filter(|value| !value.is_empty())
                    .unwrap_or_else(|| DEFAULT_PRELOAD_EXTENSION.to_string());
                preload_script_path(&folder, &extension)
            });

        let debugging = lookup(DEBUGGING_ENV).as_deref().is_some_and(parse_flag);
        Ok(Self {
            dev_mode: lookup(DEV_MODE_ENV).as_deref().is_some_and(parse_flag),
            debugging,
            dev_server_url,
            packaged_entry: PACKAGED_ENTRY_FILE.to_string(),
            window: WindowSpec::main_window(preload_script, debugging),
            platform: HostPlatform::current(),
            warnings,
        })
    }

    pub(crate) fn describe(&self) -> String {
        let content = if self.dev_mode {
            format!("dev server {}", self.dev_server_url)
        } else {
            format!("packaged {}", self.packaged_entry)
        };
        let preload = self
            .window
            .preload_script
            .as_ref()
            .map(|path| path.display().to_string())
            .unwrap_or_else(|| "none".to_string());
        format!(
            "desktop config: content={} debugging={} preload={} platform={}",
            content, self.debugging, preload, self.platform
        )
    }
}

fn parse_flag(raw: &str) -> bool {
    !matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "" | "0" | "false" | "no" | "off"
    )
}

fn default_dev_server_url() -> Result<Url, String> {
    Url::parse(DEFAULT_DEV_SERVER_URL)
        .map_err(|error| format!("Invalid default dev server URL: {error}"))
}

pub(crate) fn normalize_dev_server_url(raw: &str) -> Option<Url> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let mut parsed = Url::parse(trimmed).ok()?;
    match parsed.scheme() {
        "http" | "https" => {}
        _ => return None,
    }
    if parsed.path().is_empty() {
        parsed.set_path("/");
    }
    Some(parsed)
}

pub(crate) fn preload_script_path(folder: &str, extension: &str) -> PathBuf {
    let extension = if extension.starts_with('.') {
        extension.to_string()
    } else {
        format!(".{extension}")
    };
    PathBuf::from(folder).join(format!("{PRELOAD_SCRIPT_STEM}{extension}"))
}
