use std::path::{Path, PathBuf};

use futures::{
    future::{self, BoxFuture},
    FutureExt,
};
use tauri::{
    image::Image, path::BaseDirectory, AppHandle, Emitter, Manager, WebviewUrl, WebviewWindow,
    WebviewWindowBuilder,
};
use url::Url;

use crate::{
    append_desktop_log, devtools_guard, preload_script, AppWindow, PageLoadState, WindowHost,
    WindowSpec, MAIN_WINDOW_LABEL,
};

#[cfg(any(target_os = "windows", target_os = "android"))]
const PACKAGED_ASSET_ORIGIN: &str = "http://tauri.localhost/";
#[cfg(not(any(target_os = "windows", target_os = "android")))]
const PACKAGED_ASSET_ORIGIN: &str = "tauri://localhost/";

const INITIAL_WINDOW_URL: &str = "about:blank";

pub(crate) fn packaged_asset_url(entry: &str) -> Result<Url, String> {
    let origin = Url::parse(PACKAGED_ASSET_ORIGIN)
        .map_err(|error| format!("Invalid packaged asset origin: {error}"))?;
    origin
        .join(entry.trim_start_matches('/'))
        .map_err(|error| format!("Invalid packaged entry '{entry}': {error}"))
}

fn resolve_resource_path(app_handle: &AppHandle, relative_path: &Path) -> Option<PathBuf> {
    app_handle
        .path()
        .resolve(relative_path, BaseDirectory::Resource)
        .ok()
}

pub(crate) struct TauriWindowHost {
    app_handle: AppHandle,
}

impl TauriWindowHost {
    pub(crate) fn new(app_handle: AppHandle) -> Self {
        Self { app_handle }
    }

    fn load_icon(&self, icon_path: &Path) -> Option<Image<'static>> {
        let resolved = resolve_resource_path(&self.app_handle, icon_path)?;
        match Image::from_path(&resolved) {
            Ok(icon) => Some(icon),
            Err(error) => {
                append_desktop_log(&format!(
                    "failed to load window icon {}: {error}",
                    resolved.display()
                ));
                None
            }
        }
    }

    fn load_preload_script(&self, spec: &WindowSpec) -> Option<String> {
        let relative_path = spec.preload_script.as_deref()?;
        let Some(resolved) = resolve_resource_path(&self.app_handle, relative_path) else {
            append_desktop_log(&format!(
                "preload script {} could not be resolved; continuing without it",
                relative_path.display()
            ));
            return None;
        };

        match preload_script::read_preload_script(&resolved, spec.content_isolation) {
            Ok(script) => Some(script),
            Err(error) => {
                append_desktop_log(&format!("{error}; continuing without preload script"));
                None
            }
        }
    }
}

impl WindowHost for TauriWindowHost {
    type Window = TauriWindow;

    fn create_window(&self, spec: &WindowSpec) -> Result<TauriWindow, String> {
        let initial_url = Url::parse(INITIAL_WINDOW_URL)
            .map_err(|error| format!("Invalid initial window URL: {error}"))?;
        let mut builder = WebviewWindowBuilder::new(
            &self.app_handle,
            MAIN_WINDOW_LABEL,
            WebviewUrl::External(initial_url),
        )
        .title(spec.title.as_str())
        .inner_size(spec.width, spec.height)
        .resizable(spec.resizable)
        .devtools(spec.devtools);

        if let Some(icon) = self.load_icon(&spec.icon_path) {
            builder = builder
                .icon(icon)
                .map_err(|error| format!("Failed to apply window icon: {error}"))?;
        }
        if let Some(script) = self.load_preload_script(spec) {
            builder = builder.initialization_script(script.as_str());
        }

        let window = builder
            .build()
            .map_err(|error| format!("Failed to build webview window: {error}"))?;
        if !spec.menu_bar_visible {
            hide_menu_bar(&window);
        }

        Ok(TauriWindow {
            app_handle: self.app_handle.clone(),
            window,
        })
    }
}

#[cfg(not(target_os = "macos"))]
fn hide_menu_bar(window: &WebviewWindow) {
    if let Err(error) = window.remove_menu() {
        append_desktop_log(&format!("failed to hide main window menu bar: {error}"));
    }
}

// macOS has a single application menu and no per-window menu bar.
#[cfg(target_os = "macos")]
fn hide_menu_bar(_window: &WebviewWindow) {}

#[derive(Clone)]
pub(crate) struct TauriWindow {
    app_handle: AppHandle,
    window: WebviewWindow,
}

impl TauriWindow {
    /// Navigates to `url` and settles once the page reports `Finished`.
    fn navigate_and_wait(&self, url: Url) -> BoxFuture<'static, Result<(), String>> {
        let Some(page_loads) = self.app_handle.try_state::<PageLoadState>() else {
            return future::ready(Err("page load tracking is not initialized".to_string())).boxed();
        };

        let finished = page_loads.begin();
        if let Err(error) = self.window.navigate(url) {
            page_loads.cancel();
            return future::ready(Err(format!("navigation failed: {error}"))).boxed();
        }

        async move {
            finished
                .await
                .map(|_| ())
                .map_err(|_| "window closed before the page finished loading".to_string())
        }
        .boxed()
    }
}

impl AppWindow for TauriWindow {
    fn load_url(&self, url: &Url) -> BoxFuture<'static, Result<(), String>> {
        self.navigate_and_wait(url.clone())
    }

    fn load_file(&self, entry: &str) -> BoxFuture<'static, Result<(), String>> {
        match packaged_asset_url(entry) {
            Ok(url) => self.navigate_and_wait(url),
            Err(error) => future::ready(Err(error)).boxed(),
        }
    }

    fn open_devtools(&self) {
        self.window.open_devtools();
    }

    fn close_devtools(&self) {
        self.window.close_devtools();
    }

    fn watch_devtools(&self) {
        devtools_guard::spawn_devtools_watch(&self.app_handle, self.window.clone());
    }

    fn send(&self, channel: &str) -> Result<(), String> {
        self.window
            .emit_to(self.window.label(), channel, ())
            .map_err(|error| format!("emit failed: {error}"))
    }
}
