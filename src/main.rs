#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app_constants;
mod app_runtime;
mod app_types;
mod app_updater;
mod desktop_config;
mod devtools_guard;
mod event_bridge;
mod lifecycle;
mod logging;
mod main_window;
mod page_load;
mod preload_script;
mod runtime_paths;
#[cfg(test)]
mod test_support;
mod ui_dispatch;
mod window_actions;
mod window_host;

pub(crate) use app_constants::*;
pub(crate) use app_types::{ExitDecision, HostPlatform, WindowSpec, WindowStatus};
pub(crate) use app_updater::TauriUpdateClient;
pub(crate) use desktop_config::DesktopConfig;
pub(crate) use devtools_guard::DevtoolsWatchState;
pub(crate) use lifecycle::{EventOutcome, LifecycleController, LifecycleEvent, StartupOutcome};
pub(crate) use logging::{append_desktop_log, append_startup_log, append_update_log};
pub(crate) use main_window::TauriWindowHost;
pub(crate) use page_load::PageLoadState;
pub(crate) use window_host::{AppWindow, UpdateClient, WindowHost};

fn main() {
    app_runtime::run();
}
