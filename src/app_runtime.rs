use tauri::{webview::PageLoadEvent, Manager, RunEvent, WindowEvent};

use crate::{
    append_desktop_log, append_startup_log, devtools_guard, event_bridge, window_actions,
    DesktopConfig, DevtoolsWatchState, ExitDecision, LifecycleController, LifecycleEvent,
    PageLoadState, TauriUpdateClient, TauriWindowHost, DESKTOP_LOG_FILE, MAIN_WINDOW_LABEL,
};

fn should_prevent_exit(decision: Option<ExitDecision>) -> bool {
    matches!(decision, Some(ExitDecision::KeepRunning))
}

pub(crate) fn run() {
    append_startup_log("desktop process starting");
    append_startup_log(&format!(
        "desktop log path: {}",
        crate::logging::resolve_desktop_log_path(
            crate::runtime_paths::default_packaged_root_dir(),
            DESKTOP_LOG_FILE,
        )
        .display()
    ));

    let config = match DesktopConfig::from_env() {
        Ok(config) => config,
        Err(error) => {
            append_startup_log(&format!("desktop startup failed: {error}"));
            std::process::exit(1);
        }
    };
    append_startup_log(&config.describe());
    for warning in &config.warnings {
        append_startup_log(warning);
    }

    tauri::Builder::default()
        .plugin(tauri_plugin_single_instance::init(|app, _argv, _cwd| {
            append_desktop_log("second instance launched; reactivating main window");
            event_bridge::handle_lifecycle_event(app, LifecycleEvent::Activate);
            window_actions::focus_main_window(app, append_desktop_log);
        }))
        .plugin(tauri_plugin_updater::Builder::new().build())
        .plugin(tauri_plugin_notification::init())
        .manage(DevtoolsWatchState::default())
        .manage(PageLoadState::default())
        .on_page_load(|webview, payload| {
            if webview.label() != MAIN_WINDOW_LABEL {
                return;
            }

            match payload.event() {
                PageLoadEvent::Started => {
                    append_desktop_log(&format!("page-load started: {}", payload.url()));
                }
                PageLoadEvent::Finished => {
                    append_desktop_log(&format!("page-load finished: {}", payload.url()));
                    if let Some(page_loads) = webview.app_handle().try_state::<PageLoadState>() {
                        page_loads.finish(payload.url());
                    }
                }
            }
        })
        .on_window_event(|window, event| {
            if window.label() != MAIN_WINDOW_LABEL {
                return;
            }

            if let WindowEvent::Destroyed = event {
                let app_handle = window.app_handle();
                devtools_guard::stop_devtools_watch(app_handle);
                event_bridge::handle_lifecycle_event(app_handle, LifecycleEvent::WindowClosed);
                // Only after the slot is empty, so the abandoned load is not fatal.
                if let Some(page_loads) = app_handle.try_state::<PageLoadState>() {
                    page_loads.cancel();
                }
            }
        })
        .setup(move |app| {
            let app_handle = app.handle().clone();
            let log: fn(&str) = append_desktop_log;
            if !app.manage(LifecycleController::new(
                TauriWindowHost::new(app_handle.clone()),
                TauriUpdateClient::new(app_handle.clone()),
                config,
                log,
            )) {
                append_startup_log("lifecycle controller already exists, skipping manage");
            }

            event_bridge::handle_lifecycle_event(&app_handle, LifecycleEvent::Ready);
            Ok(())
        })
        .build(tauri::generate_context!())
        .expect("error while building tauri application")
        .run(|app_handle, event| match event {
            RunEvent::ExitRequested {
                code: None, api, ..
            } => {
                let decision =
                    event_bridge::handle_lifecycle_event(app_handle, LifecycleEvent::AllWindowsClosed);
                if should_prevent_exit(decision) {
                    api.prevent_exit();
                }
            }
            #[cfg(target_os = "macos")]
            RunEvent::Reopen { .. } => {
                event_bridge::handle_lifecycle_event(app_handle, LifecycleEvent::Activate);
            }
            _ => {}
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_keep_running_prevents_exit() {
        assert!(should_prevent_exit(Some(ExitDecision::KeepRunning)));
        assert!(!should_prevent_exit(Some(ExitDecision::Terminate)));
        assert!(!should_prevent_exit(None));
    }
}
