use std::{
    sync::{Arc, Mutex},
    time::Instant,
};

use futures::{future::BoxFuture, FutureExt};
use tauri::{AppHandle, Manager};
use tauri_plugin_notification::NotificationExt;
use tauri_plugin_updater::{Update, UpdaterExt};

use crate::{append_update_log, event_bridge, LifecycleEvent, UpdateClient, MAIN_WINDOW_TITLE};

struct PendingInstall {
    update: Update,
    bytes: Vec<u8>,
}

/// Update client backed by `tauri-plugin-updater`.
///
/// A successful check downloads the update right away and keeps the bytes
/// until `quit_and_install` is called.
#[derive(Clone)]
pub(crate) struct TauriUpdateClient {
    app_handle: AppHandle,
    pending: Arc<Mutex<Option<PendingInstall>>>,
}

impl TauriUpdateClient {
    pub(crate) fn new(app_handle: AppHandle) -> Self {
        Self {
            app_handle,
            pending: Arc::new(Mutex::new(None)),
        }
    }

    async fn check_and_download(self) -> Result<(), String> {
        let current_version = self.app_handle.package_info().version.to_string();
        let updater = self
            .app_handle
            .updater()
            .map_err(|error| format!("Failed to initialize updater: {error}"))?;

        let check_started = Instant::now();
        let update = updater
            .check()
            .await
            .map_err(|error| format!("Failed to check for updates: {error}"))?;
        let Some(update) = update else {
            append_update_log(&format!(
                "no update available: current_version={} elapsed_ms={}",
                current_version,
                check_started.elapsed().as_millis()
            ));
            return Ok(());
        };

        let new_version = update.version.clone();
        append_update_log(&format!(
            "update found: current_version={} latest_version={} elapsed_ms={}",
            current_version,
            new_version,
            check_started.elapsed().as_millis()
        ));
        event_bridge::dispatch_lifecycle_event(&self.app_handle, LifecycleEvent::UpdateAvailable);

        let bytes = update
            .download(|_, _| {}, || {})
            .await
            .map_err(|error| format!("Failed to download update {new_version}: {error}"))?;
        append_update_log(&format!(
            "update {} downloaded ({} bytes)",
            new_version,
            bytes.len()
        ));

        self.notify_update_ready(&new_version);
        *self
            .pending
            .lock()
            .map_err(|_| "Pending update lock poisoned.".to_string())? =
            Some(PendingInstall { update, bytes });
        event_bridge::dispatch_lifecycle_event(&self.app_handle, LifecycleEvent::UpdateDownloaded);
        Ok(())
    }

    fn notify_update_ready(&self, version: &str) {
        let shown = self
            .app_handle
            .notification()
            .builder()
            .title(MAIN_WINDOW_TITLE)
            .body(format!(
                "Version {version} has been downloaded and will be installed on restart."
            ))
            .show();
        if let Err(error) = shown {
            append_update_log(&format!("failed to show update notification: {error}"));
        }
    }
}

impl UpdateClient for TauriUpdateClient {
    fn check_for_updates_and_notify(&self) -> BoxFuture<'static, Result<(), String>> {
        self.clone().check_and_download().boxed()
    }

    fn quit_and_install(&self) -> Result<(), String> {
        let pending = self
            .pending
            .lock()
            .map_err(|_| "Pending update lock poisoned.".to_string())?
            .take()
            .ok_or_else(|| "No downloaded update is waiting to be installed.".to_string())?;

        let version = pending.update.version.clone();
        pending
            .update
            .install(&pending.bytes)
            .map_err(|error| format!("Failed to install update {version}: {error}"))?;

        append_update_log(&format!("update {version} installed; restarting app"));
        self.app_handle.request_restart();
        Ok(())
    }
}
