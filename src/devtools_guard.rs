use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex,
    },
    thread,
    time::Duration,
};

use tauri::{AppHandle, Manager, WebviewWindow};

use crate::{append_desktop_log, event_bridge, LifecycleEvent, DEVTOOLS_WATCH_INTERVAL_MS};

/// Stop flag of the one running devtools watcher, if any.
#[derive(Debug, Default)]
pub(crate) struct DevtoolsWatchState {
    stop: Mutex<Option<Arc<AtomicBool>>>,
}

impl DevtoolsWatchState {
    fn replace(&self, next: Arc<AtomicBool>) {
        match self.stop.lock() {
            Ok(mut guard) => {
                if let Some(previous) = guard.replace(next) {
                    previous.store(true, Ordering::Relaxed);
                }
            }
            Err(_) => append_desktop_log("devtools watch lock poisoned; previous watcher kept"),
        }
    }

    pub(crate) fn stop(&self) {
        if let Ok(mut guard) = self.stop.lock() {
            if let Some(flag) = guard.take() {
                flag.store(true, Ordering::Relaxed);
            }
        }
    }
}

fn devtools_just_opened(was_open: bool, is_open: bool) -> bool {
    is_open && !was_open
}

/// Polls the window's devtools state and reports each opening as
/// `LifecycleEvent::DevtoolsOpened`. Replaces any previous watcher.
pub(crate) fn spawn_devtools_watch(app_handle: &AppHandle, window: WebviewWindow) {
    let Some(state) = app_handle.try_state::<DevtoolsWatchState>() else {
        append_desktop_log("devtools watch skipped: watch state is not managed");
        return;
    };

    let stop = Arc::new(AtomicBool::new(false));
    state.replace(Arc::clone(&stop));

    let watch_app = app_handle.clone();
    let spawn_result = thread::Builder::new()
        .name("devtools-watch".to_string())
        .spawn(move || {
            let mut was_open = false;
            while !stop.load(Ordering::Relaxed) {
                let is_open = window.is_devtools_open();
                if devtools_just_opened(was_open, is_open) {
                    event_bridge::dispatch_lifecycle_event(
                        &watch_app,
                        LifecycleEvent::DevtoolsOpened,
                    );
                }
                was_open = is_open;
                thread::sleep(Duration::from_millis(DEVTOOLS_WATCH_INTERVAL_MS));
            }
        });

    if let Err(error) = spawn_result {
        append_desktop_log(&format!("failed to start devtools watcher: {error}"));
    }
}

pub(crate) fn stop_devtools_watch(app_handle: &AppHandle) {
    if let Some(state) = app_handle.try_state::<DevtoolsWatchState>() {
        state.stop();
    }
}
