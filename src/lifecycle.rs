//! Window lifecycle and update relay for the main application window.
//!
//! The controller owns a single window slot and reacts to a fixed set of
//! [`LifecycleEvent`]s. It only talks to the outside world through the
//! [`WindowHost`] and [`UpdateClient`] seams, so Tauri stays out of the logic.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::future::BoxFuture;
use tauri::async_runtime::{self, JoinHandle};

use crate::{
    AppWindow, DesktopConfig, ExitDecision, UpdateClient, WindowHost, WindowStatus,
    UPDATE_AVAILABLE_EVENT,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LifecycleEvent {
    Ready,
    Activate,
    AllWindowsClosed,
    WindowClosed,
    DevtoolsOpened,
    UpdateAvailable,
    UpdateDownloaded,
}

impl LifecycleEvent {
    pub(crate) fn name(self) -> &'static str {
        match self {
            Self::Ready => "ready",
            Self::Activate => "activate",
            Self::AllWindowsClosed => "window-all-closed",
            Self::WindowClosed => "closed",
            Self::DevtoolsOpened => "devtools-opened",
            Self::UpdateAvailable => "update-available",
            Self::UpdateDownloaded => "update-downloaded",
        }
    }

    pub(crate) fn opens_window(self) -> bool {
        matches!(self, Self::Ready | Self::Activate)
    }
}

/// Background half of a startup. Resolves once the content has loaded and the
/// devtools policy is applied, carrying the update check production runs start.
pub(crate) type StartupSequence = JoinHandle<Result<Option<JoinHandle<()>>, String>>;

pub(crate) enum StartupOutcome {
    Created { sequence: StartupSequence },
    Skipped(WindowStatus),
}

struct ContentPlan {
    target: String,
    check_updates: bool,
    open_devtools: bool,
}

pub(crate) enum EventOutcome {
    Startup(StartupOutcome),
    Exit(ExitDecision),
    Handled,
}

enum WindowSlot<W> {
    Idle,
    Creating,
    Open(W),
}

impl<W: Clone> WindowSlot<W> {
    fn status(&self) -> WindowStatus {
        match self {
            Self::Idle => WindowStatus::Idle,
            Self::Creating => WindowStatus::Creating,
            Self::Open(_) => WindowStatus::Open,
        }
    }

    fn try_begin_creation(&mut self) -> Result<(), WindowStatus> {
        match self {
            Self::Idle => {
                *self = Self::Creating;
                Ok(())
            }
            _ => Err(self.status()),
        }
    }

    fn open_window(&self) -> Option<W> {
        match self {
            Self::Open(window) => Some(window.clone()),
            _ => None,
        }
    }
}

pub(crate) struct LifecycleController<H: WindowHost, U, L> {
    host: H,
    updates: Arc<U>,
    config: DesktopConfig,
    slot: Mutex<WindowSlot<H::Window>>,
    log: L,
}

impl<H, U, L> LifecycleController<H, U, L>
where
    H: WindowHost,
    U: UpdateClient,
    L: Fn(&str) + Clone + Send + Sync + 'static,
{
    pub(crate) fn new(host: H, updates: U, config: DesktopConfig, log: L) -> Self {
        Self {
            host,
            updates: Arc::new(updates),
            config,
            slot: Mutex::new(WindowSlot::Idle),
            log,
        }
    }

    fn lock_slot(&self) -> MutexGuard<'_, WindowSlot<H::Window>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn open_window(&self) -> Option<H::Window> {
        self.lock_slot().open_window()
    }

    pub(crate) fn window_status(&self) -> WindowStatus {
        self.lock_slot().status()
    }

    pub(crate) fn handle_event(&self, event: LifecycleEvent) -> Result<EventOutcome, String> {
        match event {
            LifecycleEvent::Ready => self.startup().map(EventOutcome::Startup),
            LifecycleEvent::Activate => self.reactivate().map(EventOutcome::Startup),
            LifecycleEvent::AllWindowsClosed => Ok(EventOutcome::Exit(self.all_windows_closed())),
            LifecycleEvent::WindowClosed => {
                self.window_closed();
                Ok(EventOutcome::Handled)
            }
            LifecycleEvent::DevtoolsOpened => {
                self.devtools_opened();
                Ok(EventOutcome::Handled)
            }
            LifecycleEvent::UpdateAvailable => {
                self.update_available();
                Ok(EventOutcome::Handled)
            }
            LifecycleEvent::UpdateDownloaded => {
                self.update_downloaded().map(|()| EventOutcome::Handled)
            }
        }
    }

    /// Creates the main window and starts loading its content.
    ///
    /// The slot is claimed before the host is asked for a window, so a second
    /// `Ready`/`Activate` arriving mid-creation is skipped instead of opening
    /// another window. The update check and devtools policy wait on the load
    /// inside the returned [`StartupSequence`].
    pub(crate) fn startup(&self) -> Result<StartupOutcome, String> {
        if let Err(status) = self.lock_slot().try_begin_creation() {
            (self.log)(&format!("startup skipped: main window is {status}"));
            return Ok(StartupOutcome::Skipped(status));
        }

        let window = match self.host.create_window(&self.config.window) {
            Ok(window) => window,
            Err(error) => {
                *self.lock_slot() = WindowSlot::Idle;
                return Err(format!("Failed to create main window: {error}"));
            }
        };
        *self.lock_slot() = WindowSlot::Open(window.clone());
        (self.log)("main window created");

        let (load, target) = if self.config.dev_mode {
            let url = &self.config.dev_server_url;
            (window.load_url(url), format!("dev server {url}"))
        } else {
            let entry = &self.config.packaged_entry;
            (window.load_file(entry), format!("packaged entry {entry}"))
        };
        let plan = ContentPlan {
            target,
            check_updates: !self.config.dev_mode,
            open_devtools: self.config.debugging,
        };

        let sequence = async_runtime::spawn(finish_startup(
            window,
            load,
            plan,
            Arc::clone(&self.updates),
            self.log.clone(),
        ));
        Ok(StartupOutcome::Created { sequence })
    }

    pub(crate) fn reactivate(&self) -> Result<StartupOutcome, String> {
        let status = self.window_status();
        if status != WindowStatus::Idle {
            (self.log)(&format!("activate ignored: main window is {status}"));
            return Ok(StartupOutcome::Skipped(status));
        }

        self.startup()
    }

    pub(crate) fn all_windows_closed(&self) -> ExitDecision {
        let platform = self.config.platform;
        if platform.keeps_running_without_windows() {
            (self.log)(&format!("all windows closed; staying resident on {platform}"));
            ExitDecision::KeepRunning
        } else {
            (self.log)(&format!("all windows closed; quitting on {platform}"));
            ExitDecision::Terminate
        }
    }

    pub(crate) fn window_closed(&self) {
        let mut slot = self.lock_slot();
        match slot.status() {
            WindowStatus::Open => {
                *slot = WindowSlot::Idle;
                drop(slot);
                (self.log)("main window closed");
            }
            WindowStatus::Creating => {
                drop(slot);
                (self.log)("window closed while main window is being created; ignoring");
            }
            WindowStatus::Idle => {}
        }
    }

    /// Returns whether devtools were closed.
    pub(crate) fn devtools_opened(&self) -> bool {
        if self.config.debugging {
            return false;
        }
        let Some(window) = self.open_window() else {
            return false;
        };

        window.close_devtools();
        (self.log)("devtools opened outside debugging mode; closed");
        true
    }

    /// Returns whether the message reached a window.
    pub(crate) fn update_available(&self) -> bool {
        (self.log)("update available");
        let Some(window) = self.open_window() else {
            (self.log)("no main window; dropping update-available message");
            return false;
        };

        match window.send(UPDATE_AVAILABLE_EVENT) {
            Ok(()) => true,
            Err(error) => {
                (self.log)(&format!(
                    "failed to send {UPDATE_AVAILABLE_EVENT} to main window: {error}"
                ));
                false
            }
        }
    }

    pub(crate) fn update_downloaded(&self) -> Result<(), String> {
        (self.log)("update downloaded; quitting to install");
        self.updates
            .quit_and_install()
            .map_err(|error| format!("Failed to install downloaded update: {error}"))
    }
}

async fn finish_startup<W, U, L>(
    window: W,
    load: BoxFuture<'static, Result<(), String>>,
    plan: ContentPlan,
    updates: Arc<U>,
    log: L,
) -> Result<Option<JoinHandle<()>>, String>
where
    W: AppWindow,
    U: UpdateClient,
    L: Fn(&str) + Clone + Send + Sync + 'static,
{
    load.await
        .map_err(|error| format!("Failed to load {}: {error}", plan.target))?;
    log(&format!("loaded {}", plan.target));

    let update_check = plan
        .check_updates
        .then(|| spawn_update_check(updates.as_ref(), &log));

    if plan.open_devtools {
        window.open_devtools();
    } else {
        window.watch_devtools();
    }
    Ok(update_check)
}

fn spawn_update_check<U, L>(updates: &U, log: &L) -> JoinHandle<()>
where
    U: UpdateClient,
    L: Fn(&str) + Clone + Send + Sync + 'static,
{
    log("checking for updates");
    let check = updates.check_for_updates_and_notify();
    let log = log.clone();
    async_runtime::spawn(async move {
        match check.await {
            Ok(()) => log("update check finished"),
            Err(error) => log(&format!("update check failed: {error}")),
        }
    })
}
