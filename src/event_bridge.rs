//! Routes Tauri host and updater notifications into the lifecycle controller.

use tauri::{async_runtime, AppHandle, Manager, Runtime};

use crate::{
    append_desktop_log, append_startup_log, lifecycle::StartupSequence, ui_dispatch,
    EventOutcome, ExitDecision, LifecycleController, LifecycleEvent, StartupOutcome,
    TauriUpdateClient, TauriWindowHost, UpdateClient, WindowHost, WindowStatus,
};

pub(crate) type DesktopController =
    LifecycleController<TauriWindowHost, TauriUpdateClient, fn(&str)>;

const STARTUP_FAILURE_EXIT_CODE: i32 = 1;

/// What the bridge still has to do once the controller has handled an event.
enum Routed {
    Exit(ExitDecision),
    Loading(StartupSequence),
    Failed {
        error: String,
        exit_code: Option<i32>,
    },
    Done,
}

fn route_event<H, U, L>(controller: &LifecycleController<H, U, L>, event: LifecycleEvent) -> Routed
where
    H: WindowHost,
    U: UpdateClient,
    L: Fn(&str) + Clone + Send + Sync + 'static,
{
    match controller.handle_event(event) {
        Ok(EventOutcome::Exit(decision)) => Routed::Exit(decision),
        Ok(EventOutcome::Startup(StartupOutcome::Created { sequence })) => {
            Routed::Loading(sequence)
        }
        Ok(EventOutcome::Startup(StartupOutcome::Skipped(_)) | EventOutcome::Handled) => {
            Routed::Done
        }
        Err(error) => Routed::Failed {
            error,
            exit_code: event.opens_window().then_some(STARTUP_FAILURE_EXIT_CODE),
        },
    }
}

/// A content load failing only matters while its window is still open.
fn load_failure_exit_code(status: WindowStatus) -> Option<i32> {
    (status == WindowStatus::Open).then_some(STARTUP_FAILURE_EXIT_CODE)
}

/// Runs `event` through the controller. Must be called on the main thread.
///
/// A failed `Ready`/`Activate` leaves the app without a usable window, so the
/// process exits with code 1 after logging. Returns the exit decision for
/// `window-all-closed`.
pub(crate) fn handle_lifecycle_event<R: Runtime>(
    app_handle: &AppHandle<R>,
    event: LifecycleEvent,
) -> Option<ExitDecision> {
    let Some(controller) = app_handle.try_state::<DesktopController>() else {
        append_desktop_log(&format!(
            "{} ignored: lifecycle controller is not initialized",
            event.name()
        ));
        return None;
    };

    match route_event(controller.inner(), event) {
        Routed::Exit(decision) => Some(decision),
        Routed::Loading(sequence) => {
            watch_startup_sequence(app_handle, sequence);
            None
        }
        Routed::Failed { error, exit_code } => {
            append_desktop_log(&format!("{} handler failed: {error}", event.name()));
            if let Some(code) = exit_code {
                append_startup_log(&format!("desktop startup failed: {error}"));
                app_handle.exit(code);
            }
            None
        }
        Routed::Done => None,
    }
}

fn watch_startup_sequence<R: Runtime>(app_handle: &AppHandle<R>, sequence: StartupSequence) {
    let app_handle = app_handle.clone();
    async_runtime::spawn(async move {
        let error = match sequence.await {
            // The update check keeps running detached.
            Ok(Ok(_update_check)) => return,
            Ok(Err(error)) => error,
            Err(error) => format!("startup task failed: {error}"),
        };

        if let Err(dispatch_error) =
            ui_dispatch::run_on_main_thread_dispatch(&app_handle, "startup failure", move |main_app| {
                handle_load_failure(main_app, &error);
            })
        {
            append_desktop_log(&format!(
                "failed to dispatch startup failure: {dispatch_error}"
            ));
        }
    });
}

fn handle_load_failure<R: Runtime>(app_handle: &AppHandle<R>, error: &str) {
    append_desktop_log(&format!("startup failed: {error}"));
    let status = app_handle
        .try_state::<DesktopController>()
        .map(|controller| controller.window_status())
        .unwrap_or(WindowStatus::Idle);

    match load_failure_exit_code(status) {
        Some(code) => {
            append_startup_log(&format!("desktop startup failed: {error}"));
            app_handle.exit(code);
        }
        None => append_desktop_log("main window is gone; ignoring failed content load"),
    }
}

/// Queues `event` onto the main thread; safe to call from background tasks.
pub(crate) fn dispatch_lifecycle_event<R: Runtime>(app_handle: &AppHandle<R>, event: LifecycleEvent) {
    if let Err(error) =
        ui_dispatch::run_on_main_thread_dispatch(app_handle, event.name(), move |main_app| {
            handle_lifecycle_event(main_app, event);
        })
    {
        append_desktop_log(&format!("failed to dispatch {}: {error}", event.name()));
    }
}
