use tauri::{AppHandle, Runtime};

pub(crate) fn run_on_main_thread_dispatch<R, F>(
    app_handle: &AppHandle<R>,
    task_name: &str,
    task: F,
) -> Result<(), String>
where
    R: Runtime,
    F: FnOnce(&AppHandle<R>) + Send + 'static,
{
    let main_app = app_handle.clone();
    app_handle
        .run_on_main_thread(move || task(&main_app))
        .map_err(|error| format!("Failed to schedule {task_name} on main thread: {error}"))
}
