use futures::future::BoxFuture;
use url::Url;

use crate::WindowSpec;

/// A live application window as seen by the lifecycle controller.
///
/// Loads start immediately; the returned future settles when the page has
/// finished loading.
pub(crate) trait AppWindow: Clone + Send + Sync + 'static {
    fn load_url(&self, url: &Url) -> BoxFuture<'static, Result<(), String>>;

    /// Loads an entry point from the packaged frontend bundle.
    fn load_file(&self, entry: &str) -> BoxFuture<'static, Result<(), String>>;

    fn open_devtools(&self);

    fn close_devtools(&self);

    /// Starts reporting devtools openings back as `LifecycleEvent::DevtoolsOpened`.
    fn watch_devtools(&self);

    /// Sends a payload-less message to the window's content process.
    fn send(&self, channel: &str) -> Result<(), String>;
}

pub(crate) trait WindowHost: Send + Sync + 'static {
    type Window: AppWindow;

    fn create_window(&self, spec: &WindowSpec) -> Result<Self::Window, String>;
}

pub(crate) trait UpdateClient: Send + Sync + 'static {
    fn check_for_updates_and_notify(&self) -> BoxFuture<'static, Result<(), String>>;

    fn quit_and_install(&self) -> Result<(), String>;
}
