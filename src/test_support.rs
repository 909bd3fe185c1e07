//! Recording fakes for the window host and update client.

use std::{
    sync::{Arc, Mutex},
    thread,
    time::Duration,
};

use futures::{channel::oneshot, future::BoxFuture, FutureExt};
use url::Url;

use crate::{
    AppWindow, DesktopConfig, HostPlatform, LifecycleController, UpdateClient, WindowHost,
    WindowSpec,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    CreateWindow,
    LoadUrl(String),
    LoadFile(String),
    OpenDevtools,
    CloseDevtools,
    WatchDevtools,
    Send(String),
    CheckForUpdates,
    QuitAndInstall,
}

pub(crate) type Calls = Arc<Mutex<Vec<Call>>>;
pub(crate) type Logs = Arc<Mutex<Vec<String>>>;
/// Holds a load open until the test sends on (or drops) the matching sender.
pub(crate) type LoadGate = Arc<Mutex<Option<oneshot::Receiver<()>>>>;

fn record(calls: &Calls, call: Call) {
    calls.lock().expect("calls lock").push(call);
}

#[derive(Clone)]
pub(crate) struct FakeWindow {
    calls: Calls,
    fail_load: bool,
    load_gate: LoadGate,
}

impl FakeWindow {
    fn settle(&self, error: &str) -> BoxFuture<'static, Result<(), String>> {
        let gate = self.load_gate.lock().expect("gate lock").take();
        let result = if self.fail_load {
            Err(error.to_string())
        } else {
            Ok(())
        };
        async move {
            if let Some(gate) = gate {
                gate.await
                    .map_err(|_| "window closed before the page finished loading".to_string())?;
            }
            result
        }
        .boxed()
    }
}

impl AppWindow for FakeWindow {
    fn load_url(&self, url: &Url) -> BoxFuture<'static, Result<(), String>> {
        record(&self.calls, Call::LoadUrl(url.to_string()));
        self.settle("connection refused")
    }

    fn load_file(&self, entry: &str) -> BoxFuture<'static, Result<(), String>> {
        record(&self.calls, Call::LoadFile(entry.to_string()));
        self.settle("asset not found")
    }

    fn open_devtools(&self) {
        record(&self.calls, Call::OpenDevtools);
    }

    fn close_devtools(&self) {
        record(&self.calls, Call::CloseDevtools);
    }

    fn watch_devtools(&self) {
        record(&self.calls, Call::WatchDevtools);
    }

    fn send(&self, channel: &str) -> Result<(), String> {
        record(&self.calls, Call::Send(channel.to_string()));
        Ok(())
    }
}

#[derive(Default)]
pub(crate) struct FakeHost {
    pub(crate) calls: Calls,
    pub(crate) specs: Arc<Mutex<Vec<WindowSpec>>>,
    pub(crate) fail_create: bool,
    pub(crate) fail_load: bool,
    pub(crate) create_delay: Option<Duration>,
    pub(crate) load_gate: LoadGate,
}

impl FakeHost {
    /// A host whose first load stays pending until the returned sender fires.
    pub(crate) fn with_pending_load() -> (Self, oneshot::Sender<()>) {
        let (loaded, gate) = oneshot::channel();
        let host = Self {
            load_gate: Arc::new(Mutex::new(Some(gate))),
            ..Self::default()
        };
        (host, loaded)
    }
}

impl WindowHost for FakeHost {
    type Window = FakeWindow;

    fn create_window(&self, spec: &WindowSpec) -> Result<FakeWindow, String> {
        if let Some(delay) = self.create_delay {
            thread::sleep(delay);
        }
        if self.fail_create {
            return Err("no display".to_string());
        }
        self.specs.lock().expect("specs lock").push(spec.clone());
        record(&self.calls, Call::CreateWindow);
        Ok(FakeWindow {
            calls: Arc::clone(&self.calls),
            fail_load: self.fail_load,
            load_gate: Arc::clone(&self.load_gate),
        })
    }
}

pub(crate) struct FakeUpdates {
    calls: Calls,
    check_error: Option<String>,
    install_error: Option<String>,
}

impl FakeUpdates {
    pub(crate) fn failing_install(calls: &Calls, error: &str) -> Self {
        Self {
            calls: Arc::clone(calls),
            check_error: None,
            install_error: Some(error.to_string()),
        }
    }
}

impl UpdateClient for FakeUpdates {
    fn check_for_updates_and_notify(&self) -> BoxFuture<'static, Result<(), String>> {
        record(&self.calls, Call::CheckForUpdates);
        let result = match &self.check_error {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        };
        async move { result }.boxed()
    }

    fn quit_and_install(&self) -> Result<(), String> {
        record(&self.calls, Call::QuitAndInstall);
        match &self.install_error {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

pub(crate) fn base_config() -> DesktopConfig {
    let mut config = DesktopConfig::from_lookup(|_| None).expect("default desktop config");
    config.platform = HostPlatform::Linux;
    config
}

pub(crate) fn dev_config() -> DesktopConfig {
    let mut config = base_config();
    config.dev_mode = true;
    config
}

pub(crate) fn controller_from(
    host: FakeHost,
    updates: FakeUpdates,
    config: DesktopConfig,
) -> (
    LifecycleController<FakeHost, FakeUpdates, impl Fn(&str) + Clone + Send + Sync + 'static>,
    Logs,
) {
    let logs: Logs = Arc::default();
    let sink = Arc::clone(&logs);
    let controller = LifecycleController::new(host, updates, config, move |message: &str| {
        sink.lock().expect("logs lock").push(message.to_string());
    });
    (controller, logs)
}

pub(crate) fn controller_with(
    host: FakeHost,
    check_error: Option<&str>,
    config: DesktopConfig,
) -> (
    LifecycleController<FakeHost, FakeUpdates, impl Fn(&str) + Clone + Send + Sync + 'static>,
    Calls,
    Logs,
) {
    let calls = Arc::clone(&host.calls);
    let updates = FakeUpdates {
        calls: Arc::clone(&calls),
        check_error: check_error.map(str::to_string),
        install_error: None,
    };
    let (controller, logs) = controller_from(host, updates, config);
    (controller, calls, logs)
}

pub(crate) fn calls_of(calls: &Calls) -> Vec<Call> {
    calls.lock().expect("calls lock").clone()
}

pub(crate) fn count(calls: &Calls, call: &Call) -> usize {
    calls_of(calls).iter().filter(|recorded| *recorded == call).count()
}

pub(crate) fn logged(logs: &Logs, needle: &str) -> bool {
    logs.lock()
        .expect("logs lock")
        .iter()
        .any(|line| line.contains(needle))
}
