//! Turns webview page-load notifications into awaitable content loads.

use std::sync::{Mutex, MutexGuard, PoisonError};

use futures::channel::oneshot;
use url::Url;

const BLANK_PAGE_URL: &str = "about:blank";

/// The main window's in-flight content load, completed from `on_page_load`.
#[derive(Default)]
pub(crate) struct PageLoadState {
    pending: Mutex<Option<oneshot::Sender<Url>>>,
}

impl PageLoadState {
    fn lock(&self) -> MutexGuard<'_, Option<oneshot::Sender<Url>>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Waits for the next finished page load. An earlier waiter is cancelled.
    pub(crate) fn begin(&self) -> oneshot::Receiver<Url> {
        let (sender, receiver) = oneshot::channel();
        *self.lock() = Some(sender);
        receiver
    }

    /// Returns whether a waiting load was completed.
    ///
    /// The blank page a new window starts on never completes a load.
    pub(crate) fn finish(&self, url: &Url) -> bool {
        if url.as_str() == BLANK_PAGE_URL {
            return false;
        }
        match self.lock().take() {
            Some(sender) => sender.send(url.clone()).is_ok(),
            None => false,
        }
    }

    pub(crate) fn cancel(&self) {
        self.lock().take();
    }
}
