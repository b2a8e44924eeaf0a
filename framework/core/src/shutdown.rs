use tokio::sync::broadcast::error::TryRecvError;
use tokio::sync::broadcast::{Receiver, Sender};

/// Broadcasts the shutdown signal to every listener handed out by [ShutdownHandle::new_listener].
///
/// Cloning the handle is cheap and all clones refer to the same underlying channel.
#[derive(Debug, Clone)]
pub struct ShutdownHandle {
    sender: Sender<()>,
}

impl Default for ShutdownHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl ShutdownHandle {
    pub fn new() -> Self {
        Self {
            sender: tokio::sync::broadcast::channel(1).0,
        }
    }

    pub fn shutdown(&self) {
        if let Err(e) = self.sender.send(()) {
            // Will fail if nobody is listening for a shutdown signal, in which case the log
            // message can be ignored.
            log::warn!("Failed to send shutdown signal: {e:?}");
        }
    }

    pub fn new_listener(&self) -> DelegatedShutdownListener {
        DelegatedShutdownListener::new(self.sender.subscribe())
    }
}

/// One receiver of the shutdown signal. Each piece of work that needs to observe shutdown should
/// hold its own listener.
#[derive(Debug)]
pub struct DelegatedShutdownListener {
    receiver: Receiver<()>,
}

impl DelegatedShutdownListener {
    pub(crate) fn new(receiver: Receiver<()>) -> Self {
        Self { receiver }
    }

    /// Point in time check whether the shutdown signal has been received. Once this returns true
    /// the caller should stop its work so that the scenario can shut down.
    pub fn should_shutdown(&mut self) -> bool {
        match self.receiver.try_recv() {
            Ok(()) => true,
            // The sender being gone means the runner is already tearing down.
            Err(TryRecvError::Closed) => true,
            Err(_) => false,
        }
    }

    /// Wait until the shutdown signal is received. It is safe to race this against another future
    /// so that the shutdown signal can cancel work in progress.
    pub async fn wait_for_shutdown(&mut self) {
        // A closed channel is treated the same as a received signal.
        let _ = self.receiver.recv().await;
    }
}

/// The error produced when in-flight work is cancelled because the scenario is shutting down.
#[derive(derive_more::Error, derive_more::Display, Debug)]
pub struct ShutdownSignalError {
    msg: String,
}

impl Default for ShutdownSignalError {
    fn default() -> Self {
        Self {
            msg: "Execution cancelled by shutdown signal".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn listener_sees_shutdown() {
        let handle = ShutdownHandle::new();
        let mut listener = handle.new_listener();

        assert!(!listener.should_shutdown());
        handle.shutdown();
        assert!(listener.should_shutdown());
    }

    #[tokio::test]
    async fn listeners_created_before_signal_all_see_it() {
        let handle = ShutdownHandle::new();
        let mut first = handle.new_listener();
        let mut second = handle.new_listener();

        handle.shutdown();

        assert!(first.should_shutdown());
        assert!(second.should_shutdown());
    }

    #[tokio::test]
    async fn dropped_handle_counts_as_shutdown() {
        let handle = ShutdownHandle::new();
        let mut listener = handle.new_listener();
        drop(handle);

        assert!(listener.should_shutdown());
    }
}
