use std::future::Future;

use stress_core::prelude::{ShutdownHandle, ShutdownSignalError};

/// Owns the async runtime that behaviour hooks use for network I/O.
#[derive(Debug)]
pub struct Executor {
    runtime: tokio::runtime::Runtime,
    shutdown_handle: ShutdownHandle,
}

impl Executor {
    pub(crate) fn new(runtime: tokio::runtime::Runtime, shutdown_handle: ShutdownHandle) -> Self {
        Self {
            runtime,
            shutdown_handle,
        }
    }

    /// Run async code in place, blocking until it completes.
    ///
    /// The future is cancelled if the runner shuts down, in which case a [ShutdownSignalError] is
    /// returned. You do not need to do anything special to handle this, but be aware that
    /// submitting a future which does not support cancellation may prevent the runner from
    /// shutting down.
    pub fn execute_in_place<T>(
        &self,
        fut: impl Future<Output = anyhow::Result<T>>,
    ) -> anyhow::Result<T> {
        let mut shutdown_listener = self.shutdown_handle.new_listener();
        self.runtime.block_on(async move {
            tokio::select! {
                result = fut => result,
                _ = shutdown_listener.wait_for_shutdown() => {
                    Err(anyhow::anyhow!(ShutdownSignalError::default()))
                },
            }
        })
    }

    /// Submit async code to run in the background.
    ///
    /// The future is not cancelled if the runner shuts down and the runner does not wait for it
    /// before exiting. In behaviour hooks, prefer [Executor::execute_in_place] so that one cycle
    /// finishes its work before the next is scheduled.
    pub fn spawn(&self, fut: impl Future<Output = ()> + Send + 'static) {
        self.runtime.spawn(fut);
    }
}
