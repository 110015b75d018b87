//! Graceful shutdown of the wallet server.
//!
//! SIGTERM / SIGINT (Unix) or Ctrl+C (Windows) cancel the token handed to
//! `axum::serve`, so in-flight provider requests finish before exit.

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

/// Signal listener owning the server's shutdown token.
#[derive(Debug)]
pub struct Shutdown {
    listener: TaskTracker,
    token: CancellationToken,
}

impl Shutdown {
    /// Registers the signal handlers and spawns the listener task.
    ///
    /// The listener also exits when the token is cancelled by hand.
    ///
    /// # Errors
    ///
    /// Returns an [`std::io::Error`] if signal registration fails.
    #[allow(clippy::unnecessary_wraps)]
    pub fn listen() -> Result<Self, std::io::Error> {
        let token = CancellationToken::new();
        let listener = TaskTracker::new();

        #[cfg(unix)]
        {
            let mut sigterm = signal(SignalKind::terminate())?;
            let mut sigint = signal(SignalKind::interrupt())?;
            let token = token.clone();
            listener.spawn(async move {
                let reason = tokio::select! {
                    _ = sigterm.recv() => "SIGTERM",
                    _ = sigint.recv() => "SIGINT",
                    () = token.cancelled() => return,
                };
                tracing::info!(signal = reason, "stopping mock wallet");
                token.cancel();
            });
        }

        #[cfg(windows)]
        {
            let token = token.clone();
            listener.spawn(async move {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {
                        tracing::info!(signal = "ctrl-c", "stopping mock wallet");
                        token.cancel();
                    }
                    () = token.cancelled() => {}
                }
            });
        }

        listener.close();
        Ok(Self { listener, token })
    }

    /// Token the HTTP server watches for graceful shutdown.
    #[must_use]
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Resolves once shutdown was requested and the listener has exited.
    pub async fn wait(&self) {
        self.token.cancelled().await;
        self.listener.wait().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn manual_cancel_ends_listener() {
        let shutdown = Shutdown::listen().expect("signal handlers");
        let token = shutdown.token();
        assert!(!token.is_cancelled());
        token.cancel();
        shutdown.wait().await;
        assert!(shutdown.token().is_cancelled());
    }
}
