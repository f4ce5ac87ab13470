//! Operator interrupt shared by everything that runs during a campaign.
//!
//! One listener is installed up front and latches: once raised, every clone
//! reports it, whether or not a child process was running at the time.

use std::future::pending;

use tokio::sync::watch;
use tracing::debug;

use crate::error::{Result, TrialError};

/// Latched interrupt flag. Cheap to clone.
#[derive(Debug, Clone)]
pub struct Interrupt {
    rx: watch::Receiver<bool>,
}

/// Raises the [`Interrupt`] it was created with.
#[derive(Debug)]
pub struct Trigger {
    tx: watch::Sender<bool>,
}

impl Trigger {
    pub fn raise(&self) {
        self.tx.send_replace(true);
    }
}

impl Default for Interrupt {
    fn default() -> Self {
        Self::never()
    }
}

impl Interrupt {
    pub fn channel() -> (Trigger, Interrupt) {
        let (tx, rx) = watch::channel(false);
        (Trigger { tx }, Interrupt { rx })
    }

    /// An interrupt that is never raised.
    pub fn never() -> Self {
        Self::channel().1
    }

    /// Raised by the first Ctrl-C after this call.
    ///
    /// The handler is registered before returning, so no signal sent after
    /// this point is lost. Must be called inside a tokio runtime.
    pub fn ctrl_c() -> std::io::Result<Self> {
        #[cfg(unix)]
        let mut stream =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::interrupt())?;
        #[cfg(windows)]
        let mut stream = tokio::signal::windows::ctrl_c()?;

        let (trigger, interrupt) = Self::channel();
        tokio::spawn(async move {
            if stream.recv().await.is_some() {
                debug!("interrupt received");
                trigger.raise();
            }
        });
        Ok(interrupt)
    }

    pub fn is_raised(&self) -> bool {
        *self.rx.borrow()
    }

    /// `Err(Interrupted)` once raised.
    pub fn check(&self) -> Result<()> {
        if self.is_raised() {
            Err(TrialError::Interrupted)
        } else {
            Ok(())
        }
    }

    /// Resolves once raised; never resolves if it cannot be raised any more.
    pub async fn raised(&self) {
        let mut rx = self.rx.clone();
        if rx.wait_for(|&raised| raised).await.is_err() {
            pending::<()>().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn test_latches_across_clones() {
        let (trigger, interrupt) = Interrupt::channel();
        let other = interrupt.clone();
        assert!(interrupt.check().is_ok());

        trigger.raise();
        drop(trigger);
        assert!(interrupt.is_raised());
        assert!(matches!(other.check(), Err(TrialError::Interrupted)));
    }

    #[tokio::test]
    async fn test_raised_resolves_after_trigger_is_dropped() {
        let (trigger, interrupt) = Interrupt::channel();
        trigger.raise();
        drop(trigger);
        tokio::time::timeout(Duration::from_secs(1), interrupt.raised())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_never_stays_pending() {
        let interrupt = Interrupt::never();
        assert!(
            tokio::time::timeout(Duration::from_millis(50), interrupt.raised())
                .await
                .is_err()
        );
        assert!(!interrupt.is_raised());
    }
}
