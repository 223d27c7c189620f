//! Copy-to-clipboard with a transient "copied" indicator.

use anyhow::Result;
use async_trait::async_trait;
use std::cell::RefCell;
use std::future::Future;
use std::time::Duration;
use tracing::debug;

pub const COPY_RESET_DELAY: Duration = Duration::from_millis(2000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CopyTarget {
    EmbeddedAddress,
    SmartWalletAddress,
    Signature,
    DepositAddress,
}

#[async_trait(?Send)]
pub trait Clipboard {
    async fn write_text(&self, text: &str) -> Result<()>;
}

/// Best-effort write; failures are only logged.
pub async fn copy_text<C>(clipboard: &C, text: &str)
where
    C: Clipboard + ?Sized,
{
    if let Err(err) = clipboard.write_text(text).await {
        debug!("clipboard write failed: {err:#}");
    }
}

/// Returned by [`CopyIndicator::trigger`]; hand it back to [`CopyIndicator::expire`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CopyTicket(u64);

/// Only the latest trigger's ticket can revert the indicator, so a burst of
/// copies reverts [`COPY_RESET_DELAY`] after the last one.
#[derive(Debug, Default)]
pub struct CopyIndicator {
    copied: Option<CopyTarget>,
    generation: u64,
}

impl CopyIndicator {
    pub fn trigger(&mut self, target: CopyTarget) -> CopyTicket {
        self.generation += 1;
        self.copied = Some(target);
        CopyTicket(self.generation)
    }

    /// Reverts to default if `ticket` is the latest. Returns whether it reverted.
    pub fn expire(&mut self, ticket: CopyTicket) -> bool {
        if ticket.0 != self.generation {
            return false;
        }
        self.copied = None;
        true
    }

    pub fn copied(&self) -> Option<CopyTarget> {
        self.copied
    }

    pub fn is_copied(&self, target: CopyTarget) -> bool {
        self.copied == Some(target)
    }

    pub fn label(&self, target: CopyTarget) -> &'static str {
        if self.is_copied(target) {
            "Copied!"
        } else {
            "Copy to Clipboard"
        }
    }

    pub fn reset(&mut self) {
        self.generation += 1;
        self.copied = None;
    }
}

/// Trigger the indicator, wait [`COPY_RESET_DELAY`] with the caller's timer,
/// then expire the ticket. The `sleep` closure runs right after the trigger,
/// which is where callers re-render.
pub async fn flash_copied<F, Fut>(indicator: &RefCell<CopyIndicator>, target: CopyTarget, sleep: F) -> bool
where
    F: FnOnce(Duration) -> Fut,
    Fut: Future<Output = ()>,
{
    let ticket = indicator.borrow_mut().trigger(target);
    sleep(COPY_RESET_DELAY).await;
    indicator.borrow_mut().expire(ticket)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    struct FailingClipboard;

    #[async_trait(?Send)]
    impl Clipboard for FailingClipboard {
        async fn write_text(&self, _text: &str) -> Result<()> {
            Err(anyhow!("permission denied"))
        }
    }

    #[test]
    fn stale_tickets_do_not_revert() {
        let mut indicator = CopyIndicator::default();
        let first = indicator.trigger(CopyTarget::EmbeddedAddress);
        let second = indicator.trigger(CopyTarget::Signature);

        assert!(!indicator.expire(first));
        assert!(indicator.is_copied(CopyTarget::Signature));
        assert_eq!(indicator.label(CopyTarget::EmbeddedAddress), "Copy to Clipboard");
        assert_eq!(indicator.label(CopyTarget::Signature), "Copied!");

        assert!(indicator.expire(second));
        assert_eq!(indicator.copied(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn reverts_after_delay_once() {
        let indicator = RefCell::new(CopyIndicator::default());
        let reverted = flash_copied(&indicator, CopyTarget::DepositAddress, tokio::time::sleep).await;
        assert!(reverted);
        assert_eq!(indicator.borrow().copied(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn repeated_triggers_still_revert_to_default() {
        let indicator = RefCell::new(CopyIndicator::default());

        let first = flash_copied(&indicator, CopyTarget::EmbeddedAddress, tokio::time::sleep);
        let second = async {
            tokio::time::sleep(Duration::from_millis(500)).await;
            flash_copied(&indicator, CopyTarget::EmbeddedAddress, tokio::time::sleep).await
        };
        let midway = async {
            tokio::time::sleep(Duration::from_millis(2100)).await;
            indicator.borrow().copied()
        };

        let (first, second, midway) = tokio::join!(first, second, midway);

        assert!(!first);
        assert!(second);
        assert_eq!(midway, Some(CopyTarget::EmbeddedAddress));
        assert_eq!(indicator.borrow().copied(), None);
    }

    #[tokio::test]
    async fn clipboard_failures_are_swallowed() {
        copy_text(&FailingClipboard, "0xabc").await;
    }
}
