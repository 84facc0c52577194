//! Stop flag shared between the code driving a sweep and the sweep itself.
//!
//! Sweeps never abort mid-converter. They poll the token between batches,
//! so every converter that already ran keeps its result.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// A batch boundary observed a raised [`CancellationToken`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cancelled;

impl fmt::Display for Cancelled {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("work cancelled")
    }
}

impl std::error::Error for Cancelled {}

/// Shared stop flag. Clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    raised: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise the flag. Cannot be lowered again.
    pub fn cancel(&self) {
        self.raised.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.raised.load(Ordering::Acquire)
    }

    /// `Err(Cancelled)` once the flag is raised, for use with `?`.
    pub fn checkpoint(&self) -> Result<(), Cancelled> {
        match self.is_cancelled() {
            true => Err(Cancelled),
            false => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checkpoint_fails_after_cancel() {
        let token = CancellationToken::new();
        assert_eq!(token.checkpoint(), Ok(()));
        token.cancel();
        assert_eq!(token.checkpoint(), Err(Cancelled));
        assert_eq!(Cancelled.to_string(), "work cancelled");
    }

    #[test]
    fn driver_and_sweep_share_one_flag() {
        let driver = CancellationToken::default();
        let sweep = driver.clone();
        assert!(!sweep.is_cancelled());

        driver.cancel();
        assert!(sweep.is_cancelled());
        assert!(sweep.checkpoint().is_err());
    }
}
