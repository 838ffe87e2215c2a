//! Process-wide single-slot lock for audio conversions
//!
//! Contention is rejected, never queued. The slot is released when the
//! returned permit drops, so success, failure, panic and a dropped request
//! future all free it.

use std::sync::Arc;

use mediaconv_core::AppError;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

#[derive(Clone, Debug)]
pub struct ConversionGuard {
    slot: Arc<Semaphore>,
}

/// Held for the duration of one conversion
#[derive(Debug)]
pub struct ConversionPermit {
    _permit: OwnedSemaphorePermit,
}

impl ConversionGuard {
    pub fn new() -> Self {
        Self {
            slot: Arc::new(Semaphore::new(1)),
        }
    }

    /// Take the slot or fail immediately with `ConversionInProgress`
    pub fn try_acquire(&self) -> Result<ConversionPermit, AppError> {
        match self.slot.clone().try_acquire_owned() {
            Ok(permit) => Ok(ConversionPermit { _permit: permit }),
            Err(_) => {
                tracing::debug!("Conversion slot busy, rejecting request");
                Err(AppError::ConversionInProgress)
            }
        }
    }

    pub fn is_busy(&self) -> bool {
        self.slot.available_permits() == 0
    }
}

impl Default for ConversionGuard {
    fn default() -> Self {
        Self::new()
    }
}
