//! Single-shot position lookup with one outstanding request at a time.

use async_trait::async_trait;
use shared::domain::Coordinate;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocateError {
    #[error("location permission denied")]
    Denied,
    #[error("location unavailable: {0}")]
    Unavailable(String),
}

/// Resolves exactly once per call, with a position or an error.
#[async_trait]
pub trait GeolocationProvider: Send + Sync {
    async fn current_position(&self) -> Result<Coordinate, LocateError>;
}

/// Always answers with the same position; handy for CLIs and tests.
pub struct FixedPosition(pub Coordinate);

#[async_trait]
impl GeolocationProvider for FixedPosition {
    async fn current_position(&self) -> Result<Coordinate, LocateError> {
        Ok(self.0)
    }
}

/// Proof that a request was started; consumed when it resolves.
#[derive(Debug)]
#[must_use]
pub struct LocateTicket(());

#[derive(Debug, PartialEq)]
pub enum LocateStep {
    /// A location was already set and has been cleared instead.
    Cleared,
    /// Caller should now query the provider and hand back the ticket.
    Request(LocateTicket),
    /// A request is already in flight; nothing was started.
    AlreadyLocating,
}

impl PartialEq for LocateTicket {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

/// Tracks whether a lookup is outstanding.
#[derive(Debug, Default)]
pub struct Locator {
    locating: bool,
}

impl Locator {
    pub fn is_locating(&self) -> bool {
        self.locating
    }

    pub fn begin(&mut self) -> Option<LocateTicket> {
        if self.locating {
            return None;
        }
        self.locating = true;
        Some(LocateTicket(()))
    }

    pub fn finish(&mut self, _ticket: LocateTicket) {
        self.locating = false;
    }
}

#[cfg(test)]
#[path = "tests/geolocation_tests.rs"]
mod tests;
