use crate::domain::{DeadLetterQueue, Error};

/// Logs rejected events and lets the simulation carry on.
#[derive(Default, Debug)]
pub struct LogDLQ {}

impl DeadLetterQueue for LogDLQ {
    fn report(&self, error: &Error) {
        tracing::warn!(%error, "event dead-lettered");
    }
}
