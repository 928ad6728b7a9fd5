use std::fmt;

use crate::negotiation_record::{NegotiationRecord, NegotiationRecordSync};

#[derive(thiserror::Error)]
#[error("{error}\nNegotiation traceback:\n\n{negotiation_traceback}")]
pub struct FrameworkError {
    pub error: anyhow::Error,
    pub negotiation_traceback: NegotiationRecord,
}

impl FrameworkError {
    pub fn from(error: impl Into<anyhow::Error>, record: &NegotiationRecordSync) -> FrameworkError {
        FrameworkError {
            error: error.into(),
            negotiation_traceback: record.snapshot(),
        }
    }
}

impl fmt::Debug for FrameworkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}
