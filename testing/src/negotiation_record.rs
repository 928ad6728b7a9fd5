use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use argue_negotiator_component::MessageKind;
use argue_negotiators::{Outgoing, Party, SessionOutcome};

/// Everything that happened during a single session.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct NegotiationRecord {
    /// Routed messages in delivery order.
    pub messages: Vec<Outgoing>,
    pub outcome: Option<SessionOutcome>,
    pub errors: Vec<String>,
    /// Messages, that were lost, because the record didn't keep up with the session.
    pub lost: u64,
}

#[derive(Clone, Debug, Default)]
pub struct NegotiationRecordSync(pub Arc<Mutex<NegotiationRecord>>);

impl NegotiationRecordSync {
    pub fn new() -> NegotiationRecordSync {
        NegotiationRecordSync::default()
    }

    fn lock(&self) -> MutexGuard<'_, NegotiationRecord> {
        // Record is only appended to. Even after a panic it is worth showing.
        self.0.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn message(&self, message: Outgoing) {
        self.lock().messages.push(message);
    }

    pub fn lost(&self, count: u64) {
        self.lock().lost += count;
    }

    pub fn outcome(&self, outcome: SessionOutcome) {
        self.lock().outcome = Some(outcome);
    }

    pub fn error(&self, e: &anyhow::Error) {
        self.lock().errors.push(format!("{:#}", e));
    }

    pub fn snapshot(&self) -> NegotiationRecord {
        self.lock().clone()
    }
}

impl NegotiationRecord {
    /// Names of selected items in selection order. Empty until the session ends.
    pub fn selected(&self) -> Vec<String> {
        match &self.outcome {
            Some(SessionOutcome::Finished { selected })
            | Some(SessionOutcome::Cancelled { selected }) => {
                selected.iter().map(|item| item.name.clone()).collect()
            }
            None => vec![],
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self.outcome, Some(SessionOutcome::Cancelled { .. }))
    }

    pub fn sent_by(&self, party: Party) -> Vec<&Outgoing> {
        self.messages
            .iter()
            .filter(|message| message.from == party)
            .collect()
    }

    pub fn of_kind(&self, kind: MessageKind) -> Vec<&Outgoing> {
        self.messages
            .iter()
            .filter(|message| message.kind == kind)
            .collect()
    }

    /// Messages rendered as `FROM KIND payload` lines.
    pub fn trace(&self) -> Vec<String> {
        self.messages
            .iter()
            .map(|message| format!("{} {} {}", message.from, message.kind, message.payload))
            .map(|line| line.trim_end().to_string())
            .collect()
    }
}

impl fmt::Display for NegotiationRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string_pretty(&self).map_err(|_| fmt::Error)?;
        write!(f, "{}", json)
    }
}
