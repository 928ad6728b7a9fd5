use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Kinds of messages exchanged between negotiators and the mediator.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MessageKind {
    /// Sent by mediator with the item pool at the beginning of a round.
    /// Sent by negotiator with the name of the taken item at the end of a round.
    #[display(fmt = "ITEMS_ANNOUNCE")]
    ItemsAnnounce,
    /// Mediator asks negotiator to open the round.
    #[display(fmt = "START_QUERY")]
    StartQuery,
    #[display(fmt = "PROPOSE")]
    Propose,
    #[display(fmt = "REQUEST_WHY")]
    RequestWhy,
    #[display(fmt = "ACCEPT")]
    Accept,
    #[display(fmt = "ARGUMENT")]
    Argument,
    #[display(fmt = "CONFIRM")]
    Confirm,
    #[display(fmt = "CANCEL")]
    Cancel,
}

/// Parties that should receive a message, relative to the sending negotiator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipients {
    pub peer: bool,
    pub mediator: bool,
}

/// Message produced by a negotiator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    pub kind: MessageKind,
    pub payload: String,
    pub recipients: Recipients,
}

/// Message received by a negotiator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Incoming {
    pub kind: MessageKind,
    pub payload: String,
}

impl Recipients {
    pub const PEER: Recipients = Recipients {
        peer: true,
        mediator: false,
    };
    pub const ALL: Recipients = Recipients {
        peer: true,
        mediator: true,
    };
}

impl Incoming {
    pub fn new(kind: MessageKind, payload: impl ToString) -> Incoming {
        Incoming {
            kind,
            payload: payload.to_string(),
        }
    }
}

impl Envelope {
    /// View of the message as seen by its receiver.
    pub fn incoming(&self) -> Incoming {
        Incoming::new(self.kind, &self.payload)
    }
}
