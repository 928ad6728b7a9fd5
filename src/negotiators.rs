use actix::prelude::*;
use derive_more::Display;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use argue_negotiator_component::{Envelope, MessageKind};

/// Participants of a negotiation session.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Party {
    First,
    Second,
    Mediator,
}

impl Party {
    pub const NEGOTIATORS: [Party; 2] = [Party::First, Party::Second];

    /// The other negotiator. Mediator has no peer and gets itself back.
    pub fn peer(self) -> Party {
        match self {
            Party::First => Party::Second,
            Party::Second => Party::First,
            Party::Mediator => Party::Mediator,
        }
    }
}

// =========================================== //
// Transport messages
// =========================================== //

/// Message delivered to a party's mailbox.
#[derive(Message, Clone, Debug, PartialEq, Eq)]
#[rtype(result = "()")]
pub struct Deliver {
    pub from: Party,
    pub kind: MessageKind,
    pub payload: String,
}

/// Message posted by a party to the shared outbox. Addressees are served
/// in the order they are listed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outgoing {
    pub from: Party,
    pub to: Vec<Party>,
    pub kind: MessageKind,
    pub payload: String,
}

pub type Outbox = mpsc::UnboundedSender<Outgoing>;

impl Outgoing {
    pub fn new(from: Party, to: Vec<Party>, kind: MessageKind, payload: impl ToString) -> Outgoing {
        Outgoing {
            from,
            to,
            kind,
            payload: payload.to_string(),
        }
    }

    /// Resolves recipients of negotiator's envelope. Peer is always served
    /// before the mediator.
    pub fn from_envelope(from: Party, envelope: Envelope) -> Outgoing {
        let mut to = vec![];
        if envelope.recipients.peer {
            to.push(from.peer());
        }
        if envelope.recipients.mediator {
            to.push(Party::Mediator);
        }

        Outgoing {
            from,
            to,
            kind: envelope.kind,
            payload: envelope.payload,
        }
    }

    pub fn deliver(&self) -> Deliver {
        Deliver {
            from: self.from,
            kind: self.kind,
            payload: self.payload.clone(),
        }
    }
}

/// Mailbox of a single party.
#[derive(Clone)]
pub struct PartyAddr {
    pub party: Party,
    pub on_deliver: Recipient<Deliver>,
}

impl PartyAddr {
    pub fn deliver(&self, message: Deliver) {
        self.on_deliver.do_send(message)
    }

    pub fn from<T>(party: Party, actor: T) -> PartyAddr
    where
        T: Actor<Context = Context<T>> + Handler<Deliver>,
    {
        PartyAddr {
            party,
            on_deliver: actor.start().recipient(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use argue_negotiator_component::Recipients;

    #[test]
    fn test_envelope_recipients_resolution() {
        let envelope = Envelope {
            kind: MessageKind::ItemsAnnounce,
            payload: "A".to_string(),
            recipients: Recipients::ALL,
        };
        let outgoing = Outgoing::from_envelope(Party::Second, envelope);
        assert_eq!(outgoing.to, vec![Party::First, Party::Mediator]);
        assert_eq!(outgoing.from, Party::Second);

        let envelope = Envelope {
            kind: MessageKind::Propose,
            payload: "A".to_string(),
            recipients: Recipients::PEER,
        };
        let outgoing = Outgoing::from_envelope(Party::First, envelope);
        assert_eq!(outgoing.to, vec![Party::Second]);
        assert_eq!(
            outgoing.deliver(),
            Deliver {
                from: Party::First,
                kind: MessageKind::Propose,
                payload: "A".to_string()
            }
        );
    }

    #[test]
    fn test_peers() {
        assert_eq!(Party::First.peer(), Party::Second);
        assert_eq!(Party::Second.peer(), Party::First);
        assert_eq!(Party::Mediator.peer(), Party::Mediator);
    }
}
