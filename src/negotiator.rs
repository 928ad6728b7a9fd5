use actix::prelude::*;

use argue_argumentation::{Item, Preferences};
use argue_negotiator_component::{Incoming, Negotiation};

use crate::negotiators::{Deliver, Outbox, Outgoing, Party};

/// Actor hosting negotiation driver of a single engineer. Every delivered
/// message is processed to the end, before the next one is taken from the mailbox.
pub struct Negotiator {
    party: Party,
    negotiation: Negotiation,
    outbox: Outbox,
}

impl Negotiator {
    pub fn new(
        party: Party,
        name: &str,
        preferences: Preferences,
        items: Vec<Item>,
        outbox: Outbox,
    ) -> Negotiator {
        Negotiator {
            party,
            negotiation: Negotiation::new(name, preferences, items),
            outbox,
        }
    }

    fn post(&self, message: Outgoing) {
        if self.outbox.send(message).is_err() {
            log::warn!(
                "{}: Outbox closed, message won't be delivered.",
                self.negotiation.name()
            );
        }
    }
}

impl Actor for Negotiator {
    type Context = Context<Self>;

    fn started(&mut self, _ctx: &mut Context<Self>) {
        log::debug!(
            "Negotiator {} started as {} party.",
            self.negotiation.name(),
            self.party
        );
    }
}

impl Handler<Deliver> for Negotiator {
    type Result = ();

    fn handle(&mut self, msg: Deliver, _: &mut Context<Self>) -> Self::Result {
        let envelopes = self
            .negotiation
            .receive(Incoming::new(msg.kind, msg.payload));

        for envelope in envelopes {
            self.post(Outgoing::from_envelope(self.party, envelope));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use argue_argumentation::{Criterion, CriterionRating, Rating};
    use argue_negotiator_component::MessageKind;
    use tokio::sync::mpsc;

    fn catalog() -> Vec<Item> {
        vec![Item::new("A", "first item"), Item::new("B", "second item")]
    }

    fn power_over_cost(items: &[Item]) -> Preferences {
        Preferences::new(
            vec![Criterion::Power, Criterion::Cost],
            vec![
                CriterionRating::new(items[0].clone(), Criterion::Power, Rating::Good),
                CriterionRating::new(items[0].clone(), Criterion::Cost, Rating::Bad),
                CriterionRating::new(items[1].clone(), Criterion::Power, Rating::Bad),
                CriterionRating::new(items[1].clone(), Criterion::Cost, Rating::Good),
            ],
        )
    }

    fn from_mediator(kind: MessageKind, payload: &str) -> Deliver {
        Deliver {
            from: Party::Mediator,
            kind,
            payload: payload.to_string(),
        }
    }

    #[actix_rt::test]
    async fn test_negotiator_opens_round() {
        let items = catalog();
        let (outbox, mut posted) = mpsc::unbounded_channel();
        let addr = Negotiator::new(
            Party::Second,
            "engineer2",
            power_over_cost(&items),
            items.clone(),
            outbox,
        )
        .start();

        addr.send(from_mediator(
            MessageKind::ItemsAnnounce,
            &Item::format_list(&items),
        ))
        .await
        .unwrap();
        addr.send(from_mediator(MessageKind::StartQuery, ""))
            .await
            .unwrap();

        let message = posted.recv().await.unwrap();
        assert_eq!(
            message,
            Outgoing::new(Party::Second, vec![Party::First], MessageKind::Propose, "A")
        );
        assert!(posted.try_recv().is_err());
    }

    #[actix_rt::test]
    async fn test_negotiator_ignores_out_of_protocol_messages() {
        let items = catalog();
        let (outbox, mut posted) = mpsc::unbounded_channel();
        let addr = Negotiator::new(
            Party::First,
            "engineer1",
            power_over_cost(&items),
            items,
            outbox,
        )
        .start();

        addr.send(Deliver {
            from: Party::Second,
            kind: MessageKind::Confirm,
            payload: "A".to_string(),
        })
        .await
        .unwrap();

        assert!(posted.try_recv().is_err());
    }
}
