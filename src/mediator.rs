use actix::prelude::*;
use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use argue_argumentation::Item;
use argue_negotiator_component::MessageKind;

use crate::negotiators::{Deliver, Outbox, Outgoing, Party};

/// Progress of the session reported by the mediator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediatorEvent {
    RoundStarted { round: usize, starter: Party },
    ItemSelected { round: usize, item: Item },
    Finished { selected: Vec<Item> },
    Cancelled { round: usize, selected: Vec<Item> },
}

/// Decides which negotiator opens the round.
#[derive(Debug)]
pub enum Starter {
    RoundRobin,
    Random(StdRng),
}

impl Starter {
    fn choose(&mut self, round: usize) -> Party {
        match self {
            Starter::RoundRobin => Party::NEGOTIATORS[round % Party::NEGOTIATORS.len()],
            Starter::Random(rng) => Party::NEGOTIATORS[rng.gen_range(0..Party::NEGOTIATORS.len())],
        }
    }
}

/// Starts the first round.
#[derive(Message)]
#[rtype(result = "()")]
pub struct BeginRound;

/// Owns the pool of items and runs consecutive rounds until the pool is
/// exhausted or one of negotiators cancels.
pub struct Mediator {
    pool: Vec<Item>,
    selected: Vec<Item>,
    round: usize,
    starter: Starter,

    outbox: Outbox,
    events: mpsc::UnboundedSender<MediatorEvent>,
}

impl Mediator {
    pub fn new(
        items: Vec<Item>,
        starter: Starter,
        outbox: Outbox,
        events: mpsc::UnboundedSender<MediatorEvent>,
    ) -> Mediator {
        Mediator {
            pool: items,
            selected: vec![],
            round: 0,
            starter,
            outbox,
            events,
        }
    }

    fn begin_round(&mut self, ctx: &mut Context<Self>) {
        if self.pool.is_empty() {
            log::info!("All items were selected: {}", names(&self.selected));
            self.report(MediatorEvent::Finished {
                selected: self.selected.clone(),
            });
            ctx.stop();
            return;
        }

        let starter = self.starter.choose(self.round);
        log::info!(
            "Round {} started by {} negotiator. Items left: {}",
            self.round,
            starter,
            self.pool.len()
        );

        self.post(Outgoing::new(
            Party::Mediator,
            Party::NEGOTIATORS.to_vec(),
            MessageKind::ItemsAnnounce,
            Item::format_list(&self.pool),
        ));
        self.post(Outgoing::new(
            Party::Mediator,
            vec![starter],
            MessageKind::StartQuery,
            "",
        ));
        self.report(MediatorEvent::RoundStarted {
            round: self.round,
            starter,
        });
    }

    fn select(&mut self, name: &str, ctx: &mut Context<Self>) {
        let position = match self.pool.iter().position(|item| item.name == name) {
            Some(position) => position,
            None => {
                log::warn!("Item [{}] selected, but it isn't in the pool. Ignoring.", name);
                return;
            }
        };

        let item = self.pool.remove(position);
        log::info!("Round {}: item [{}] selected.", self.round, item.name);

        self.selected.push(item.clone());
        self.report(MediatorEvent::ItemSelected {
            round: self.round,
            item,
        });

        self.round += 1;
        self.begin_round(ctx);
    }

    fn cancel(&mut self, from: Party, ctx: &mut Context<Self>) {
        log::info!(
            "Negotiation cancelled by {} negotiator in round {}. Selected items: {}",
            from,
            self.round,
            names(&self.selected)
        );
        self.report(MediatorEvent::Cancelled {
            round: self.round,
            selected: self.selected.clone(),
        });
        ctx.stop();
    }

    fn post(&self, message: Outgoing) {
        if self.outbox.send(message).is_err() {
            log::warn!("Mediator: Outbox closed, message won't be delivered.");
        }
    }

    fn report(&self, event: MediatorEvent) {
        if self.events.send(event).is_err() {
            log::debug!("Mediator: Nobody listens to session events.");
        }
    }
}

fn names(items: &[Item]) -> String {
    items
        .iter()
        .map(|item| item.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

impl Actor for Mediator {
    type Context = Context<Self>;
}

impl Handler<BeginRound> for Mediator {
    type Result = ();

    fn handle(&mut self, _: BeginRound, ctx: &mut Context<Self>) -> Self::Result {
        self.begin_round(ctx)
    }
}

impl Handler<Deliver> for Mediator {
    type Result = ();

    fn handle(&mut self, msg: Deliver, ctx: &mut Context<Self>) -> Self::Result {
        match msg.kind {
            MessageKind::ItemsAnnounce => self.select(msg.payload.trim(), ctx),
            MessageKind::Cancel => self.cancel(msg.from, ctx),
            kind => log::warn!(
                "Mediator: Unexpected message {} from {} negotiator. Ignoring.",
                kind,
                msg.from
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn catalog() -> Vec<Item> {
        vec![Item::new("A", "first item"), Item::new("B", "second item")]
    }

    fn take(from: Party, name: &str) -> Deliver {
        Deliver {
            from,
            kind: MessageKind::ItemsAnnounce,
            payload: name.to_string(),
        }
    }

    #[actix_rt::test]
    async fn test_mediator_runs_rounds_until_pool_is_empty() {
        let (outbox, mut posted) = mpsc::unbounded_channel();
        let (events, mut reported) = mpsc::unbounded_channel();
        let addr = Mediator::new(catalog(), Starter::RoundRobin, outbox, events).start();

        addr.send(BeginRound).await.unwrap();
        assert_eq!(
            posted.recv().await.unwrap(),
            Outgoing::new(
                Party::Mediator,
                vec![Party::First, Party::Second],
                MessageKind::ItemsAnnounce,
                "A;first item|B;second item"
            )
        );
        assert_eq!(
            posted.recv().await.unwrap(),
            Outgoing::new(Party::Mediator, vec![Party::First], MessageKind::StartQuery, "")
        );

        addr.send(take(Party::First, "A")).await.unwrap();
        assert_eq!(
            posted.recv().await.unwrap().payload,
            "B;second item".to_string()
        );
        // Second round is opened by the other negotiator.
        assert_eq!(posted.recv().await.unwrap().to, vec![Party::Second]);

        addr.send(take(Party::Second, "B")).await.unwrap();

        let events = [
            reported.recv().await.unwrap(),
            reported.recv().await.unwrap(),
            reported.recv().await.unwrap(),
            reported.recv().await.unwrap(),
            reported.recv().await.unwrap(),
        ];
        assert_eq!(
            events,
            [
                MediatorEvent::RoundStarted {
                    round: 0,
                    starter: Party::First
                },
                MediatorEvent::ItemSelected {
                    round: 0,
                    item: Item::new("A", "first item")
                },
                MediatorEvent::RoundStarted {
                    round: 1,
                    starter: Party::Second
                },
                MediatorEvent::ItemSelected {
                    round: 1,
                    item: Item::new("B", "second item")
                },
                MediatorEvent::Finished {
                    selected: catalog()
                },
            ]
        );
        assert!(posted.try_recv().is_err());
    }

    #[actix_rt::test]
    async fn test_mediator_ignores_unknown_items() {
        let (outbox, mut posted) = mpsc::unbounded_channel();
        let (events, mut reported) = mpsc::unbounded_channel();
        let addr = Mediator::new(catalog(), Starter::RoundRobin, outbox, events).start();

        addr.send(BeginRound).await.unwrap();
        addr.send(take(Party::First, "Diesel")).await.unwrap();
        addr.send(Deliver {
            from: Party::First,
            kind: MessageKind::Propose,
            payload: "A".to_string(),
        })
        .await
        .unwrap();

        // Only messages of the first round.
        assert!(posted.recv().await.is_some());
        assert!(posted.recv().await.is_some());
        assert!(posted.try_recv().is_err());

        assert!(matches!(
            reported.recv().await.unwrap(),
            MediatorEvent::RoundStarted { round: 0, .. }
        ));
        assert!(reported.try_recv().is_err());
    }

    #[actix_rt::test]
    async fn test_mediator_stops_on_cancel() {
        let (outbox, _posted) = mpsc::unbounded_channel();
        let (events, mut reported) = mpsc::unbounded_channel();
        let addr = Mediator::new(catalog(), Starter::RoundRobin, outbox, events).start();

        addr.send(BeginRound).await.unwrap();
        addr.send(Deliver {
            from: Party::Second,
            kind: MessageKind::Cancel,
            payload: String::new(),
        })
        .await
        .unwrap();

        reported.recv().await.unwrap();
        assert_eq!(
            reported.recv().await.unwrap(),
            MediatorEvent::Cancelled {
                round: 0,
                selected: vec![]
            }
        );
    }

    #[actix_rt::test]
    async fn test_empty_pool_finishes_immediately() {
        let (outbox, mut posted) = mpsc::unbounded_channel();
        let (events, mut reported) = mpsc::unbounded_channel();
        let addr = Mediator::new(vec![], Starter::RoundRobin, outbox, events).start();

        addr.send(BeginRound).await.unwrap();

        assert_eq!(
            reported.recv().await.unwrap(),
            MediatorEvent::Finished { selected: vec![] }
        );
        assert!(posted.try_recv().is_err());
    }

    #[test]
    fn test_seeded_random_starter_is_reproducible() {
        let mut first = Starter::Random(StdRng::seed_from_u64(3));
        let mut second = Starter::Random(StdRng::seed_from_u64(3));
        for round in 0..20 {
            assert_eq!(first.choose(round), second.choose(round));
        }
    }
}
