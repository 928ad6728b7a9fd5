use actix::prelude::*;
use anyhow::{anyhow, bail};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::{broadcast, mpsc};
use tokio_stream::wrappers::UnboundedReceiverStream;

use argue_argumentation::{Item, Preferences};

use crate::mediator::{BeginRound, Mediator, MediatorEvent, Starter};
use crate::negotiator::Negotiator;
use crate::negotiators::{Outgoing, Party, PartyAddr};

/// Number of routed messages kept for observers, that don't keep up.
const OBSERVERS_CAPACITY: usize = 1024;

/// Result of the whole session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionOutcome {
    /// Pool was exhausted. Items are in selection order.
    Finished { selected: Vec<Item> },
    /// One of negotiators gave up. Contains items selected until then.
    Cancelled { selected: Vec<Item> },
}

/// Engineer taking part in the session.
#[derive(Clone, Debug)]
pub struct EngineerSetup {
    pub name: String,
    pub preferences: Preferences,
}

/// Mediator, two negotiators and the router delivering messages between them.
pub struct Session {
    mediator: Addr<Mediator>,
    events: mpsc::UnboundedReceiver<MediatorEvent>,
    observers: broadcast::Sender<Outgoing>,
    router: Addr<Router>,
}

impl Session {
    /// Starts all actors. Must be called inside running actix system.
    /// Nothing happens until `run` is called.
    pub fn start(items: Vec<Item>, engineers: [EngineerSetup; 2], starter: Starter) -> Session {
        let (outbox, posted) = mpsc::unbounded_channel();
        let (events_sender, events) = mpsc::unbounded_channel();
        let (observers, _) = broadcast::channel(OBSERVERS_CAPACITY);

        let mut parties = HashMap::new();
        for (party, engineer) in Party::NEGOTIATORS.into_iter().zip(engineers) {
            let negotiator = Negotiator::new(
                party,
                &engineer.name,
                engineer.preferences,
                items.clone(),
                outbox.clone(),
            );
            parties.insert(party, PartyAddr::from(party, negotiator));
        }

        let mediator = Mediator::new(items, starter, outbox, events_sender).start();
        parties.insert(
            Party::Mediator,
            PartyAddr {
                party: Party::Mediator,
                on_deliver: mediator.clone().recipient(),
            },
        );

        let router = Router::start_routing(parties, observers.clone(), posted);

        Session {
            mediator,
            events,
            observers,
            router,
        }
    }

    /// Stream of every routed message in delivery order.
    pub fn subscribe(&self) -> broadcast::Receiver<Outgoing> {
        self.observers.subscribe()
    }

    /// Runs rounds until the mediator reports the end of session.
    pub async fn run(mut self) -> anyhow::Result<SessionOutcome> {
        self.mediator
            .send(BeginRound)
            .await
            .map_err(|e| anyhow!("Failed to start the first round. {}", e))?;

        while let Some(event) = self.events.recv().await {
            match event {
                MediatorEvent::RoundStarted { round, starter } => {
                    log::debug!("Session: round {} opened by {}.", round, starter)
                }
                MediatorEvent::ItemSelected { round, item } => {
                    log::debug!("Session: round {} ended with [{}].", round, item.name)
                }
                MediatorEvent::Finished { selected } => {
                    self.router.do_send(StopRouting);
                    return Ok(SessionOutcome::Finished { selected });
                }
                MediatorEvent::Cancelled { selected, .. } => {
                    self.router.do_send(StopRouting);
                    return Ok(SessionOutcome::Cancelled { selected });
                }
            }
        }
        bail!("Mediator stopped without reporting the end of session.")
    }
}

/// Forwards messages posted to the outbox. Outbox is drained oldest-first
/// and addressees get the message in listed order, so each mailbox receives
/// messages in the order they were sent.
pub struct Router {
    parties: HashMap<Party, PartyAddr>,
    observers: broadcast::Sender<Outgoing>,
}

#[derive(Message)]
#[rtype(result = "()")]
pub struct StopRouting;

impl Router {
    pub fn start_routing(
        parties: HashMap<Party, PartyAddr>,
        observers: broadcast::Sender<Outgoing>,
        outbox: mpsc::UnboundedReceiver<Outgoing>,
    ) -> Addr<Router> {
        Router::create(move |ctx| {
            ctx.add_stream(UnboundedReceiverStream::new(outbox));
            Router { parties, observers }
        })
    }
}

impl Actor for Router {
    type Context = Context<Self>;
}

impl StreamHandler<Outgoing> for Router {
    fn handle(&mut self, msg: Outgoing, _: &mut Context<Self>) {
        log::debug!(
            "{} -> {:?}: {} [{}]",
            msg.from,
            msg.to,
            msg.kind,
            msg.payload
        );

        for party in &msg.to {
            match self.parties.get(party) {
                Some(addr) => addr.deliver(msg.deliver()),
                None => log::warn!("Router: No mailbox for {} party.", party),
            }
        }

        // Sending fails only if nobody observes the session.
        self.observers.send(msg).ok();
    }
}

impl Handler<StopRouting> for Router {
    type Result = ();

    fn handle(&mut self, _: StopRouting, ctx: &mut Context<Self>) -> Self::Result {
        ctx.stop();
    }
}
