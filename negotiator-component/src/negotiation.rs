use argue_argumentation::{Argument, Error, Item, NegotiationGraph, Preferences};

use crate::action::{Action, Effect};
use crate::machine::{StateMachine, Trigger};
use crate::message::{Envelope, Incoming, MessageKind};
use crate::policy::{self, NegotiatorView};
use crate::state::State;

/// Negotiation logic of a single negotiator.
///
/// `Negotiation` reacts to one trigger at a time and returns messages,
/// that should be delivered. It knows nothing about the transport.
#[derive(Clone, Debug)]
pub struct Negotiation {
    name: String,
    machine: StateMachine,
    /// Item under active discussion.
    focus: Option<Item>,
    /// Items negotiated in current round.
    items: Vec<Item>,
    preferences: Preferences,
    graph: NegotiationGraph,
}

impl Negotiation {
    pub fn new(name: impl ToString, preferences: Preferences, items: Vec<Item>) -> Negotiation {
        Negotiation {
            name: name.to_string(),
            machine: StateMachine::new(),
            focus: None,
            items,
            preferences,
            graph: NegotiationGraph::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> State {
        self.machine.state()
    }

    pub fn focus(&self) -> Option<&Item> {
        self.focus.as_ref()
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    pub fn graph(&self) -> &NegotiationGraph {
        &self.graph
    }

    fn view(&self) -> NegotiatorView {
        NegotiatorView {
            preferences: &self.preferences,
            graph: &self.graph,
            items: &self.items,
            focus: self.focus.as_ref(),
        }
    }

    /// Handles single message and all immediate transitions following it.
    /// Messages not allowed in current state are dropped.
    pub fn receive(&mut self, message: Incoming) -> Vec<Envelope> {
        let mut outgoing = self.advance();

        let outcomes = self.machine.outcomes(Trigger::Received(message.kind));
        if outcomes.is_empty() {
            log::warn!(
                "{}: unexpected {} in state {}, message dropped. Payload: '{}'",
                self.name,
                message.kind,
                self.state(),
                message.payload
            );
            return outgoing;
        }

        let candidates: &[State] = match self.absorb(&message) {
            Ok(()) => outcomes,
            Err(e) => {
                log::warn!(
                    "{}: failed to process {} '{}'. {}. Cancelling negotiation.",
                    self.name,
                    message.kind,
                    message.payload,
                    e
                );
                &[State::Cancel]
            }
        };

        outgoing.extend(self.react(candidates));
        outgoing.extend(self.advance());
        outgoing
    }

    /// Takes transitions, that don't need any message, as long as they exist.
    pub fn advance(&mut self) -> Vec<Envelope> {
        let mut outgoing = vec![];
        loop {
            let outcomes = self.machine.outcomes(Trigger::Immediate);
            if outcomes.is_empty() {
                return outgoing;
            }
            outgoing.extend(self.react(outcomes));
        }
    }

    /// Updates knowledge with message content before choosing next state.
    fn absorb(&mut self, message: &Incoming) -> Result<(), Error> {
        match message.kind {
            // In other states it is the notice about taken item.
            MessageKind::ItemsAnnounce if self.state() == State::Wait => {
                self.items = Item::parse_list(&message.payload)?;
                self.graph = NegotiationGraph::new();
                self.focus = None;
            }
            MessageKind::Propose => {
                let item = Item::find(&self.items, &message.payload)?.clone();
                self.graph.receive_proposal(item.clone())?;
                self.focus = Some(item);
            }
            MessageKind::Accept => {
                self.focus = Some(Item::find(&self.items, &message.payload)?.clone());
            }
            MessageKind::Argument => {
                let argument = Argument::parse(&message.payload, &self.items)?;
                self.graph.try_add(argument)?;
            }
            _ => {}
        }
        Ok(())
    }

    fn react(&mut self, candidates: &[State]) -> Option<Envelope> {
        let (state, action) = policy::choose(candidates, &self.view())?;

        self.machine.set_state(state);
        self.apply(&action);

        if !matches!(state, State::Wait | State::WaitCommit) {
            if action.content.is_empty() {
                log::info!("{}: {}", self.name, state.label());
            } else {
                log::info!("{}: {}: {}", self.name, state.label(), action.content);
            }
        }

        if matches!(state, State::Accept | State::AcceptAny) {
            log::debug!("{}: accepted with:\n{}\n{}", self.name, self.preferences, self.graph);
        }

        state.message().map(|kind| Envelope {
            kind,
            payload: action.content,
            recipients: state.recipients(),
        })
    }

    fn apply(&mut self, action: &Action) {
        match &action.effect {
            Effect::None => {}
            Effect::Focus(item) => self.focus = Some(item.clone()),
            Effect::Propose(item) => {
                if let Err(e) = self.graph.initiate_proposal(item.clone()) {
                    log::warn!("{}: {}", self.name, e);
                }
                self.focus = Some(item.clone());
            }
            Effect::Argue(argument) => {
                if let Err(e) = self.graph.add(argument.clone()) {
                    log::warn!("{}: {}", self.name, e);
                }
            }
        }
    }
}
