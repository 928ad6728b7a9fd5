pub mod factory;
mod mediator;
mod negotiator;
mod negotiators;
mod session;

pub use mediator::{BeginRound, Mediator, MediatorEvent, Starter};
pub use negotiator::Negotiator;
pub use negotiators::{Deliver, Outbox, Outgoing, Party, PartyAddr};
pub use session::{EngineerSetup, Router, Session, SessionOutcome, StopRouting};

pub mod argumentation {
    pub use argue_argumentation::*;
}

pub mod component {
    pub use argue_negotiator_component::*;
}
