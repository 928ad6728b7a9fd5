//! Negotiation protocol of a single negotiator: transition table, action
//! generators scoring possible moves and the driver reacting to messages.
pub mod action;
pub mod machine;
pub mod message;
pub mod negotiation;
pub mod policy;
pub mod state;

pub use action::{Action, Effect, PolicyValue, CANCEL_VALUE, UNACCEPTABLE};
pub use machine::{StateMachine, Trigger};
pub use message::{Envelope, Incoming, MessageKind, Recipients};
pub use negotiation::Negotiation;
pub use policy::NegotiatorView;
pub use state::State;
