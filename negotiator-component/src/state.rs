use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::message::{MessageKind, Recipients};
use crate::policy::{self, ActionGenerator};

/// States of the negotiation protocol.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum State {
    /// Waiting for the mediator to start a round or for the other negotiator's proposal.
    #[display(fmt = "WAIT")]
    Wait,
    /// Our proposal was accepted, waiting for the other negotiator to commit.
    #[display(fmt = "WAIT_COMMIT")]
    WaitCommit,
    #[display(fmt = "PROPOSE")]
    Propose,
    /// Requesting argument defending the proposal, that was just received.
    #[display(fmt = "ASK_WHY")]
    AskWhy,
    /// Accepting proposal directly after it was received.
    #[display(fmt = "ACCEPT")]
    Accept,
    /// Accepting any of earlier proposals after some argumentation.
    #[display(fmt = "ACCEPT_ANY")]
    AcceptAny,
    /// Defending our own proposal.
    #[display(fmt = "ARGUE_PROP")]
    ArgueProp,
    /// Arguing to make the best possible item win.
    #[display(fmt = "ARGUE")]
    Argue,
    #[display(fmt = "COMMIT")]
    Commit,
    /// Committing to item accepted by us and already committed by the other side.
    #[display(fmt = "COMMIT_TAKE")]
    CommitTake,
    /// Informing everyone that item was chosen.
    #[display(fmt = "TAKE")]
    Take,
    #[display(fmt = "CANCEL")]
    Cancel,
}

impl State {
    pub const ALL: [State; 12] = [
        State::Wait,
        State::WaitCommit,
        State::Propose,
        State::AskWhy,
        State::Accept,
        State::AcceptAny,
        State::ArgueProp,
        State::Argue,
        State::Commit,
        State::CommitTake,
        State::Take,
        State::Cancel,
    ];

    /// Name printed when the state is reached.
    pub fn label(self) -> &'static str {
        match self {
            State::Wait | State::WaitCommit => "WAIT",
            State::Propose => "PROPOSE",
            State::AskWhy => "ASK_WHY",
            State::Accept | State::AcceptAny => "ACCEPT",
            State::ArgueProp | State::Argue => "ARGUE",
            State::Commit | State::CommitTake => "COMMIT",
            State::Take => "TAKE",
            State::Cancel => "CANCEL",
        }
    }

    /// Message sent when entering the state.
    pub fn message(self) -> Option<MessageKind> {
        match self {
            State::Wait | State::WaitCommit => None,
            State::Propose => Some(MessageKind::Propose),
            State::AskWhy => Some(MessageKind::RequestWhy),
            State::Accept | State::AcceptAny => Some(MessageKind::Accept),
            State::ArgueProp | State::Argue => Some(MessageKind::Argument),
            State::Commit | State::CommitTake => Some(MessageKind::Confirm),
            State::Take => Some(MessageKind::ItemsAnnounce),
            State::Cancel => Some(MessageKind::Cancel),
        }
    }

    pub fn recipients(self) -> Recipients {
        match self {
            State::Wait | State::WaitCommit => Recipients::default(),
            State::Take | State::Cancel => Recipients::ALL,
            _ => Recipients::PEER,
        }
    }

    /// Function computing the action, that would be performed after
    /// transitioning to this state.
    pub fn generator(self) -> ActionGenerator {
        match self {
            State::Wait | State::WaitCommit => policy::wait,
            State::Propose => policy::propose,
            State::AskWhy => policy::ask_why,
            State::Accept => policy::accept,
            State::AcceptAny => policy::accept_any,
            State::ArgueProp => policy::argue_proposal,
            State::Argue => policy::argue,
            State::Commit | State::CommitTake => policy::commit,
            State::Take => policy::take,
            State::Cancel => policy::cancel,
        }
    }
}
