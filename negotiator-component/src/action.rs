use argue_argumentation::{Argument, Item};

/// Higher value means more desirable action.
pub type PolicyValue = f64;

/// State can't be reached at all.
pub const UNACCEPTABLE: PolicyValue = -100.0;
/// Giving up negotiation. Always better than an impossible move.
pub const CANCEL_VALUE: PolicyValue = -99.0;

/// Change of negotiator state applied when the action is chosen.
#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    None,
    /// Pin item under discussion.
    Focus(Item),
    /// Register own proposal and pin the item.
    Propose(Item),
    /// Append argument to the negotiation graph.
    Argue(Argument),
}

/// Candidate move computed for a single state.
#[derive(Clone, Debug, PartialEq)]
pub struct Action {
    pub value: PolicyValue,
    /// Payload of the message sent after reaching the state.
    pub content: String,
    pub effect: Effect,
}

impl Action {
    pub fn new(value: PolicyValue, content: impl ToString) -> Action {
        Action {
            value,
            content: content.to_string(),
            effect: Effect::None,
        }
    }

    pub fn unacceptable() -> Action {
        Action::new(UNACCEPTABLE, "")
    }

    pub fn with_effect(mut self, effect: Effect) -> Action {
        self.effect = effect;
        self
    }

    pub fn is_viable(&self) -> bool {
        self.value > UNACCEPTABLE
    }
}
