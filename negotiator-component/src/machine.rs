use crate::message::MessageKind;
use crate::state::State;

/// Event that can move the state machine forward.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Trigger {
    /// Transition happens without waiting for any message.
    Immediate,
    Received(MessageKind),
}

/// Transition rule from one state to possible outcomes.
/// Outcomes are ordered, earlier ones win ties during arbitration.
#[derive(Clone, Copy, Debug)]
pub struct Rule {
    pub from: State,
    pub trigger: Trigger,
    pub outcomes: &'static [State],
}

const fn rule(from: State, trigger: Trigger, outcomes: &'static [State]) -> Rule {
    Rule {
        from,
        trigger,
        outcomes,
    }
}

const fn on(kind: MessageKind) -> Trigger {
    Trigger::Received(kind)
}

const AFTER_ARGUMENT: &[State] = &[State::Argue, State::Propose, State::AcceptAny, State::Cancel];
const AFTER_PROPOSAL: &[State] = &[State::AskWhy, State::Accept];

use MessageKind::*;

/// Negotiation protocol.
pub static PROTOCOL: &[Rule] = &[
    rule(State::Wait, on(ItemsAnnounce), &[State::Wait]),
    rule(State::Wait, on(StartQuery), &[State::Propose, State::Cancel]),
    rule(State::Wait, on(Propose), AFTER_PROPOSAL),
    rule(State::Wait, on(Cancel), &[State::Wait]),
    //
    rule(State::Propose, on(Accept), &[State::WaitCommit]),
    rule(State::Propose, on(RequestWhy), &[State::ArgueProp, State::Cancel]),
    //
    rule(State::Argue, on(Accept), &[State::WaitCommit]),
    rule(State::Argue, on(Argument), AFTER_ARGUMENT),
    rule(State::Argue, on(Propose), AFTER_PROPOSAL),
    rule(State::Argue, on(Cancel), &[State::Wait]),
    //
    rule(State::ArgueProp, on(Accept), &[State::WaitCommit]),
    rule(State::ArgueProp, on(Argument), AFTER_ARGUMENT),
    rule(State::ArgueProp, on(Propose), AFTER_PROPOSAL),
    rule(State::ArgueProp, on(Cancel), &[State::Wait]),
    //
    rule(State::AskWhy, on(Argument), AFTER_ARGUMENT),
    rule(State::AskWhy, on(Cancel), &[State::Wait]),
    //
    rule(State::Accept, Trigger::Immediate, &[State::CommitTake]),
    rule(State::AcceptAny, Trigger::Immediate, &[State::CommitTake]),
    //
    rule(State::WaitCommit, on(Confirm), &[State::Commit]),
    rule(State::WaitCommit, on(Cancel), &[State::Wait]),
    //
    rule(State::CommitTake, on(Confirm), &[State::Take]),
    rule(State::CommitTake, on(Cancel), &[State::Wait]),
    //
    rule(State::Commit, on(ItemsAnnounce), &[State::Wait]),
    rule(State::Take, Trigger::Immediate, &[State::Wait]),
    rule(State::Cancel, Trigger::Immediate, &[State::Wait]),
];

/// Keeps current protocol state and answers which states can be reached next.
#[derive(Clone, Debug)]
pub struct StateMachine {
    state: State,
}

impl StateMachine {
    pub fn new() -> StateMachine {
        StateMachine { state: State::Wait }
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn set_state(&mut self, state: State) {
        self.state = state;
    }

    /// Candidates reachable from current state. Empty list means, that
    /// the trigger is not allowed by protocol.
    pub fn outcomes(&self, trigger: Trigger) -> &'static [State] {
        outcomes(self.state, trigger)
    }
}

impl Default for StateMachine {
    fn default() -> Self {
        StateMachine::new()
    }
}

pub fn outcomes(from: State, trigger: Trigger) -> &'static [State] {
    PROTOCOL
        .iter()
        .find(|rule| rule.from == from && rule.trigger == trigger)
        .map(|rule| rule.outcomes)
        .unwrap_or(&[])
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(State::Wait, StartQuery, &[State::Propose, State::Cancel])]
    #[test_case(State::ArgueProp, Argument, &[State::Argue, State::Propose, State::AcceptAny, State::Cancel])]
    #[test_case(State::AskWhy, Argument, &[State::Argue, State::Propose, State::AcceptAny, State::Cancel])]
    #[test_case(State::Propose, RequestWhy, &[State::ArgueProp, State::Cancel])]
    #[test_case(State::Commit, ItemsAnnounce, &[State::Wait])]
    #[test_case(State::CommitTake, Confirm, &[State::Take])]
    fn test_received_outcomes(from: State, kind: MessageKind, expected: &[State]) {
        assert_eq!(outcomes(from, Trigger::Received(kind)), expected);
    }

    #[test_case(State::Propose, Propose)]
    #[test_case(State::Wait, Argument)]
    #[test_case(State::AskWhy, Accept)]
    #[test_case(State::Commit, Confirm)]
    fn test_protocol_violations_have_no_outcomes(from: State, kind: MessageKind) {
        assert!(outcomes(from, Trigger::Received(kind)).is_empty());
    }

    #[test]
    fn test_immediate_transitions() {
        let immediate = State::ALL
            .iter()
            .copied()
            .filter(|state| !outcomes(*state, Trigger::Immediate).is_empty())
            .collect::<Vec<_>>();
        assert_eq!(
            immediate,
            vec![State::Accept, State::AcceptAny, State::Take, State::Cancel]
        );
    }

    #[test]
    fn test_rules_are_unique() {
        for (idx, rule) in PROTOCOL.iter().enumerate() {
            assert!(PROTOCOL[idx + 1..]
                .iter()
                .all(|other| other.from != rule.from || other.trigger != rule.trigger));
            assert!(!rule.outcomes.is_empty());
        }
    }

    #[test]
    fn test_cancel_reachable_where_proposing_or_arguing_may_fail() {
        for rule in PROTOCOL {
            let risky = rule
                .outcomes
                .iter()
                .any(|state| matches!(state, State::Propose | State::Argue | State::ArgueProp));
            if risky {
                assert!(rule.outcomes.contains(&State::Cancel), "{:?}", rule);
            }
        }
    }

    #[test]
    fn test_machine_starts_waiting() {
        let mut machine = StateMachine::new();
        assert_eq!(machine.state(), State::Wait);
        assert_eq!(
            machine.outcomes(Trigger::Received(Propose)),
            &[State::AskWhy, State::Accept]
        );

        machine.set_state(State::Accept);
        assert_eq!(machine.outcomes(Trigger::Immediate), &[State::CommitTake]);
    }
}
