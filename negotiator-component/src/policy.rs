//! Action generators for every protocol state.
//!
//! Generators are pure functions of negotiator's view. They never modify
//! the negotiator, changes are described by `Effect` of the returned `Action`.
use argue_argumentation::{Item, NegotiationGraph, Preferences};

use crate::action::{Action, Effect, PolicyValue, CANCEL_VALUE, UNACCEPTABLE};
use crate::state::State;

pub type ActionGenerator = fn(&NegotiatorView) -> Action;

/// Read only view of the negotiator, used to score next moves.
#[derive(Clone, Copy)]
pub struct NegotiatorView<'a> {
    pub preferences: &'a Preferences,
    pub graph: &'a NegotiationGraph,
    /// Items negotiated in current round.
    pub items: &'a [Item],
    pub focus: Option<&'a Item>,
}

impl<'a> NegotiatorView<'a> {
    fn score(&self, item: &Item) -> PolicyValue {
        self.preferences.score(item) as PolicyValue
    }

    fn is_acceptable(&self, item: &Item) -> bool {
        self.preferences.is_acceptable(item, self.items)
    }
}

/// Chooses the best of candidate states. Earlier candidate wins unless
/// later one has strictly greater value, so the first candidate is chosen
/// even if every state is unacceptable.
pub fn choose(candidates: &[State], view: &NegotiatorView) -> Option<(State, Action)> {
    let mut best: Option<(State, Action)> = None;
    for state in candidates {
        let action = state.generator()(view);
        let replace = match &best {
            Some((_, chosen)) => action.value > chosen.value,
            None => true,
        };
        if replace {
            best = Some((*state, action));
        }
    }
    best
}

pub fn wait(_view: &NegotiatorView) -> Action {
    Action::new(0.0, "")
}

pub fn ask_why(view: &NegotiatorView) -> Action {
    match view.focus {
        Some(item) => Action::new(CANCEL_VALUE, &item.name),
        None => Action::unacceptable(),
    }
}

pub fn commit(view: &NegotiatorView) -> Action {
    match view.focus {
        Some(item) => Action::new(0.0, &item.name).with_effect(Effect::Focus(item.clone())),
        None => Action::unacceptable(),
    }
}

pub fn take(view: &NegotiatorView) -> Action {
    commit(view)
}

pub fn cancel(_view: &NegotiatorView) -> Action {
    Action::new(CANCEL_VALUE, "")
}

/// Accepts proposal, that was just received.
pub fn accept(view: &NegotiatorView) -> Action {
    match view.focus {
        Some(item) if view.is_acceptable(item) => Action::new(view.score(item), &item.name)
            .with_effect(Effect::Focus(item.clone())),
        _ => Action::unacceptable(),
    }
}

/// Accepts the best of other negotiator's proposals, that is either winning
/// in the graph or acceptable for us.
pub fn accept_any(view: &NegotiatorView) -> Action {
    let mut best: Option<(&Item, PolicyValue)> = None;
    for item in view.graph.items_proposed_by_other() {
        if !view.graph.is_winning(item) && !view.is_acceptable(item) {
            continue;
        }

        let score = view.score(item);
        let best_score = best.map(|(_, score)| score).unwrap_or(UNACCEPTABLE);
        if score > best_score {
            best = Some((item, score));
        }
    }

    match best {
        Some((item, score)) => {
            Action::new(score, &item.name).with_effect(Effect::Focus(item.clone()))
        }
        None => Action::unacceptable(),
    }
}

/// Proposes the best acceptable item, that wasn't proposed yet and can be
/// defended if the other side asks why.
pub fn propose(view: &NegotiatorView) -> Action {
    let mut candidates = view
        .items
        .iter()
        .filter(|item| !view.graph.is_proposed(item))
        .cloned()
        .collect::<Vec<_>>();

    while let Some(item) = view.preferences.best(&candidates).cloned() {
        if !view.is_acceptable(&item) {
            break;
        }

        let mut simulation = view.graph.clone();
        if simulation.initiate_proposal(item.clone()).is_ok()
            && argue_with_graph(view, &simulation, Some(&item)).is_viable()
        {
            return Action::new(view.score(&item), &item.name)
                .with_effect(Effect::Propose(item));
        }

        log::trace!("Item {} can't be defended, won't propose it.", item.name);
        candidates.retain(|candidate| candidate != &item);
    }
    Action::unacceptable()
}

/// Argues about any item, choosing the argument that makes
/// the best scored item win.
pub fn argue(view: &NegotiatorView) -> Action {
    argue_with_graph(view, view.graph, None)
}

/// Defends item, that we just proposed.
pub fn argue_proposal(view: &NegotiatorView) -> Action {
    match view.focus {
        Some(item) => argue_with_graph(view, view.graph, Some(item)),
        None => Action::unacceptable(),
    }
}

/// Computes argue action on arbitrary graph. Argument is valued by the best
/// score among items winning after adding it to the graph, so arguments
/// leaving no item winning are never chosen.
///
/// `forced` limits argumentation to a single item.
pub fn argue_with_graph(
    view: &NegotiatorView,
    graph: &NegotiationGraph,
    forced: Option<&Item>,
) -> Action {
    let proposed = graph.proposed_items();
    let mut best: Option<(PolicyValue, _)> = None;

    for item in proposed.iter().copied() {
        if forced.map(|forced| forced != item).unwrap_or(false) {
            continue;
        }

        let argument = match graph.generate_best_argument(item, view.preferences, view.items) {
            Some(argument) => argument,
            None => continue,
        };

        let mut simulation = graph.clone();
        if simulation.add(argument.clone()).is_err() {
            continue;
        }

        let outcome = proposed
            .iter()
            .filter(|candidate| simulation.is_winning(candidate))
            .map(|candidate| view.score(candidate))
            .fold(UNACCEPTABLE, PolicyValue::max);

        let best_value = best.as_ref().map(|(value, _)| *value).unwrap_or(UNACCEPTABLE);
        if outcome > best_value {
            best = Some((outcome, argument));
        }
    }

    match best {
        Some((value, argument)) => {
            Action::new(value, &argument).with_effect(Effect::Argue(argument))
        }
        None => Action::unacceptable(),
    }
}
