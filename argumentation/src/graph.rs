use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter;

use crate::argument::{Argument, CriterionPreference, Evaluation};
use crate::catalog::{Criterion, Rating};
use crate::error::Error;
use crate::item::Item;
use crate::preferences::Preferences;

/// Argument on a proposal branch together with the argument attacking it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ArgumentNode {
    pub argument: Argument,
    attacked_by: Option<Box<ArgumentNode>>,
}

/// Root of a single branch. Owns the whole chain of arguments
/// attacking each other, starting from the one defending the proposal.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProposalNode {
    pub item: Item,
    pub initiated_by_self: bool,
    defended_by: Option<Box<ArgumentNode>>,
}

/// Arguments exchanged for and against items proposed in current round.
/// `clone()` makes a deep copy, that can be used for simulating moves.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct NegotiationGraph {
    proposals: Vec<ProposalNode>,
}

impl ArgumentNode {
    fn new(argument: Argument) -> ArgumentNode {
        ArgumentNode {
            argument,
            attacked_by: None,
        }
    }

    pub fn attacked_by(&self) -> Option<&ArgumentNode> {
        self.attacked_by.as_deref()
    }

    /// Unattacked argument is winning, otherwise it wins only if its attacker loses.
    pub fn is_winning(&self) -> bool {
        match self.attacked_by() {
            None => true,
            Some(attacker) => !attacker.is_winning(),
        }
    }

    fn push(&mut self, argument: Argument) {
        if let Some(attacker) = self.attacked_by.as_mut() {
            attacker.push(argument)
        } else {
            self.attacked_by = Some(Box::new(ArgumentNode::new(argument)));
        }
    }
}

impl ProposalNode {
    fn new(item: Item, initiated_by_self: bool) -> ProposalNode {
        ProposalNode {
            item,
            initiated_by_self,
            defended_by: None,
        }
    }

    /// Nodes of the branch from the defending argument to the leaf.
    pub fn nodes(&self) -> impl Iterator<Item = &ArgumentNode> {
        iter::successors(self.defended_by.as_deref(), |node| node.attacked_by())
    }

    pub fn arguments(&self) -> impl Iterator<Item = &Argument> {
        self.nodes().map(|node| &node.argument)
    }

    pub fn leaf(&self) -> Option<&Argument> {
        self.arguments().last()
    }

    /// Undefended proposal is never winning.
    pub fn is_winning(&self) -> bool {
        self.defended_by
            .as_deref()
            .map(ArgumentNode::is_winning)
            .unwrap_or(false)
    }

    /// Anything can defend an undefended proposal. Otherwise new argument
    /// must be stronger than every argument on the branch and attack the leaf.
    pub fn can_add(&self, argument: &Argument) -> bool {
        let leaf = match self.leaf() {
            Some(leaf) => leaf,
            None => return true,
        };
        self.arguments().all(|other| argument.is_stronger_than(other)) && argument.attacks(leaf)
    }

    fn push(&mut self, argument: Argument) {
        if let Some(defence) = self.defended_by.as_mut() {
            defence.push(argument)
        } else {
            self.defended_by = Some(Box::new(ArgumentNode::new(argument)));
        }
    }
}

impl NegotiationGraph {
    pub fn new() -> NegotiationGraph {
        NegotiationGraph::default()
    }

    pub fn proposals(&self) -> &[ProposalNode] {
        &self.proposals
    }

    pub fn proposal(&self, item: &Item) -> Option<&ProposalNode> {
        self.proposals.iter().find(|proposal| &proposal.item == item)
    }

    fn proposal_mut(&mut self, item: &Item) -> Option<&mut ProposalNode> {
        self.proposals
            .iter_mut()
            .find(|proposal| &proposal.item == item)
    }

    pub fn is_proposed(&self, item: &Item) -> bool {
        self.proposal(item).is_some()
    }

    /// Registers proposal made by this negotiator.
    pub fn initiate_proposal(&mut self, item: Item) -> Result<(), Error> {
        self.add_proposal(item, true)
    }

    /// Registers proposal received from the other negotiator.
    pub fn receive_proposal(&mut self, item: Item) -> Result<(), Error> {
        self.add_proposal(item, false)
    }

    fn add_proposal(&mut self, item: Item, initiated_by_self: bool) -> Result<(), Error> {
        if self.is_proposed(&item) {
            return Err(Error::DuplicateProposal(item.name));
        }
        self.proposals.push(ProposalNode::new(item, initiated_by_self));
        Ok(())
    }

    /// Arguments concerning items that were never proposed can't be added.
    pub fn can_add(&self, argument: &Argument) -> bool {
        self.proposal(&argument.item)
            .map(|proposal| proposal.can_add(argument))
            .unwrap_or(false)
    }

    /// Appends argument at the end of its proposal branch without validation.
    /// Use `can_add` before or call `try_add`.
    pub fn add(&mut self, argument: Argument) -> Result<(), Error> {
        let proposal = self
            .proposal_mut(&argument.item)
            .ok_or_else(|| Error::UnknownProposal(argument.item.name.clone()))?;
        proposal.push(argument);
        Ok(())
    }

    pub fn try_add(&mut self, argument: Argument) -> Result<(), Error> {
        if !self.is_proposed(&argument.item) {
            return Err(Error::UnknownProposal(argument.item.name));
        }
        if !self.can_add(&argument) {
            return Err(Error::Rejected(argument.to_string()));
        }
        self.add(argument)
    }

    pub fn proposed_items(&self) -> Vec<&Item> {
        self.proposals.iter().map(|proposal| &proposal.item).collect()
    }

    pub fn items_proposed_by_other(&self) -> Vec<&Item> {
        self.proposals
            .iter()
            .filter(|proposal| !proposal.initiated_by_self)
            .map(|proposal| &proposal.item)
            .collect()
    }

    /// Item wins if it was proposed and the argument defending it wins.
    pub fn is_winning(&self, item: &Item) -> bool {
        self.proposal(item)
            .map(ProposalNode::is_winning)
            .unwrap_or(false)
    }

    /// Finds the argument, that supports negotiator's opinion about the item
    /// and can be appended to its branch. Opinion is positive if item is acceptable
    /// among `known_items`.
    ///
    /// Undefended proposals are only ever defended, never attacked.
    pub fn generate_best_argument(
        &self,
        item: &Item,
        preferences: &Preferences,
        known_items: &[Item],
    ) -> Option<Argument> {
        let proposal = self.proposal(item)?;
        let polarity = preferences.is_acceptable(item, known_items);
        let eligible = |rating: Rating| rating.is_positive() == polarity;

        let leaf_criterion = match proposal.leaf() {
            Some(leaf) => Some(leaf.evaluation.criterion),
            None if polarity => None,
            None => return None,
        };

        let mut excluded: Vec<Criterion> = vec![];
        while let Some(criterion) = preferences.best_criterion_except(&excluded) {
            excluded.push(criterion);

            if let Some(leaf_criterion) = leaf_criterion {
                // Remaining criteria are even less important.
                if preferences.is_better_criterion(leaf_criterion, criterion) {
                    return None;
                }
            }

            let rating = match preferences.rating(item, criterion) {
                Some(rating) if eligible(rating) => rating,
                _ => continue,
            };

            let argument = Argument::new(item.clone(), polarity, Evaluation::new(criterion, rating));
            match leaf_criterion {
                None => return Some(argument),
                Some(leaf_criterion) => {
                    let argument =
                        argument.with_comparison(CriterionPreference::new(criterion, leaf_criterion));
                    if proposal.can_add(&argument) {
                        return Some(argument);
                    }
                }
            }
        }
        None
    }
}

impl fmt::Display for NegotiationGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- NEGOTIATION GRAPH ---")?;
        for proposal in &self.proposals {
            let origin = match proposal.initiated_by_self {
                true => "own",
                false => "received",
            };
            writeln!(f, "Proposal: {} ({})", proposal.item.name, origin)?;
            for (depth, node) in proposal.nodes().enumerate() {
                let state = match node.is_winning() {
                    true => "+",
                    false => "-",
                };
                writeln!(
                    f,
                    "{}[{}] {}",
                    "  ".repeat(depth + 1),
                    state,
                    node.argument
                )?;
            }
        }
        write!(f, "-------------------------")
    }
}
