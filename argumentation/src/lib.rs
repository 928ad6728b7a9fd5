pub mod argument;
pub mod catalog;
mod error;
pub mod graph;
pub mod item;
pub mod loader;
pub mod preferences;

pub use argument::{Argument, CriterionPreference, Evaluation};
pub use catalog::{Criterion, Rating};
pub use error::{Error, LineError, LoadError};
pub use graph::{ArgumentNode, NegotiationGraph, ProposalNode};
pub use item::Item;
pub use loader::{load_catalog, load_preferences, parse_catalog, parse_preferences};
pub use preferences::{CriterionRating, Preferences};
