use serde::{Deserialize, Serialize};
use std::fmt;

use crate::catalog::{Criterion, Rating};
use crate::error::Error;
use crate::item::Item;

const CONCLUSION_SEPARATOR: &str = " <= ";
const PREMISES_SEPARATOR: &str = ", ";
const NEGATION: &str = "not ";

/// Evaluative premise: rating of the argued item on a criterion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    pub criterion: Criterion,
    pub rating: Rating,
}

/// Comparative premise: `superior` criterion matters more than `inferior`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriterionPreference {
    pub superior: Criterion,
    pub inferior: Criterion,
}

/// Claim for (`polarity == true`) or against an item, justified by
/// its rating on a criterion and optionally by a criteria comparison.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Argument {
    pub item: Item,
    pub polarity: bool,
    pub evaluation: Evaluation,
    pub comparison: Option<CriterionPreference>,
}

impl Evaluation {
    pub fn new(criterion: Criterion, rating: Rating) -> Evaluation {
        Evaluation { criterion, rating }
    }
}

impl CriterionPreference {
    pub fn new(superior: Criterion, inferior: Criterion) -> CriterionPreference {
        CriterionPreference { superior, inferior }
    }
}

impl Argument {
    pub fn new(item: Item, polarity: bool, evaluation: Evaluation) -> Argument {
        Argument {
            item,
            polarity,
            evaluation,
            comparison: None,
        }
    }

    pub fn with_comparison(mut self, comparison: CriterionPreference) -> Argument {
        self.comparison = Some(comparison);
        self
    }

    /// Argument without comparative premise is never stronger. Otherwise
    /// it can't rely on a criterion, that was already used as inferior one
    /// by the other argument.
    pub fn is_stronger_than(&self, other: &Argument) -> bool {
        let own = match &self.comparison {
            Some(comparison) => comparison,
            None => return false,
        };
        match &other.comparison {
            Some(theirs) => theirs.inferior != own.superior,
            None => true,
        }
    }

    /// Argument attacks the other one, if it claims that its own criterion
    /// is more important than the criterion the other argument relies on.
    pub fn attacks(&self, other: &Argument) -> bool {
        let comparison = match &self.comparison {
            Some(comparison) => comparison,
            None => return false,
        };
        comparison.superior == self.evaluation.criterion
            && other.evaluation.criterion != self.evaluation.criterion
            && other.evaluation.criterion == comparison.inferior
    }

    /// Parses `["not "]ItemName <= Criterion=Rating[, Superior > Inferior]`.
    /// Item must be one of `items`.
    pub fn parse(payload: &str, items: &[Item]) -> Result<Argument, Error> {
        let parts = payload.split(CONCLUSION_SEPARATOR).collect::<Vec<_>>();
        if parts.len() != 2 {
            return Err(Error::malformed(
                payload,
                format!("expected single '{}'", CONCLUSION_SEPARATOR.trim()),
            ));
        }

        let (polarity, name) = match parts[0].strip_prefix(NEGATION) {
            Some(name) => (false, name),
            None => (true, parts[0]),
        };
        let item = Item::find(items, name.trim())?.clone();

        let premises = parts[1].split(PREMISES_SEPARATOR).collect::<Vec<_>>();
        let (evaluation, comparison) = match premises.as_slice() {
            [evaluation] => (parse_evaluation(payload, evaluation)?, None),
            [evaluation, comparison] => (
                parse_evaluation(payload, evaluation)?,
                Some(parse_comparison(payload, comparison)?),
            ),
            _ => return Err(Error::malformed(payload, "expected one or two premises")),
        };

        Ok(Argument {
            item,
            polarity,
            evaluation,
            comparison,
        })
    }
}

fn parse_evaluation(payload: &str, premise: &str) -> Result<Evaluation, Error> {
    let (criterion, rating) = premise
        .split_once('=')
        .ok_or_else(|| Error::malformed(payload, "expected 'Criterion=Rating' premise"))?;
    Ok(Evaluation::new(
        criterion.trim().parse()?,
        rating.trim().parse()?,
    ))
}

fn parse_comparison(payload: &str, premise: &str) -> Result<CriterionPreference, Error> {
    let (superior, inferior) = premise
        .split_once('>')
        .ok_or_else(|| Error::malformed(payload, "expected 'Criterion > Criterion' premise"))?;
    Ok(CriterionPreference::new(
        superior.trim().parse()?,
        inferior.trim().parse()?,
    ))
}

impl fmt::Display for Evaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.criterion, self.rating)
    }
}

impl fmt::Display for CriterionPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} > {}", self.superior, self.inferior)
    }
}

impl fmt::Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.polarity {
            f.write_str(NEGATION)?;
        }
        write!(
            f,
            "{}{}{}",
            self.item.name, CONCLUSION_SEPARATOR, self.evaluation
        )?;
        if let Some(comparison) = &self.comparison {
            write!(f, "{}{}", PREMISES_SEPARATOR, comparison)?;
        }
        Ok(())
    }
}
