//! Line oriented catalog and preference files.
//!
//! Catalog file contains one `Name;Description` record per line.
//! Preference file looks like this:
//! ```text
//! # comment
//! Power > Cost > Noise
//! ICED: Power=VERY_GOOD, Cost=GOOD, Noise=BAD
//! E: Power=GOOD, Cost=BAD, Noise=VERY_GOOD
//! ```
use std::fs;
use std::path::Path;

use crate::catalog::{Criterion, Rating};
use crate::error::{LineError, LoadError};
use crate::item::Item;
use crate::preferences::{CriterionRating, Preferences};

pub fn load_catalog(path: impl AsRef<Path>) -> Result<Vec<Item>, LoadError> {
    parse_catalog(&read(path.as_ref())?)
}

pub fn load_preferences(path: impl AsRef<Path>, items: &[Item]) -> Result<Preferences, LoadError> {
    parse_preferences(&read(path.as_ref())?, items)
}

fn read(path: &Path) -> Result<String, LoadError> {
    fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn meaningful_lines(content: &str) -> impl Iterator<Item = (usize, &str)> {
    content
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
}

pub fn parse_catalog(content: &str) -> Result<Vec<Item>, LoadError> {
    meaningful_lines(content)
        .map(|(line, record)| {
            Item::parse(record).map_err(|_| LoadError::line(line, LineError::CatalogSyntax))
        })
        .collect()
}

pub fn parse_preferences(content: &str, items: &[Item]) -> Result<Preferences, LoadError> {
    let mut criteria: Vec<Criterion> = vec![];
    let mut ratings: Vec<CriterionRating> = vec![];

    for (line, text) in meaningful_lines(content) {
        if text.contains('>') {
            parse_criteria_order(text, &mut criteria).map_err(|e| LoadError::line(line, e))?;
        } else {
            let item_ratings =
                parse_item_ratings(text, items, &criteria).map_err(|e| LoadError::line(line, e))?;
            ratings.extend(item_ratings);
        }
    }

    Ok(Preferences::new(criteria, ratings))
}

fn parse_criteria_order(text: &str, criteria: &mut Vec<Criterion>) -> Result<(), LineError> {
    for token in text.split('>').map(str::trim) {
        let criterion = token
            .parse::<Criterion>()
            .map_err(|_| LineError::UnknownCriterion(token.to_string()))?;

        if criteria.contains(&criterion) {
            return Err(LineError::RankedTwice(token.to_string()));
        }
        criteria.push(criterion);
    }
    Ok(())
}

fn parse_item_ratings(
    text: &str,
    items: &[Item],
    criteria: &[Criterion],
) -> Result<Vec<CriterionRating>, LineError> {
    let (name, values) = text.split_once(':').ok_or(LineError::ItemSyntax)?;
    let name = name.trim();
    let item = Item::find(items, name).map_err(|_| LineError::UnknownItem(name.to_string()))?;

    let values = values.split(',').map(str::trim).collect::<Vec<_>>();
    let expected = criteria.len();
    if values.len() != expected {
        return Err(LineError::WrongRatingCount {
            item: name.to_string(),
            expected,
            found: values.len(),
        });
    }

    let mut ratings: Vec<CriterionRating> = Vec::with_capacity(values.len());
    for (idx, value) in values.into_iter().enumerate() {
        let (criterion, rating) = value.split_once('=').ok_or(LineError::RatingSyntax {
            item: name.to_string(),
            position: idx + 1,
        })?;
        let (criterion, rating) = (criterion.trim(), rating.trim());

        let criterion =
            criterion
                .parse::<Criterion>()
                .map_err(|_| LineError::UnknownItemCriterion {
                    item: name.to_string(),
                    criterion: criterion.to_string(),
                })?;
        if !criteria.contains(&criterion) {
            return Err(LineError::UnrankedCriterion {
                item: name.to_string(),
                criterion: criterion.to_string(),
            });
        }
        if ratings.iter().any(|fact| fact.criterion == criterion) {
            return Err(LineError::GradedTwice {
                item: name.to_string(),
                criterion: criterion.to_string(),
            });
        }

        let rating = rating
            .parse::<Rating>()
            .map_err(|_| LineError::UnknownRating {
                item: name.to_string(),
                value: rating.to_string(),
            })?;
        ratings.push(CriterionRating::new(item.clone(), criterion, rating));
    }
    Ok(ratings)
}
