use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::error::Error;

/// Item that needs to be negotiated.
///
/// Items are identified by name only: two items with the same name and
/// different descriptions are the same item.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    pub description: String,
}

impl Item {
    pub fn new(name: impl ToString, description: impl ToString) -> Item {
        Item {
            name: name.to_string(),
            description: description.to_string(),
        }
    }

    /// Parses single `Name;Description` record.
    pub fn parse(record: &str) -> Result<Item, Error> {
        let (name, description) = record
            .split_once(';')
            .ok_or_else(|| Error::malformed(record, "expected `Name;Description` record"))?;

        if name.is_empty() {
            return Err(Error::malformed(record, "item name is empty"));
        }
        Ok(Item::new(name, description))
    }

    /// Parses item list in format: `ItemName;ItemDescription|OtherItem;OtherDescription|...`
    /// Empty payload is an empty list.
    pub fn parse_list(content: &str) -> Result<Vec<Item>, Error> {
        if content.is_empty() {
            return Ok(vec![]);
        }
        content.split('|').map(Item::parse).collect()
    }

    pub fn format_list(items: &[Item]) -> String {
        items
            .iter()
            .map(|item| item.to_string())
            .collect::<Vec<_>>()
            .join("|")
    }

    pub fn find<'a>(items: &'a [Item], name: &str) -> Result<&'a Item, Error> {
        items
            .iter()
            .find(|item| item.name == name)
            .ok_or_else(|| Error::UnknownItem(name.to_string()))
    }
}

impl PartialEq for Item {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Item {}

impl Hash for Item {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state)
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{};{}", self.name, self.description)
    }
}
