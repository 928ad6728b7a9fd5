use std::path::PathBuf;

/// Errors raised while interpreting negotiation payloads or mutating the graph.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Item '{0}' is not known")]
    UnknownItem(String),
    #[error("Criterion '{0}' is not known")]
    UnknownCriterion(String),
    #[error("Rating '{0}' is not known")]
    UnknownRating(String),
    #[error("Malformed payload '{payload}': {reason}")]
    Malformed { payload: String, reason: String },
    #[error("Argument '{0}' can't be added to its branch")]
    Rejected(String),
    #[error("Item '{0}' was never proposed")]
    UnknownProposal(String),
    #[error("Item '{0}' was already proposed")]
    DuplicateProposal(String),
}

impl Error {
    pub fn malformed(payload: &str, reason: impl ToString) -> Error {
        Error::Malformed {
            payload: payload.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Problem found on a single line of a catalog or preference file.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum LineError {
    #[error("criterion \"{0}\" was not recognized")]
    UnknownCriterion(String),
    #[error("criterion \"{0}\" was ranked twice")]
    RankedTwice(String),
    #[error("item \"{0}\" was not recognized")]
    UnknownItem(String),
    #[error("criterion \"{criterion}\" in item \"{item}\" was not recognized")]
    UnknownItemCriterion { item: String, criterion: String },
    #[error("criterion \"{criterion}\" in item \"{item}\" isn't ranked")]
    UnrankedCriterion { item: String, criterion: String },
    #[error("criterion \"{criterion}\" in item \"{item}\" was graded twice")]
    GradedTwice { item: String, criterion: String },
    #[error("value \"{value}\" in item \"{item}\" was not recognized")]
    UnknownRating { item: String, value: String },
    #[error("item \"{item}\" has {found} criterion values, expected {expected}")]
    WrongRatingCount {
        item: String,
        expected: usize,
        found: usize,
    },
    #[error("item \"{item}\" has a syntax error at criterion value {position}")]
    RatingSyntax { item: String, position: usize },
    #[error("didn't find \"ItemName: Crit=VALUE,...\" format")]
    ItemSyntax,
    #[error("didn't find \"ItemName;Description\" format")]
    CatalogSyntax,
}

#[derive(thiserror::Error, Debug)]
pub enum LoadError {
    #[error("Failed to read '{}'. {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Line {line}: {reason}")]
    Line { line: usize, reason: LineError },
}

impl LoadError {
    pub fn line(line: usize, reason: LineError) -> LoadError {
        LoadError::Line { line, reason }
    }

    /// Line number of the offending line, if the error comes from file content.
    pub fn line_number(&self) -> Option<usize> {
        match self {
            LoadError::Line { line, .. } => Some(*line),
            LoadError::Io { .. } => None,
        }
    }
}
