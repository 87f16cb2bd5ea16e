//! Multi-criteria ordering of documents by field paths

use crate::resolver::PathResolver;
use docrec_diagnostics::{RecordError, Result};
use docrec_types::{Document, Value, compare_values};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl FromStr for Direction {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(RecordError::config(format!(
                "unknown sort direction '{other}', expected ASC or DESC"
            ))),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Asc => f.write_str("ASC"),
            Self::Desc => f.write_str("DESC"),
        }
    }
}

/// One sort criterion: a path and a direction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub path: String,
    pub direction: Direction,
}

impl OrderBy {
    pub fn new(path: impl Into<String>, direction: Direction) -> Self {
        Self {
            path: path.into(),
            direction,
        }
    }

    pub fn asc(path: impl Into<String>) -> Self {
        Self::new(path, Direction::Asc)
    }

    pub fn desc(path: impl Into<String>) -> Self {
        Self::new(path, Direction::Desc)
    }
}

/// Parses `path` or `path ASC|DESC`
impl FromStr for OrderBy {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        match s.rsplit_once(char::is_whitespace) {
            Some((path, direction)) => Ok(Self::new(path.trim(), direction.parse()?)),
            None => Ok(Self::asc(s)),
        }
    }
}

impl PathResolver<'_, '_> {
    /// Sort documents in place by each criterion in turn
    ///
    /// Sort keys are resolved up front; a path error aborts the sort and
    /// leaves the slice untouched. Null keys come first in either direction.
    /// Equal keys keep their original order.
    pub fn sort_documents(&self, documents: &mut [Document], criteria: &[OrderBy]) -> Result<()> {
        if criteria.is_empty() || documents.len() < 2 {
            return Ok(());
        }

        let keys = documents
            .iter()
            .map(|document| {
                criteria
                    .iter()
                    .map(|criterion| self.resolve(document, &criterion.path))
                    .collect::<Result<Vec<_>>>()
            })
            .collect::<Result<Vec<_>>>()?;

        let mut order: Vec<usize> = (0..documents.len()).collect();
        order.sort_by(|&a, &b| compare_keys(&keys[a], &keys[b], criteria));

        let sorted: Vec<Document> = order
            .iter()
            .map(|&index| std::mem::take(&mut documents[index]))
            .collect();
        for (slot, document) in documents.iter_mut().zip(sorted) {
            *slot = document;
        }
        Ok(())
    }
}

fn compare_keys(a: &[Value], b: &[Value], criteria: &[OrderBy]) -> Ordering {
    a.iter()
        .zip(b)
        .zip(criteria)
        .map(|((a, b), criterion)| match (a.is_null(), b.is_null()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            (false, false) => {
                let ordering = compare_values(a, b).unwrap_or(Ordering::Equal);
                match criterion.direction {
                    Direction::Asc => ordering,
                    Direction::Desc => ordering.reverse(),
                }
            }
        })
        .find(|ordering| ordering.is_ne())
        .unwrap_or(Ordering::Equal)
}

/// Sort without a record loader
pub fn sort_documents(documents: &mut [Document], criteria: &[OrderBy]) -> Result<()> {
    PathResolver::default().sort_documents(documents, criteria)
}
