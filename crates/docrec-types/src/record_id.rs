//! Record identities

use docrec_diagnostics::RecordError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Physical identity of a record: cluster and position inside the cluster
///
/// The text form is `#cluster:position`; the leading `#` is optional when
/// parsing. A record that was never stored has the identity `#-1:-1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecordId {
    pub cluster: i16,
    pub position: i64,
}

impl RecordId {
    pub const PREFIX: char = '#';
    pub const SEPARATOR: char = ':';

    /// Identity of a record that has not been assigned a place yet
    pub const NEW: RecordId = RecordId {
        cluster: -1,
        position: -1,
    };

    pub const fn new(cluster: i16, position: i64) -> Self {
        Self { cluster, position }
    }

    pub const fn is_new(&self) -> bool {
        self.position < 0
    }

    /// True when the identity points at a stored record
    pub const fn is_persistent(&self) -> bool {
        self.cluster >= 0 && self.position >= 0
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::NEW
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}{}",
            Self::PREFIX,
            self.cluster,
            Self::SEPARATOR,
            self.position
        )
    }
}

impl FromStr for RecordId {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        let body = text.strip_prefix(Self::PREFIX).unwrap_or(text);
        let invalid = |offset: usize, message: &str| {
            RecordError::malformed_literal(message, s, offset)
        };

        let (cluster, position) = body
            .split_once(Self::SEPARATOR)
            .ok_or_else(|| invalid(0, "record id needs the form #cluster:position"))?;
        let cluster = cluster
            .parse::<i16>()
            .map_err(|_| invalid(0, "invalid cluster id"))?;
        let position = position
            .parse::<i64>()
            .map_err(|_| invalid(text.len() - position.len(), "invalid cluster position"))?;

        Ok(Self { cluster, position })
    }
}
