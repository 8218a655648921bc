use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of an event in the catalog's universe.
///
/// Ids are dense: a catalog with `n` events owns ids `0..n`. Ids beyond the
/// universe can still arrive over the wire from a newer publisher.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(u16);

impl EventId {
    pub const fn new(raw: u16) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u16 {
        self.0
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl From<u16> for EventId {
    fn from(raw: u16) -> Self {
        Self(raw)
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
