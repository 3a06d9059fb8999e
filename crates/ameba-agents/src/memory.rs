//! Stimulus memory.
//!
//! Each organism keeps one opinion in `[-1, 1]` per stimulus tag it has
//! experienced. A missing entry means the tag is unknown, which behavior
//! treats differently from a known opinion of zero.
//!
//! [`Memory::learn`] is the only mutator. It reduces the outcome to a
//! unit signal and moves the opinion halfway toward that signal.

use std::collections::BTreeMap;

use ameba_types::Stimulus;
use serde::{Deserialize, Serialize};

/// Signal used when an outcome carries no sign.
pub const CURIOSITY_DECAY_SIGNAL: f64 = 0.1;

/// Learned opinions keyed by stimulus.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Memory {
    opinions: BTreeMap<Stimulus, f64>,
}

impl Memory {
    /// An empty memory: every tag unknown.
    pub const fn new() -> Self {
        Self {
            opinions: BTreeMap::new(),
        }
    }

    /// The memory a generation-zero organism is born with.
    ///
    /// Other organisms are known but carry no opinion yet.
    pub fn innate() -> Self {
        let mut opinions = BTreeMap::new();
        opinions.insert(Stimulus::Organism, 0.0);
        Self { opinions }
    }

    /// Whether `tag` has never been learned.
    pub fn is_unknown(&self, tag: Stimulus) -> bool {
        !self.opinions.contains_key(&tag)
    }

    /// Stored opinion for `tag`, zero when unknown.
    ///
    /// Callers that need to treat unknown tags differently must check
    /// [`is_unknown`](Self::is_unknown) first.
    pub fn opinion(&self, tag: Stimulus) -> f64 {
        self.opinions.get(&tag).copied().unwrap_or(0.0)
    }

    /// Record an outcome for `tag` and return the new opinion.
    pub fn learn(&mut self, tag: Stimulus, signed_delta: f64) -> f64 {
        let signal = unit_signal(signed_delta);
        let updated = match self.opinions.get(&tag) {
            None => signal,
            Some(old) => (old + signal) * 0.5,
        }
        .clamp(-1.0, 1.0);
        self.opinions.insert(tag, updated);
        updated
    }

    /// Number of known tags.
    pub fn len(&self) -> usize {
        self.opinions.len()
    }

    /// Whether no tag is known.
    pub fn is_empty(&self) -> bool {
        self.opinions.is_empty()
    }

    /// Opinions in tag order.
    pub fn iter(&self) -> impl Iterator<Item = (Stimulus, f64)> + '_ {
        self.opinions.iter().map(|(tag, opinion)| (*tag, *opinion))
    }

    /// A copy of the opinion map, for snapshots.
    pub fn to_map(&self) -> BTreeMap<Stimulus, f64> {
        self.opinions.clone()
    }
}

/// Reduce a signed outcome to `+1`, `-1` or the curiosity decay signal.
pub fn unit_signal(signed_delta: f64) -> f64 {
    if signed_delta > 0.0 {
        1.0
    } else if signed_delta < 0.0 {
        -1.0
    } else {
        CURIOSITY_DECAY_SIGNAL
    }
}
