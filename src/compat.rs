//! Directional compatibility between a creator and a prospective giftee.
//!
//! The check always compares the giftee's favorites against the creator's
//! refusals. `incompatible(a, b)` and `incompatible(b, a)` are independent.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use tracing::debug;

use crate::error::{MatchError, Result};
use crate::participant::Participant;

#[derive(Debug, Clone)]
pub struct Compatibility {
    threshold: f64,
    forced: BTreeMap<String, String>,
}

impl Default for Compatibility {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl Compatibility {
    /// `threshold` is the fraction of favorites that must survive the
    /// creator's refusals; 1.0 tolerates no overlap at all.
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            forced: BTreeMap::new(),
        }
    }

    pub fn with_forced_pairings(mut self, forced: BTreeMap<String, String>) -> Self {
        self.forced = forced;
        self
    }

    /// True when `creator` must not be assigned to make a gift for `giftee`.
    pub fn incompatible(&self, creator: &Participant, giftee: &Participant) -> bool {
        if let Some(target) = self.forced.get(&creator.id) {
            return *target != giftee.id;
        }

        if !self.survives(&giftee.favorite_entities, &creator.refused_entities) {
            return true;
        }
        if !self.survives(&giftee.favorite_pairings, &creator.refused_pairings) {
            return true;
        }
        false
    }

    pub fn compatible(&self, creator: &Participant, giftee: &Participant) -> bool {
        !self.incompatible(creator, giftee)
    }

    fn survives(&self, favorites: &BTreeSet<String>, refusals: &BTreeSet<String>) -> bool {
        let kept = favorites.difference(refusals).count();
        kept as f64 >= favorites.len() as f64 * self.threshold
    }

    /// Rejects forced pairings that can never be satisfied.
    pub fn validate_forced(&self, participants: &[Participant]) -> Result<()> {
        let ids: HashSet<&str> = participants.iter().map(|p| p.id.as_str()).collect();
        let mut targets: HashSet<&str> = HashSet::new();

        for (creator, giftee) in &self.forced {
            for id in [creator, giftee] {
                if !ids.contains(id.as_str()) {
                    return Err(MatchError::Config(format!(
                        "forced pairing {} -> {} names unknown participant '{}'",
                        creator, giftee, id
                    )));
                }
            }
            if creator == giftee {
                return Err(MatchError::Config(format!(
                    "forced pairing makes '{}' create for themselves",
                    creator
                )));
            }
            if !targets.insert(giftee.as_str()) {
                return Err(MatchError::Config(format!(
                    "'{}' is the forced giftee of more than one creator",
                    giftee
                )));
            }
        }
        debug!(forced = self.forced.len(), "Forced pairings validated");
        Ok(())
    }

    /// Checks a finished cycle against every forced pairing.
    pub fn verify_forced(&self, cycle: &[String]) -> Result<()> {
        for (i, creator) in cycle.iter().enumerate() {
            let giftee = &cycle[(i + 1) % cycle.len()];
            if let Some(expected) = self.forced.get(creator) {
                if expected != giftee {
                    return Err(MatchError::ForcedPairingViolated {
                        creator: creator.clone(),
                        expected: expected.clone(),
                        actual: giftee.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}
