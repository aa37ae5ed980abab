//! Families: named groups of entities that survey answers refer to as a unit.
//!
//! `"monkey d."` can mean every member of the family, while
//! `"monkey d. luffy"` is just `luffy`.

use std::collections::{BTreeMap, BTreeSet};

use serde::Deserialize;

use super::{regularize, PAIRING_DELIMITER};

#[derive(Debug, Clone, Deserialize)]
pub struct Family {
    pub members: BTreeSet<String>,
    #[serde(default)]
    pub misspellings: BTreeSet<String>,
    /// Separator used instead of a space in "<name><joiner><member>".
    /// Must survive delimiter regularization, so `-`, `;`, `&`, `/`, `,`
    /// and the like are rejected at config load.
    pub joiner: Option<String>,
}

impl Family {
    /// True when `joiner` would reach family lookup unchanged.
    pub fn joiner_is_usable(&self) -> bool {
        let Some(ref sep) = self.joiner else {
            return true;
        };
        let joined = format!("a{sep}b");
        !sep.is_empty()
            && !sep.contains([',', PAIRING_DELIMITER])
            && *sep == sep.to_lowercase()
            && regularize(&joined) == joined
    }

    fn names_member(&self, name: &str, member: &str, component: &str) -> bool {
        if format!("{name} {member}") == component {
            return true;
        }
        match self.joiner {
            Some(ref sep) => format!("{name}{sep}{member}") == component,
            None => false,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Families(BTreeMap<String, Family>);

impl Families {
    pub fn new(families: BTreeMap<String, Family>) -> Self {
        Self(families)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Resolves one component: a family name expands to all members, a
    /// qualified member name collapses to the member, anything else is
    /// returned unchanged.
    pub fn resolve(&self, component: &str) -> Vec<String> {
        if let Some(members) = self.expand(component) {
            return members;
        }
        vec![self.canonicalize(component).unwrap_or(component).to_string()]
    }

    fn expand(&self, component: &str) -> Option<Vec<String>> {
        self.0.iter().find_map(|(name, family)| {
            if name == component || family.misspellings.contains(component) {
                Some(family.members.iter().cloned().collect())
            } else {
                None
            }
        })
    }

    fn canonicalize<'a>(&'a self, component: &str) -> Option<&'a str> {
        self.0.iter().find_map(|(name, family)| {
            family.members.iter().find_map(|member| {
                let qualified = std::iter::once(name.as_str())
                    .chain(family.misspellings.iter().map(String::as_str))
                    .any(|prefix| family.names_member(prefix, member, component));
                qualified.then_some(member.as_str())
            })
        })
    }
}
