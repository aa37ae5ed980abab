//! Survey text normalization.
//!
//! Turns free-form answers such as `"Zoro x Sanji; Trafalgar Law (mostly)"`
//! into canonical tokens (`zoro/sanji`, `law`) so preferences from different
//! participants can be compared with plain string equality.

pub mod aliases;
pub mod families;

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;

pub use aliases::{Alias, AliasTable, ALIAS_TABLE_VERSION};
pub use families::{Families, Family};

/// Joins the components of a pairing token.
pub const PAIRING_DELIMITER: char = '/';

static PARENTHETICAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\(.*\)").expect("parenthetical pattern is valid"));

/// Normalizes raw survey fields into canonical entity and pairing tokens.
#[derive(Debug, Clone)]
pub struct Normalizer {
    aliases: AliasTable,
    families: Families,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(AliasTable::builtin().clone(), Families::default())
    }
}

impl Normalizer {
    pub fn new(aliases: AliasTable, families: Families) -> Self {
        Self { aliases, families }
    }

    /// Canonical tokens in the order they appear, duplicates kept.
    pub fn normalize(&self, raw: &str) -> Vec<String> {
        let mut tokens = Vec::new();

        for item in regularize(&raw.to_lowercase()).split(',') {
            let item = item.trim();
            if item.is_empty() {
                continue;
            }

            let (item, aliased) = match self.aliases.lookup(item) {
                Alias::Empty => continue,
                Alias::Unknown => (item.to_string(), false),
                Alias::Canonical(canonical) => (canonical.to_string(), true),
            };

            if item.contains(PAIRING_DELIMITER) {
                tokens.extend(self.pairings(&item));
            } else if aliased {
                tokens.push(item);
            } else {
                tokens.extend(self.families.resolve(&item));
            }
        }

        tokens.retain(|t| !t.is_empty());
        tokens
    }

    /// Same as [`Normalizer::normalize`], collapsed to a set.
    pub fn normalize_set(&self, raw: &str) -> BTreeSet<String> {
        self.normalize(raw).into_iter().collect()
    }

    /// Resolves one pairing component to its alternatives.
    fn resolve_component(&self, component: &str) -> Vec<String> {
        match self.aliases.lookup(component) {
            Alias::Empty => Vec::new(),
            Alias::Canonical(canonical) => vec![canonical.to_string()],
            Alias::Unknown => self.families.resolve(component),
        }
    }

    fn pairings(&self, item: &str) -> Vec<String> {
        let mut groups: Vec<Vec<String>> = Vec::new();

        for component in item.split(PAIRING_DELIMITER).map(str::trim) {
            if component.is_empty() {
                continue;
            }
            let alternatives = self.resolve_component(component);
            // A component alias can itself be a pairing ("zosan/nami").
            if let [single] = alternatives.as_slice() {
                if single.contains(PAIRING_DELIMITER) {
                    groups.extend(
                        single
                            .split(PAIRING_DELIMITER)
                            .map(str::trim)
                            .filter(|part| !part.is_empty())
                            .map(|part| vec![part.to_string()]),
                    );
                    continue;
                }
            }
            if !alternatives.is_empty() {
                groups.push(alternatives);
            }
        }

        if groups.is_empty() {
            return Vec::new();
        }

        combinations(&groups)
            .into_iter()
            .map(|mut members| {
                members.sort();
                members.join("/")
            })
            .collect()
    }
}

/// Strips asides and maps the many delimiter styles onto `,` and `/`.
/// Expects lowercased input.
pub(crate) fn regularize(raw: &str) -> String {
    PARENTHETICAL
        .replace_all(raw, "")
        .replace("x drake", "xdrake")
        .replace(['-', ';'], ",")
        .replace(['?', '!'], "")
        .replace(" x ", "/")
        .replace('&', "/")
        .replace(" / ", "/")
        .replace('\\', "/")
}

/// Cartesian product over per-component alternatives.
fn combinations(groups: &[Vec<String>]) -> Vec<Vec<String>> {
    groups.iter().fold(vec![Vec::new()], |acc, group| {
        acc.iter()
            .flat_map(|prefix| {
                group.iter().map(move |member| {
                    let mut next = prefix.clone();
                    next.push(member.clone());
                    next
                })
            })
            .collect()
    })
}
