//! Survey-wide tallies used to curate the alias table and spot resubmissions.

use std::collections::BTreeMap;

use crate::participant::Participant;

/// Token counts sorted by ascending count, then token.
pub type Frequencies = Vec<(String, u32)>;

/// How often each entity is named, favorites and refusals together.
pub fn entity_frequencies(participants: &[Participant]) -> Frequencies {
    tally(
        participants
            .iter()
            .flat_map(|p| p.favorite_entities.iter().chain(&p.refused_entities)),
    )
}

/// How often each pairing is named, favorites and refusals together.
pub fn pairing_frequencies(participants: &[Participant]) -> Frequencies {
    tally(
        participants
            .iter()
            .flat_map(|p| p.favorite_pairings.iter().chain(&p.refused_pairings)),
    )
}

/// Ids submitted more than once, with their counts.
pub fn duplicate_ids<'a, I>(ids: I) -> Frequencies
where
    I: IntoIterator<Item = &'a str>,
{
    tally(ids)
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .collect()
}

fn tally<'a, I, S>(tokens: I) -> Frequencies
where
    I: IntoIterator<Item = &'a S>,
    S: AsRef<str> + ?Sized + 'a,
{
    let mut counts = BTreeMap::<String, u32>::new();
    for token in tokens {
        *counts.entry(token.as_ref().to_string()).or_default() += 1;
    }
    let mut counts: Vec<_> = counts.into_iter().collect();
    counts.sort_by(|a, b| a.1.cmp(&b.1));
    counts
}
