//! Trait applicability resolution
//!
//! Filters the rubric's trait list down to the traits relevant to one track.
//! Output order is the rubric's declared order; it defines wizard navigation
//! and the "Trait N of M" numbering shown to the interviewer.

use crate::rubric::{Rubric, Trait};

/// Traits whose `applicable_tracks` contains `"all"` or `track_key`
pub fn traits_for_track<'a>(rubric: &'a Rubric, track_key: &str) -> Vec<&'a Trait> {
    rubric
        .traits
        .iter()
        .filter(|t| t.applies_to(track_key))
        .collect()
}

/// Ids of [`traits_for_track`], same order
pub fn trait_ids_for_track(rubric: &Rubric, track_key: &str) -> Vec<String> {
    traits_for_track(rubric, track_key)
        .into_iter()
        .map(|t| t.id.clone())
        .collect()
}
