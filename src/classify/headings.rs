//! Picking one resolvable code out of a list of potential headings.

use super::model::PotentialHeading;

/// Chooses the heading to resolve a stalled or headings-only response.
///
/// Prefers the first heading whose code does not end in the wildcard `x`,
/// since the Schedule B lookup cannot resolve wildcard codes. Falls back to
/// the first heading when every candidate is a wildcard.
#[must_use]
pub fn select_heading(headings: &[PotentialHeading]) -> Option<&PotentialHeading> {
    headings
        .iter()
        .find(|heading| !heading.code.is_empty() && !heading.code.ends_with('x'))
        .or_else(|| headings.first())
}
