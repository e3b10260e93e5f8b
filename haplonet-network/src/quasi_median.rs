//! Quasi-medians: candidate ancestral sequences of a connected triplet.

use crate::distance::hamming;
use color_eyre::eyre::{eyre, Report, Result, WrapErr};
use itertools::Itertools;

/// Maximum number of ambiguous positions that are expanded, at most 3^5 = 243 candidates.
///
/// Positions beyond this bound keep the character of the first sequence. This is lossy: highly
/// divergent triplets lose some candidates, see [`expand`].
pub const MAX_AMBIGUOUS_POSITIONS: usize = 5;

/// Returns the quasi-medians of three equal-length sequences.
///
/// At each position the majority character is taken. Where all three differ the position is
/// ambiguous and every choice among the three characters is enumerated, over at most
/// [`MAX_AMBIGUOUS_POSITIONS`] positions. Candidates are distinct and ordered with the first
/// ambiguous position varying slowest, taking `a`, then `b`, then `c`.
///
/// ## Examples
///
/// No ambiguity, a single quasi-median.
///
/// ```rust
/// use haplonet_network::quasi_median::quasi_medians;
/// assert_eq!(quasi_medians("TAAA", "ATAA", "AATA")?, ["AAAA"]);
/// # Ok::<(), color_eyre::eyre::Report>(())
/// ```
///
/// One ambiguous position, three candidates.
///
/// ```rust
/// # use haplonet_network::quasi_median::quasi_medians;
/// assert_eq!(quasi_medians("AAC", "AAG", "AAT")?, ["AAC", "AAG", "AAT"]);
/// # Ok::<(), color_eyre::eyre::Report>(())
/// ```
pub fn quasi_medians(a: &str, b: &str, c: &str) -> Result<Vec<String>, Report> {
    Ok(expand(a, b, c)?.0)
}

/// Returns the quasi-medians of three equal-length sequences, and the number of ambiguous positions
/// that were not expanded because of [`MAX_AMBIGUOUS_POSITIONS`].
///
/// ```rust
/// use haplonet_network::quasi_median::expand;
/// let (medians, truncated) = expand("ACGTAC", "CGTACG", "GTACGT")?;
/// assert_eq!(medians.len(), 243);
/// assert_eq!(truncated, 1);
/// # Ok::<(), color_eyre::eyre::Report>(())
/// ```
pub fn expand(a: &str, b: &str, c: &str) -> Result<(Vec<String>, usize), Report> {
    if a.len() != b.len() || a.len() != c.len() {
        return Err(eyre!(
            "Invalid input: quasi-median sequences are different lengths ({}, {}, {}).",
            a.len(),
            b.len(),
            c.len()
        ));
    }

    let mut consensus = Vec::with_capacity(a.len());
    let mut ambiguous = Vec::new();

    for (i, ((x, y), z)) in a.bytes().zip(b.bytes()).zip(c.bytes()).enumerate() {
        match (x, y, z) {
            (x, y, z) if x == y || x == z => consensus.push(x),
            (_, y, z) if y == z => consensus.push(y),
            (x, y, z) => {
                consensus.push(x);
                ambiguous.push((i, [x, y, z]));
            }
        }
    }

    let truncated = ambiguous.len().saturating_sub(MAX_AMBIGUOUS_POSITIONS);
    ambiguous.truncate(MAX_AMBIGUOUS_POSITIONS);

    if ambiguous.is_empty() {
        let median = String::from_utf8(consensus).wrap_err("Quasi-median is not valid UTF-8.")?;
        return Ok((vec![median], truncated));
    }

    // every combination of choices, first position varying slowest
    let medians = ambiguous
        .iter()
        .map(|(_, choices)| choices.iter().copied())
        .multi_cartesian_product()
        .map(|combination| {
            let mut median = consensus.clone();
            ambiguous.iter().zip(combination).for_each(|((i, _), base)| median[*i] = base);
            String::from_utf8(median).wrap_err("Quasi-median is not valid UTF-8.")
        })
        .collect::<Result<Vec<_>, Report>>()?;

    Ok((medians, truncated))
}

/// Returns the reconstruction cost of a candidate median: its total distance to `a`, `b` and `c`.
///
/// Lower cost indicates a more parsimonious ancestor.
///
/// ```rust
/// use haplonet_network::quasi_median::median_cost;
/// assert_eq!(median_cost("TAAA", "ATAA", "AATA", "AAAA")?, 3);
/// # Ok::<(), color_eyre::eyre::Report>(())
/// ```
pub fn median_cost(a: &str, b: &str, c: &str, candidate: &str) -> Result<usize, Report> {
    Ok(hamming(a, candidate)? + hamming(b, candidate)? + hamming(c, candidate)?)
}

#[cfg(test)]
mod tests;
