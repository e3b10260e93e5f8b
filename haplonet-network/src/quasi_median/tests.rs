use crate::quasi_median::{expand, median_cost, quasi_medians, MAX_AMBIGUOUS_POSITIONS};
use color_eyre::eyre::{Report, Result};
use itertools::Itertools;

#[test]
fn majority_per_position() -> Result<(), Report> {
    assert_eq!(quasi_medians("ACGT", "ACGA", "TCGT")?, ["ACGT"]);
    // identical inputs are their own median
    assert_eq!(quasi_medians("GATT", "GATT", "GATT")?, ["GATT"]);
    Ok(())
}

#[test]
fn two_ambiguous_positions() -> Result<(), Report> {
    let observed = quasi_medians("AC", "GT", "TA")?;
    let expected = ["AC", "AT", "AA", "GC", "GT", "GA", "TC", "TT", "TA"];
    assert_eq!(observed, expected);
    Ok(())
}

#[test]
fn ambiguous_positions_capped() -> Result<(), Report> {
    // seven positions where all three differ
    let (a, b, c) = ("AAAAAAA", "CCCCCCC", "GGGGGGG");
    let observed = quasi_medians(a, b, c)?;
    assert_eq!(observed.len(), 3usize.pow(MAX_AMBIGUOUS_POSITIONS as u32));
    assert_eq!(observed.iter().unique().count(), observed.len());
    // positions past the cap keep the first sequence
    assert!(observed.iter().all(|median| median.ends_with("AA")));
    assert_eq!(observed[0], a);
    Ok(())
}

#[test]
fn truncated_positions_reported() -> Result<(), Report> {
    let (medians, truncated) = expand("AAAAAAA", "CCCCCCC", "GGGGGGG")?;
    assert_eq!(truncated, 2);
    assert_eq!(medians, quasi_medians("AAAAAAA", "CCCCCCC", "GGGGGGG")?);

    let (medians, truncated) = expand("AC", "GT", "TA")?;
    assert_eq!((medians.len(), truncated), (9, 0));
    Ok(())
}

#[test]
fn unequal_lengths() {
    assert!(quasi_medians("AAA", "AA", "AAA").is_err());
    assert!(median_cost("AAA", "AAA", "AAA", "AA").is_err());
}

#[test]
fn cost_of_candidates() -> Result<(), Report> {
    let (a, b, c) = ("AAC", "AAG", "AAT");
    let costs = quasi_medians(a, b, c)?
        .iter()
        .map(|median| median_cost(a, b, c, median))
        .collect::<Result<Vec<_>, Report>>()?;
    assert_eq!(costs, vec![2, 2, 2]);
    // a non-median is never cheaper
    assert_eq!(median_cost(a, b, c, "TTT")?, 8);
    Ok(())
}

#[test]
fn empty_sequences() -> Result<(), Report> {
    assert_eq!(quasi_medians("", "", "")?, [""]);
    Ok(())
}
