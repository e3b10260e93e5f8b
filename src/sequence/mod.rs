//! Read aligned sequences from FASTA and collapse them into [`Haplotype`]s.

use color_eyre::eyre::{eyre, Report, Result, WrapErr};
use color_eyre::Help;
use haplonet_network::Haplotype;
use itertools::Itertools;
use log::{debug, info, warn};
use noodles::fasta;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Debug;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Characters allowed in an aligned sequence.
pub const ALPHABET: [u8; 6] = [b'A', b'C', b'G', b'T', b'N', b'-'];

/// Characters that make a position uninformative.
pub const AMBIGUOUS: [u8; 2] = [b'N', b'-'];

// ----------------------------------------------------------------------------
// Record
// ----------------------------------------------------------------------------

/// An aligned sequence record.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct Record {
    /// Full definition line, without the leading `>`.
    pub name: String,
    /// Upper-cased sequence.
    pub sequence: String,
}

impl Record {
    /// Create a [`Record`] from a [`noodles`] [`fasta::Record`].
    pub fn from_fasta(record: &fasta::Record) -> Result<Self, Report> {
        let name = match record.description() {
            Some(description) => format!("{} {description}", record.name()),
            None => record.name().to_string(),
        };
        let sequence = record.sequence().as_ref().iter().copied().filter(|b| !b.is_ascii_whitespace());
        let sequence = String::from_utf8(sequence.collect())
            .wrap_err_with(|| format!("Invalid input: {name} is not valid UTF-8."))?
            .to_uppercase();

        Ok(Record { name, sequence })
    }
}

// ----------------------------------------------------------------------------
// Reading
// ----------------------------------------------------------------------------

/// Returns the validated records of a FASTA alignment.
///
/// ## Examples
///
/// ```rust
/// use haplonet::sequence;
/// use indoc::indoc;
///
/// let fasta = indoc! {"
///     >sample1 Brazil
///     acgt
///     >sample2
///     AC
///     GA
/// "};
/// let records = sequence::parse_fasta(fasta.as_bytes())?;
/// assert_eq!(records[0].name, "sample1 Brazil");
/// assert_eq!(records[0].sequence, "ACGT");
/// assert_eq!(records[1].sequence, "ACGA");
/// # Ok::<(), color_eyre::eyre::Report>(())
/// ```
pub fn parse_fasta<R: BufRead>(reader: R) -> Result<Vec<Record>, Report> {
    let normalized = normalize(reader)?;
    let mut reader = fasta::Reader::new(normalized.as_bytes());
    let records: Vec<Record> = reader
        .records()
        .map(|result| {
            let record = result.wrap_err("Failed to parse FASTA record.")?;
            Record::from_fasta(&record)
        })
        .collect::<Result<_, Report>>()?;

    validate(&records)?;
    debug!("Read {} sequence records.", records.len());

    Ok(records)
}

/// Returns the FASTA text with every line trimmed and whitespace removed from sequence lines.
///
/// Blank lines and any text before the first header are dropped, `> name` becomes `>name`.
fn normalize<R: BufRead>(reader: R) -> Result<String, Report> {
    let mut normalized = String::new();
    let mut in_record = false;

    for line in reader.lines() {
        let line = line.wrap_err("Failed to read FASTA input.")?;
        let line = line.trim();
        if let Some(header) = line.strip_prefix('>') {
            in_record = true;
            normalized.push('>');
            normalized.push_str(header.trim_start());
        } else if in_record && !line.is_empty() {
            normalized.extend(line.chars().filter(|c| !c.is_whitespace()));
        } else {
            continue;
        }
        normalized.push('\n');
    }

    Ok(normalized)
}

/// Returns the validated records of a FASTA alignment file.
pub fn read_fasta<P>(path: &P) -> Result<Vec<Record>, Report>
where
    P: AsRef<Path> + Debug,
{
    let reader = File::open(path)
        .map(BufReader::new)
        .wrap_err_with(|| format!("Failed to read: {path:?}"))?;
    parse_fasta(reader).wrap_err_with(|| format!("Failed to parse alignment: {path:?}"))
}

/// Check that records are present, aligned and restricted to the [`ALPHABET`].
fn validate(records: &[Record]) -> Result<(), Report> {
    let first = records
        .first()
        .ok_or_else(|| eyre!("Invalid input: no sequences were found."))
        .suggestion("Is the input a FASTA file?")?;

    if let Some(record) = records.iter().find(|r| r.sequence.len() != first.sequence.len()) {
        return Err(eyre!(
            "Invalid input: {} and {} are different lengths ({} vs {}).",
            first.name,
            record.name,
            first.sequence.len(),
            record.sequence.len()
        )
        .suggestion("Are you sure the sequences are aligned?"));
    }

    let invalid = records
        .iter()
        .find(|r| r.sequence.is_empty() || r.sequence.bytes().any(|b| !ALPHABET.contains(&b)));
    if let Some(record) = invalid {
        return Err(eyre!("Invalid input: {} contains invalid characters.", record.name)
            .suggestion("Sequences may only contain A, C, G, T, N and -."));
    }

    Ok(())
}

// ----------------------------------------------------------------------------
// Haplotypes
// ----------------------------------------------------------------------------

/// Returns the positions where no record carries an [`AMBIGUOUS`] character.
///
/// ```rust
/// use haplonet::sequence::{informative_positions, Record};
/// let records = [("s1", "AC-T"), ("s2", "ANGT")]
///     .map(|(name, seq)| Record { name: name.into(), sequence: seq.into() });
/// assert_eq!(informative_positions(&records), vec![0, 3]);
/// ```
pub fn informative_positions(records: &[Record]) -> Vec<usize> {
    let length = records.first().map(|r| r.sequence.len()).unwrap_or_default();
    (0..length)
        .filter(|i| {
            records.iter().all(|r| r.sequence.as_bytes().get(*i).is_some_and(|b| !AMBIGUOUS.contains(b)))
        })
        .collect()
}

/// Collapse records into [`Haplotype`]s over their informative positions.
///
/// Identical restricted sequences share one haplotype. Ids are `H1, H2, ...` in first-seen order,
/// samples keep the input order.
///
/// ```rust
/// use haplonet::sequence::{haplotypes, Record};
/// let records = [("s1", "ACNT"), ("s2", "AGGT"), ("s3", "ACCT")]
///     .map(|(name, seq)| Record { name: name.into(), sequence: seq.into() });
/// let haplotypes = haplotypes(&records);
/// assert_eq!(haplotypes.len(), 2);
/// assert_eq!(haplotypes[0].sequence, "ACT");
/// assert_eq!(haplotypes[0].samples, ["s1", "s3"]);
/// assert_eq!(haplotypes[1].count, 1);
/// ```
pub fn haplotypes(records: &[Record]) -> Vec<Haplotype> {
    let positions = informative_positions(records);
    let length = records.first().map(|r| r.sequence.len()).unwrap_or_default();
    if !records.is_empty() && positions.is_empty() {
        warn!("No informative positions remain, every sequence collapses into one haplotype.");
    } else if positions.len() < length {
        info!(
            "Using {} of {length} positions, {} contain N or -.",
            positions.len(),
            length - positions.len()
        );
    }

    let mut haplotypes: Vec<Haplotype> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for record in records {
        let bytes = record.sequence.as_bytes();
        let sequence: String = positions.iter().filter_map(|i| bytes.get(*i)).map(|b| *b as char).collect();

        match index.get(&sequence) {
            Some(i) => {
                let haplotype = &mut haplotypes[*i];
                haplotype.count += 1;
                haplotype.samples.push(record.name.clone());
            }
            None => {
                let id = format!("H{}", haplotypes.len() + 1);
                index.insert(sequence.clone(), haplotypes.len());
                let mut haplotype = Haplotype::new(id, sequence, 1);
                haplotype.samples.push(record.name.clone());
                haplotypes.push(haplotype);
            }
        }
    }

    info!(
        "Identified {} haplotypes from {} sequences: {}",
        haplotypes.len(),
        records.len(),
        haplotypes.iter().map(|h| format!("{} (n={})", h.id, h.count)).join(", ")
    );

    haplotypes
}

#[cfg(test)]
mod tests;
