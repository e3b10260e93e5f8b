use crate::sequence::{haplotypes, parse_fasta, read_fasta, Record};
use color_eyre::eyre::{Report, Result};
use indoc::indoc;

fn records(sequences: &[(&str, &str)]) -> Vec<Record> {
    sequences
        .iter()
        .map(|(name, sequence)| Record { name: name.to_string(), sequence: sequence.to_string() })
        .collect()
}

#[test]
fn read_alignment() -> Result<(), Report> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("alignment.fasta");
    let fasta = indoc! {"
        >s1
        AAAA
        >s2
        aaat
        >s3
        AATA
        >s4
        AAAA
    "};
    std::fs::write(&path, fasta)?;

    let records = read_fasta(&path)?;
    assert_eq!(records.len(), 4);
    assert_eq!(records[1].sequence, "AAAT");

    let haplotypes = haplotypes(&records);
    let ids = haplotypes.iter().map(|h| h.id.as_str()).collect::<Vec<_>>();
    assert_eq!(ids, ["H1", "H2", "H3"]);
    assert_eq!(haplotypes[0].count, 2);
    assert_eq!(haplotypes[0].samples, ["s1", "s4"]);
    Ok(())
}

#[test]
fn blank_lines() -> Result<(), Report> {
    let records = parse_fasta("\n\n>s1\nACGT\n\n>s2\nACGA\n\n".as_bytes())?;
    assert_eq!(records, self::records(&[("s1", "ACGT"), ("s2", "ACGA")]));
    Ok(())
}

#[test]
fn padded_header_and_crlf() -> Result<(), Report> {
    let records = parse_fasta(">  s1 x\r\nAC GT\r\n>s2\r\nACGA\r\n".as_bytes())?;
    assert_eq!(records, self::records(&[("s1 x", "ACGT"), ("s2", "ACGA")]));
    Ok(())
}

#[test]
fn whitespace_inside_sequence() -> Result<(), Report> {
    let fasta = ">s1\nAC GT\n>s2\n  AC\tGA  \n";
    let records = parse_fasta(fasta.as_bytes())?;
    assert_eq!(records[0].sequence, "ACGT");
    assert_eq!(records[1].sequence, "ACGA");
    Ok(())
}

#[test]
fn text_before_first_header() -> Result<(), Report> {
    let fasta = indoc! {"
        exported alignment
        >s1
        ACGT
    "};
    let records = parse_fasta(fasta.as_bytes())?;
    assert_eq!(records, self::records(&[("s1", "ACGT")]));
    Ok(())
}

#[test]
fn missing_file() {
    assert!(read_fasta(&"does/not/exist.fasta").is_err());
}

#[test]
fn empty_alignment() {
    let error = parse_fasta("".as_bytes()).err().map(|e| e.to_string()).unwrap_or_default();
    assert!(error.starts_with("Invalid input"), "{error}");
}

#[test]
fn unaligned() {
    let fasta = indoc! {"
        >s1
        ACGT
        >s2
        ACG
    "};
    let error = parse_fasta(fasta.as_bytes()).err().map(|e| e.to_string()).unwrap_or_default();
    assert!(error.contains("different lengths"), "{error}");
}

#[test]
fn invalid_characters() {
    let fasta = indoc! {"
        >s1
        ACGT
        >s2
        ACGR
    "};
    assert!(parse_fasta(fasta.as_bytes()).is_err());
}

#[test]
fn gaps_and_missing_are_dropped() {
    let records = records(&[("s1", "A-GTN"), ("s2", "ACGTA"), ("s3", "TCGAA")]);
    let haplotypes = haplotypes(&records);
    let sequences = haplotypes.iter().map(|h| h.sequence.as_str()).collect::<Vec<_>>();
    assert_eq!(sequences, ["AGT", "TGA"]);
    assert_eq!(haplotypes[0].count, 2);
}

#[test]
fn no_informative_positions() {
    let records = records(&[("s1", "N-"), ("s2", "-N")]);
    let haplotypes = haplotypes(&records);
    assert_eq!(haplotypes.len(), 1);
    assert_eq!(haplotypes[0].sequence, "");
    assert_eq!(haplotypes[0].count, 2);
}

#[test]
fn no_records() {
    assert!(haplotypes(&[]).is_empty());
}
