pub mod verbosity;

use color_eyre::eyre::{eyre, Report, Result, WrapErr};
use color_eyre::Help;
use itertools::Itertools;
use std::fmt::Debug;
use std::path::{Path, PathBuf};

/// Get delimiter based on file extension.
///
/// ## Arguments
///
/// - `path` - File path.
///
/// ## Examples
///
/// - `.tsv` => `\t`
/// - `.txt` => `\t`
/// - `.csv` => `,`
///
/// Note that `.txt` is assumed to be tab-delimited!
///
/// ```rust
/// use haplonet::utils::get_delimiter;
///
/// assert_eq!(get_delimiter(&"haplotypes.tsv")?, '\t');
/// assert_eq!(get_delimiter(&"haplotypes.csv")?, ',');
/// assert_eq!(get_delimiter(&"haplotypes.txt")?, '\t');
/// assert!(get_delimiter(&"haplotypes").is_err());
/// # Ok::<(), color_eyre::eyre::Report>(())
/// ```
pub fn get_delimiter<P>(path: &P) -> Result<char, Report>
where
    P: AsRef<Path> + Debug,
{
    let ext = path
        .as_ref()
        .extension()
        .ok_or_else(|| eyre!("Failed to get file extension: {path:?}"))?
        .to_str()
        .ok_or_else(|| eyre!("Failed to convert file extension to str: {path:?}"))?;
    // convert extension to the expected delimiter
    match ext {
        "tsv" | "txt" => Ok('\t'),
        "csv" => Ok(','),
        _ext => {
            Err(eyre!("Unknown file extension: {_ext:?}").suggestion("Options: tsv, csv, or txt"))
        }
    }
}

/// Create a directory and all of its parents, if it does not already exist.
pub fn create_dir<P>(dir: &P) -> Result<PathBuf, Report>
where
    P: AsRef<Path> + Debug,
{
    let dir: PathBuf = dir.as_ref().into();
    if !dir.exists() {
        std::fs::create_dir_all(&dir)
            .wrap_err_with(|| format!("Failed to create directory: {dir:?}"))?;
    }
    Ok(dir)
}

/// Write rows to a delimited text file, the first row holds the headers.
///
/// The delimiter is chosen by [`get_delimiter`].
///
/// ```rust
/// use haplonet::utils::write_table;
/// let dir = tempfile::tempdir()?;
/// let path = dir.path().join("table.csv");
/// write_table(&[vec!["id", "count"], vec!["H1", "2"]], &path)?;
/// assert_eq!(std::fs::read_to_string(&path)?, "id,count\nH1,2\n");
/// # Ok::<(), color_eyre::eyre::Report>(())
/// ```
pub fn write_table<T, P>(rows: &[Vec<T>], path: &P) -> Result<(), Report>
where
    T: AsRef<str>,
    P: AsRef<Path> + Debug,
{
    let delim = get_delimiter(path)?.to_string();
    let output: String =
        rows.iter().map(|row| format!("{}\n", row.iter().map(AsRef::as_ref).join(&delim))).collect();
    std::fs::write(path, output).wrap_err_with(|| format!("Failed to write table: {path:?}"))?;
    Ok(())
}

/// Returns a pretty-printed [`tabled::Table`], the first row holds the headers.
///
/// ```rust
/// use haplonet::utils::pretty_table;
/// let table = pretty_table(&[vec!["Nodes", "Edges"], vec!["4", "3"]]);
/// assert!(table.to_string().contains("| Nodes | Edges |"));
/// ```
pub fn pretty_table<T>(rows: &[Vec<T>]) -> tabled::Table
where
    T: AsRef<str>,
{
    let mut builder = tabled::builder::Builder::default();
    rows.iter().for_each(|row| {
        builder.push_record(row.iter().map(|cell| cell.as_ref().to_string()));
    });
    builder.build()
}
