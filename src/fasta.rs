//! FASTA/gzipped FASTA loading using needletail.
//!
//! Only compiled with the `fasta` feature (on by default). Records are
//! uppercased but otherwise passed through untouched; [`Sequence::new`]
//! decides whether they are searchable.

use crate::error::TaleScanError;
use crate::sequence::Sequence;
use needletail::parse_fastx_reader;
use std::collections::HashSet;
use std::fs::File;
use std::path::Path;

/// Load every record of a FASTA file as `(name, uppercase bases)`.
///
/// The file may be gzip-compressed. A record's name is its header up to
/// the first whitespace; two records with the same name are an error.
///
/// # Errors
///
/// * `TaleScanError::Io` if the file cannot be opened.
/// * `TaleScanError::FastaParse` for malformed records or repeated names.
pub fn read_fasta<P: AsRef<Path>>(path: P) -> Result<Vec<(String, String)>, TaleScanError> {
    let path = path.as_ref();
    let parse_err = |e: needletail::errors::ParseError| TaleScanError::FastaParse(e.to_string());
    let mut reader = parse_fastx_reader(File::open(path)?).map_err(parse_err)?;

    let mut names: HashSet<String> = HashSet::new();
    let mut records = Vec::new();
    while let Some(record) = reader.next() {
        let record = record.map_err(parse_err)?;
        let header = String::from_utf8_lossy(record.id());
        let name = header.split_whitespace().next().unwrap_or_default().to_string();
        if names.contains(&name) {
            return Err(TaleScanError::FastaParse(format!(
                "record name '{name}' appears twice in '{}'",
                path.display()
            )));
        }
        let bases = String::from_utf8_lossy(&record.seq()).to_ascii_uppercase();
        names.insert(name.clone());
        records.push((name, bases));
    }
    log::debug!("read {} records from {}", records.len(), path.display());
    Ok(records)
}

/// Read a FASTA file and validate every record as a search [`Sequence`].
///
/// # Errors
///
/// Fails on the first record that is not a valid sequence.
pub fn read_sequences<P: AsRef<Path>>(path: P) -> Result<Vec<(String, Sequence)>, TaleScanError> {
    read_fasta(path)?
        .into_iter()
        .map(|(name, seq)| {
            let validated = Sequence::new(&seq).map_err(|e| {
                log::warn!("record '{}' rejected: {}", name, e);
                e
            })?;
            Ok((name, validated))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_fasta(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".fa").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_read_fasta_in_order() {
        let a = "acgt".repeat(30);
        let b = "TTGCA".repeat(30);
        let file = write_fasta(&format!(">seqA first\n{a}\n>seqB\n{b}\n"));
        let records = read_fasta(file.path()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].0, "seqA");
        assert_eq!(records[0].1, a.to_uppercase());
        assert_eq!(records[1].0, "seqB");
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let file = write_fasta(">x\nACGT\n>x\nACGT\n");
        assert!(matches!(
            read_fasta(file.path()),
            Err(TaleScanError::FastaParse(_))
        ));
    }

    #[test]
    fn test_read_sequences_validates() {
        let good = write_fasta(&format!(">ok\n{}\n", "ACGT".repeat(40)));
        let seqs = read_sequences(good.path()).unwrap();
        assert_eq!(seqs[0].1.len(), 160);

        let short = write_fasta(">short\nACGTACGT\n");
        assert!(matches!(
            read_sequences(short.path()),
            Err(TaleScanError::InvalidSequenceLength { length: 8, .. })
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        assert!(matches!(
            read_fasta("/nonexistent/path/to.fa"),
            Err(TaleScanError::Io(_))
        ));
    }
}
