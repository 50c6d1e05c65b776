//! Per-document raw counts and relative frequencies.

use clap::ValueEnum;

use crate::docterms::DocTermRecord;
use crate::table::WordTable;

/// How a raw count is turned into a relative frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Normalization {
    /// count / words seen so far in the whole scan, this document included.
    ///
    /// Later documents get systematically smaller values. This matches the
    /// tables produced by the existing notebooks and stays the default so old
    /// and new results remain comparable.
    #[default]
    #[value(name = "cumulative")]
    Cumulative,
    /// count / words in this document.
    #[value(name = "document")]
    DocumentLength,
}

/// The two parallel tables built from one corpus. Rows are words in
/// first-seen order, columns are documents in file order.
#[derive(Debug, Clone, PartialEq)]
pub struct FrequencyTables {
    pub relative: WordTable<f64>,
    pub raw: WordTable<u64>,
}

/// Denominator for every document, in corpus order.
pub fn denominators(records: &[DocTermRecord], normalization: Normalization) -> Vec<u64> {
    let mut running = 0u64;
    records
        .iter()
        .map(|r| {
            let len = r.words.len() as u64;
            match normalization {
                Normalization::Cumulative => {
                    running += len;
                    running
                }
                Normalization::DocumentLength => len,
            }
        })
        .collect()
}

/// Builds the raw-count and relative-frequency tables for one corpus.
///
/// # Example
/// ```
/// use corpus_compare::{DocTermRecord, Normalization, build_frequency_tables};
/// let docs = vec![
///     DocTermRecord::new("d1", &["cat", "cat", "dog"]),
///     DocTermRecord::new("d2", &["dog"]),
/// ];
/// let t = build_frequency_tables(&docs, Normalization::Cumulative);
/// assert_eq!(t.raw.row("cat"), Some(&[2, 0][..]));
/// // d2 is normalized against 3 + 1 words, not its own length.
/// assert_eq!(t.relative.row("dog"), Some(&[1.0 / 3.0, 0.25][..]));
/// ```
pub fn build_frequency_tables(
    records: &[DocTermRecord],
    normalization: Normalization,
) -> FrequencyTables {
    let documents = records.iter().map(|r| r.name.clone()).collect();
    let mut raw: WordTable<u64> = WordTable::new(documents);
    for (d, record) in records.iter().enumerate() {
        for word in &record.words {
            let row = raw.row_index_or_insert(word);
            *raw.cell_mut(row, d) += 1;
        }
    }

    let denom = denominators(records, normalization);
    let relative = raw.map_cells(|_, d, count| {
        if count == 0 {
            0.0
        } else {
            count as f64 / denom[d] as f64
        }
    });
    FrequencyTables { relative, raw }
}
