//! Corpus-level tables: per-word totals, ordering and the summary mean.

use crate::error::{CompareError, Result};
use crate::events::{Event, Reporter};
use crate::frequency::FrequencyTables;
use crate::table::WordTable;

/// Raw counts plus the `total_count` column.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    pub counts: WordTable<u64>,
    /// `totals[i]` belongs to row `i` of `counts`.
    pub totals: Vec<u64>,
}

impl RawTable {
    /// Appends `total_count` as the row sum of every word.
    pub fn from_counts(counts: WordTable<u64>) -> Self {
        let totals = counts.rows().map(|(_, row)| row.iter().sum()).collect();
        Self { counts, totals }
    }

    pub fn total_count(&self, word: &str) -> Option<u64> {
        self.counts.row_index(word).map(|i| self.totals[i])
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Rows at the given indices, totals carried along.
    pub fn select_rows(&self, rows: &[usize]) -> Self {
        Self {
            counts: self.counts.select_rows(rows),
            totals: rows.iter().map(|&r| self.totals[r]).collect(),
        }
    }
}

/// Both tables of one corpus after aggregation.
#[derive(Debug, Clone, PartialEq)]
pub struct CorpusTable {
    pub label: String,
    pub relative: WordTable<f64>,
    pub raw: RawTable,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CorpusSummary {
    pub label: String,
    pub documents: usize,
    pub words: usize,
    /// Arithmetic mean of `total_count` over all words.
    pub mean_total_count: f64,
}

impl CorpusTable {
    pub fn documents(&self) -> &[String] {
        self.raw.counts.documents()
    }

    pub fn summary(&self) -> Result<CorpusSummary> {
        if self.raw.is_empty() {
            return Err(CompareError::EmptyCorpus(self.label.clone()));
        }
        let sum: u64 = self.raw.totals.iter().sum();
        Ok(CorpusSummary {
            label: self.label.clone(),
            documents: self.documents().len(),
            words: self.raw.len(),
            mean_total_count: sum as f64 / self.raw.len() as f64,
        })
    }
}

/// Turns one corpus' frequency tables into a [`CorpusTable`].
///
/// Missing cells are already structural zeros in [`WordTable`]. Rows are
/// sorted by descending `total_count`; ties keep first-seen order. An empty
/// corpus fails with [`CompareError::EmptyCorpus`] because its mean is
/// undefined.
pub fn aggregate(
    label: &str,
    tables: FrequencyTables,
    reporter: &mut dyn Reporter,
) -> Result<(CorpusTable, CorpusSummary)> {
    let FrequencyTables { relative, raw } = tables;
    let raw = RawTable::from_counts(raw);

    let mut order: Vec<usize> = (0..raw.len()).collect();
    order.sort_by(|&a, &b| raw.totals[b].cmp(&raw.totals[a]));

    let relative_order: Vec<usize> = order
        .iter()
        .filter_map(|&r| relative.row_index(&raw.counts.words()[r]))
        .collect();

    let corpus = CorpusTable {
        label: label.to_owned(),
        relative: relative.select_rows(&relative_order),
        raw: raw.select_rows(&order),
    };
    let summary = corpus.summary()?;
    reporter.report(Event::CorpusSummary {
        label: summary.label.clone(),
        documents: summary.documents,
        words: summary.words,
        mean_total_count: summary.mean_total_count,
    });
    Ok((corpus, summary))
}
