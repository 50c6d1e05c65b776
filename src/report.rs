//! Per-word significance report.
//!
//! The tester works from the persisted artifacts only, so it can be re-run
//! without rebuilding any table. Rows are written as they are computed.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::WorkspacePaths;
use crate::aggregate::RawTable;
use crate::error::{CompareError, Result};
use crate::events::{Event, Reporter};
use crate::stats::{DegenerateSample, RankSum, rank_sum};
use crate::table::WordTable;
use crate::table_io::{read_raw_table, read_relative_table, read_word_list, write_atomically};

pub const RESULTS_HEADER: [&str; 7] = [
    "word",
    "c1 total count",
    "c2 total count",
    "difference c1 - c2",
    "% change",
    "wilcoxon statistic",
    "wilcoxon p-value",
];

/// Written in the `% change` column when the c2 total is zero.
pub const UNDEFINED_CHANGE: &str = "undefined";

/// Written in both test columns when the test is not computable.
pub const TEST_SENTINEL: f64 = -1.0;

/// Float column text. Integral values keep one decimal (`0.0`, `-100.0`)
/// so the column reads as a float to downstream readers.
pub fn format_float(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub word: String,
    pub c1_total: u64,
    pub c2_total: u64,
    pub difference: i64,
    /// `None` when `c2_total == 0`.
    pub percent_change: Option<f64>,
    pub test: core::result::Result<RankSum, DegenerateSample>,
}

impl ReportRow {
    pub fn new(
        word: impl Into<String>,
        c1_total: u64,
        c2_total: u64,
        test: core::result::Result<RankSum, DegenerateSample>,
    ) -> Self {
        let difference = c1_total as i64 - c2_total as i64;
        let percent_change =
            (c2_total != 0).then(|| difference as f64 / c2_total as f64 * 100.0);
        Self {
            word: word.into(),
            c1_total,
            c2_total,
            difference,
            percent_change,
            test,
        }
    }

    pub fn statistic(&self) -> f64 {
        self.test.map_or(TEST_SENTINEL, |t| t.statistic)
    }

    pub fn p_value(&self) -> f64 {
        self.test.map_or(TEST_SENTINEL, |t| t.p_value)
    }

    /// The row as CSV fields. Sentinels are written as the integer `-1`.
    pub fn to_record(&self) -> [String; 7] {
        let (statistic, p_value) = match self.test {
            Ok(t) => (format_float(t.statistic), format_float(t.p_value)),
            Err(_) => {
                let sentinel = (TEST_SENTINEL as i64).to_string();
                (sentinel.clone(), sentinel)
            }
        };
        [
            self.word.clone(),
            self.c1_total.to_string(),
            self.c2_total.to_string(),
            self.difference.to_string(),
            self.percent_change
                .map_or_else(|| UNDEFINED_CHANGE.to_string(), format_float),
            statistic,
            p_value,
        ]
    }
}

impl fmt::Display for ReportRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_record().join(", "))
    }
}

/// One corpus as the tester sees it.
#[derive(Debug, Clone)]
pub struct CorpusSample {
    pub relative: WordTable<f64>,
    pub raw: RawTable,
    raw_path: PathBuf,
    zeros: Vec<f64>,
}

impl CorpusSample {
    pub fn new(relative: WordTable<f64>, raw: RawTable, raw_path: impl Into<PathBuf>) -> Self {
        let zeros = vec![0.0; relative.documents().len()];
        Self {
            relative,
            raw,
            raw_path: raw_path.into(),
            zeros,
        }
    }

    pub fn load(relative_path: &Path, raw_path: &Path) -> Result<Self> {
        Ok(Self::new(
            read_relative_table(relative_path)?,
            read_raw_table(raw_path)?,
            raw_path,
        ))
    }

    /// Relative frequencies of `word` in every document plus its total count.
    /// A word this corpus did not retain reads as all zeros.
    pub fn sample(&self, word: &str) -> Result<(&[f64], u64)> {
        match self.relative.row(word) {
            Some(values) => {
                let total = self.raw.total_count(word).ok_or_else(|| {
                    CompareError::MissingTotal {
                        path: self.raw_path.clone(),
                        word: word.to_owned(),
                    }
                })?;
                Ok((values, total))
            }
            None => Ok((&self.zeros, 0)),
        }
    }
}

/// The persisted inputs of the tester.
#[derive(Debug, Clone)]
pub struct ComparisonInputs {
    pub c1: CorpusSample,
    pub c2: CorpusSample,
}

impl ComparisonInputs {
    pub fn load(paths: &WorkspacePaths) -> Result<Self> {
        Ok(Self {
            c1: CorpusSample::load(&paths.c1_relative, &paths.c1_raw)?,
            c2: CorpusSample::load(&paths.c2_relative, &paths.c2_raw)?,
        })
    }

    /// Computes the report row of one word. A degenerate test becomes a
    /// sentinel row rather than an error.
    pub fn row_for(&self, word: &str) -> Result<ReportRow> {
        let (x, c1_total) = self.c1.sample(word)?;
        let (y, c2_total) = self.c2.sample(word)?;
        Ok(ReportRow::new(word, c1_total, c2_total, rank_sum(x, y)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReportSummary {
    pub rows: usize,
    pub degenerate: usize,
}

/// Writes the results CSV, one row per vocabulary word, in vocabulary order.
pub fn write_report<I>(
    inputs: &ComparisonInputs,
    vocabulary: I,
    results: &Path,
    reporter: &mut dyn Reporter,
) -> Result<ReportSummary>
where
    I: IntoIterator<Item = Result<String>>,
{
    let mut summary = ReportSummary::default();
    write_atomically(results, |out| {
        let mut wtr = csv::Writer::from_writer(out);
        wtr.write_record(RESULTS_HEADER)?;
        for word in vocabulary {
            let row = inputs.row_for(&word?)?;
            if let Err(reason) = row.test {
                summary.degenerate += 1;
                reporter.report(Event::DegenerateWord {
                    word: row.word.clone(),
                    reason: reason.to_string(),
                });
            }
            wtr.write_record(row.to_record())?;
            summary.rows += 1;
        }
        wtr.flush()?;
        Ok(())
    })?;
    reporter.report(Event::TestComplete {
        rows: summary.rows,
        degenerate: summary.degenerate,
        path: results.to_path_buf(),
    });
    Ok(summary)
}

/// Loads every persisted artifact under `paths` and writes the report.
pub fn run_significance_test(
    paths: &WorkspacePaths,
    reporter: &mut dyn Reporter,
) -> Result<ReportSummary> {
    let inputs = ComparisonInputs::load(paths)?;
    let vocabulary = read_word_list(&paths.vocabulary)?;
    write_report(&inputs, vocabulary, &paths.results, reporter)
}
