//! # corpus_compare
//!
//! Word-frequency comparison of two document collections.
//!
//! The pipeline runs in stages, each persisting its output so later stages can
//! be re-run on their own:
//!
//! 1. [`read_docterms`] + [`build_frequency_tables`]: raw counts and relative
//!    frequencies per document.
//! 2. [`aggregate()`]: `total_count` per word, rows sorted by it, corpus mean.
//! 3. [`match_vocabulary`]: threshold filtering and the shared vocabulary.
//! 4. [`run_significance_test`]: a Wilcoxon rank-sum test per vocabulary
//!    word, written row by row to the results CSV.
//!
//! Progress is reported as [`Event`]s through a caller-supplied [`Reporter`].

use std::path::{Path, PathBuf};

pub mod aggregate;
pub mod docterms;
pub mod error;
pub mod events;
pub mod frequency;
pub mod report;
pub mod select;
pub mod stats;
pub mod table;
pub mod table_io;
pub mod vocabulary;

pub use aggregate::{CorpusSummary, CorpusTable, RawTable, aggregate};
pub use docterms::{DocTermRecord, read_docterms};
pub use error::{CompareError, Result};
pub use events::{Event, JsonLinesReporter, LogReporter, Reporter};
pub use frequency::{FrequencyTables, Normalization, build_frequency_tables};
pub use report::{
    ComparisonInputs, ReportRow, ReportSummary, run_significance_test, write_report,
};
pub use select::{sample_documents, select_documents};
pub use table::WordTable;
pub use vocabulary::{MatchedCorpora, Vocabulary, match_vocabulary};

/// Options of the table-building stages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompareOptions {
    /// Minimum `total_count` a word needs to stay in a corpus' vocabulary.
    /// `None` keeps every word.
    pub threshold: Option<u64>,
    pub normalization: Normalization,
}

/// Locations of the persisted artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspacePaths {
    pub c1_relative: PathBuf,
    pub c2_relative: PathBuf,
    pub c1_raw: PathBuf,
    pub c2_raw: PathBuf,
    pub vocabulary: PathBuf,
    pub results: PathBuf,
}

impl WorkspacePaths {
    /// Standard file names inside `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            c1_relative: dir.join("c1_relative.csv"),
            c2_relative: dir.join("c2_relative.csv"),
            c1_raw: dir.join("c1_raw.csv"),
            c2_raw: dir.join("c2_raw.csv"),
            vocabulary: dir.join("vocab.txt"),
            results: dir.join("results.csv"),
        }
    }

    pub fn with_results(mut self, results: PathBuf) -> Self {
        self.results = results;
        self
    }
}

/// Reads one document-term file and aggregates it into a [`CorpusTable`].
pub fn load_corpus(
    label: &str,
    docterms: &Path,
    normalization: Normalization,
    reporter: &mut dyn Reporter,
) -> Result<CorpusTable> {
    let records = read_docterms(docterms)?;
    let tables = build_frequency_tables(&records, normalization);
    reporter.report(Event::CorpusLoaded {
        label: label.to_owned(),
        documents: records.len(),
        words: tables.raw.len(),
    });
    let (corpus, _) = aggregate(label, tables, reporter)?;
    Ok(corpus)
}

fn saved(path: &Path, reporter: &mut dyn Reporter) {
    reporter.report(Event::FileWritten {
        path: path.to_path_buf(),
    });
}

/// Persists both filtered corpora and the vocabulary.
pub fn save_matched(
    matched: &MatchedCorpora,
    paths: &WorkspacePaths,
    reporter: &mut dyn Reporter,
) -> Result<()> {
    table_io::write_relative_table(&paths.c1_relative, &matched.c1.relative)?;
    saved(&paths.c1_relative, reporter);
    table_io::write_relative_table(&paths.c2_relative, &matched.c2.relative)?;
    saved(&paths.c2_relative, reporter);
    table_io::write_raw_table(&paths.c1_raw, &matched.c1.raw)?;
    saved(&paths.c1_raw, reporter);
    table_io::write_raw_table(&paths.c2_raw, &matched.c2.raw)?;
    saved(&paths.c2_raw, reporter);
    table_io::write_word_list(&paths.vocabulary, matched.vocabulary.iter())?;
    saved(&paths.vocabulary, reporter);
    Ok(())
}

/// Builds, aggregates, filters and persists both corpora.
pub fn prepare_comparison(
    c1_docterms: &Path,
    c2_docterms: &Path,
    paths: &WorkspacePaths,
    options: &CompareOptions,
    reporter: &mut dyn Reporter,
) -> Result<MatchedCorpora> {
    let c1 = load_corpus("c1", c1_docterms, options.normalization, reporter)?;
    let c2 = load_corpus("c2", c2_docterms, options.normalization, reporter)?;
    let matched = match_vocabulary(&c1, &c2, options.threshold, reporter);
    save_matched(&matched, paths, reporter)?;
    Ok(matched)
}
