//! Threshold filtering and the shared vocabulary of two corpora.

use std::collections::BTreeSet;

use crate::aggregate::CorpusTable;
use crate::events::{Event, Reporter};

/// Words compared by the rank-sum test: the union of both corpora's
/// retained words. Iterates in sorted order so persisted lists are stable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Vocabulary {
    words: BTreeSet<String>,
}

impl Vocabulary {
    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.words.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for Vocabulary {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            words: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Keeps the words whose `total_count >= threshold` (everything when
/// `threshold` is `None`).
///
/// The relative table is restricted to the same words as the raw table, so
/// both describe exactly this corpus' retained vocabulary.
pub fn filter_corpus(corpus: &CorpusTable, threshold: Option<u64>) -> CorpusTable {
    let Some(threshold) = threshold else {
        return corpus.clone();
    };
    let rows: Vec<usize> = (0..corpus.raw.len())
        .filter(|&i| corpus.raw.totals[i] >= threshold)
        .collect();
    let raw = corpus.raw.select_rows(&rows);
    let relative = corpus.relative.filter_words(|w| raw.counts.contains(w));
    CorpusTable {
        label: corpus.label.clone(),
        relative,
        raw,
    }
}

/// Output of [`match_vocabulary`].
#[derive(Debug, Clone, PartialEq)]
pub struct MatchedCorpora {
    pub c1: CorpusTable,
    pub c2: CorpusTable,
    pub vocabulary: Vocabulary,
}

/// Filters both corpora and takes the union of what survives.
///
/// A word kept by only one side stays in the vocabulary; the report treats it
/// as absent (all zeros) on the other side.
pub fn match_vocabulary(
    c1: &CorpusTable,
    c2: &CorpusTable,
    threshold: Option<u64>,
    reporter: &mut dyn Reporter,
) -> MatchedCorpora {
    let c1 = filter_corpus(c1, threshold);
    let c2 = filter_corpus(c2, threshold);
    for c in [&c1, &c2] {
        reporter.report(Event::VocabularyFiltered {
            label: c.label.clone(),
            threshold,
            retained: c.relative.len(),
        });
    }

    let vocabulary: Vocabulary = c1
        .relative
        .words()
        .iter()
        .chain(c2.relative.words())
        .cloned()
        .collect();
    reporter.report(Event::VocabularyMatched {
        words: vocabulary.len(),
    });
    MatchedCorpora { c1, c2, vocabulary }
}
