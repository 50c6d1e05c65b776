//! Progress and summary notifications.
//!
//! Pipeline stages never print. They hand [`Event`] values to a caller-supplied
//! [`Reporter`], which decides how (and whether) to render them.

use std::fmt;
use std::io::Write;
use std::path::PathBuf;

use log::{debug, info, warn};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    CorpusLoaded {
        label: String,
        documents: usize,
        words: usize,
    },
    CorpusSummary {
        label: String,
        documents: usize,
        words: usize,
        mean_total_count: f64,
    },
    VocabularyFiltered {
        label: String,
        threshold: Option<u64>,
        retained: usize,
    },
    VocabularyMatched {
        words: usize,
    },
    FileWritten {
        path: PathBuf,
    },
    DegenerateWord {
        word: String,
        reason: String,
    },
    DocumentsSelected {
        requested: usize,
        selected: usize,
        path: PathBuf,
    },
    TestComplete {
        rows: usize,
        degenerate: usize,
        path: PathBuf,
    },
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::CorpusLoaded {
                label,
                documents,
                words,
            } => write!(f, "{label}: loaded {documents} documents, {words} distinct words"),
            Event::CorpusSummary {
                label,
                mean_total_count,
                ..
            } => write!(f, "Average total word count for {label}: {mean_total_count}"),
            Event::VocabularyFiltered {
                label,
                threshold: Some(t),
                retained,
            } => write!(f, "Words in {label} (total_count >= {t}): {retained}"),
            Event::VocabularyFiltered {
                label,
                threshold: None,
                retained,
            } => write!(f, "Words in {label}: {retained}"),
            Event::VocabularyMatched { words } => write!(f, "Vocabulary list: {words} words"),
            Event::FileWritten { path } => write!(f, "Saved {}", path.display()),
            Event::DegenerateWord { word, reason } => {
                write!(f, "Rank-sum test not computable for {word:?}: {reason}")
            }
            Event::DocumentsSelected {
                requested,
                selected,
                path,
            } => write!(
                f,
                "Selected {selected} of {requested} requested documents into {}",
                path.display()
            ),
            Event::TestComplete {
                rows,
                degenerate,
                path,
            } => write!(
                f,
                "Test complete: {rows} rows ({degenerate} with sentinel values) written to {}",
                path.display()
            ),
        }
    }
}

/// Receives notifications from the pipeline.
pub trait Reporter {
    fn report(&mut self, event: Event);
}

/// Collects events in memory.
impl Reporter for Vec<Event> {
    fn report(&mut self, event: Event) {
        self.push(event);
    }
}

/// Renders events through the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

impl Reporter for LogReporter {
    fn report(&mut self, event: Event) {
        match event {
            Event::DegenerateWord { .. } => debug!("{event}"),
            _ => info!("{event}"),
        }
    }
}

/// Writes each event as one JSON object per line.
pub struct JsonLinesReporter<W: Write> {
    out: W,
}

impl<W: Write> JsonLinesReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Reporter for JsonLinesReporter<W> {
    fn report(&mut self, event: Event) {
        let written = serde_json::to_writer(&mut self.out, &event)
            .map_err(std::io::Error::from)
            .and_then(|_| self.out.write_all(b"\n"));
        if let Err(e) = written {
            warn!("Could not write event: {e}");
        }
    }
}
