//! Document-term corpus files.
//!
//! One document per line, whitespace separated:
//! `filename <ignored> word1 word2 ... wordN`. The second field is a
//! document total written by the exporting tool; it is never trusted.

use std::collections::HashSet;
use std::io::BufRead;
use std::path::Path;

use crate::error::{CompareError, Result};
use crate::table_io::open_input;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocTermRecord {
    pub name: String,
    pub words: Vec<String>,
}

impl DocTermRecord {
    pub fn new(name: impl Into<String>, words: &[&str]) -> Self {
        Self {
            name: name.into(),
            words: words.iter().map(|w| w.to_string()).collect(),
        }
    }
}

/// Parses a single line. Blank lines yield `Ok(None)`.
pub fn parse_record(line: &str) -> core::result::Result<Option<DocTermRecord>, &'static str> {
    let mut fields = line.split_whitespace();
    let Some(name) = fields.next() else {
        return Ok(None);
    };
    if fields.next().is_none() {
        return Err("expected `filename <total> word...`, found a single field");
    }
    Ok(Some(DocTermRecord {
        name: name.to_owned(),
        words: fields.map(String::from).collect(),
    }))
}

/// Reads every record of a document-term file.
///
/// Fails on the first malformed line and on repeated document names, since a
/// repeated name would produce two table columns with the same header.
pub fn read_docterms(path: &Path) -> Result<Vec<DocTermRecord>> {
    let reader = open_input(path)?;
    let mut records = Vec::new();
    let mut seen = HashSet::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let record = match parse_record(&line) {
            Ok(Some(r)) => r,
            Ok(None) => continue,
            Err(reason) => return Err(CompareError::format(path, i + 1, reason)),
        };
        if !seen.insert(record.name.clone()) {
            return Err(CompareError::format(
                path,
                i + 1,
                format!("duplicate document name {:?}", record.name),
            ));
        }
        records.push(record);
    }
    Ok(records)
}
