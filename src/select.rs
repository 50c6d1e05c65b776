//! Subsetting a document-term file, by a list of filenames or at random.

use std::collections::HashSet;
use std::io::BufRead;
use std::path::Path;

use log::warn;
use rand::Rng;
use rand::seq::index;

use crate::error::{CompareError, Result};
use crate::events::{Event, Reporter};
use crate::table_io::{open_input, read_word_list, write_atomically};

/// Copies every line of `docterms` whose filename is listed in `filenames`
/// into `output`, keeping the original line order and content.
///
/// Returns the number of lines written.
pub fn select_documents(
    filenames: &Path,
    docterms: &Path,
    output: &Path,
    reporter: &mut dyn Reporter,
) -> Result<usize> {
    let wanted: HashSet<String> = read_word_list(filenames)?.collect::<Result<_>>()?;
    let reader = open_input(docterms)?;

    let mut found: HashSet<String> = HashSet::new();
    write_atomically(output, |out| {
        for line in reader.lines() {
            let line = line?;
            let Some(name) = line.split_whitespace().next() else {
                continue;
            };
            if wanted.contains(name) {
                found.insert(name.to_owned());
                writeln!(out, "{line}")?;
            }
        }
        Ok(())
    })?;

    let missing = wanted.len() - found.len();
    if missing > 0 {
        warn!(
            "{missing} listed filenames not found in {}",
            docterms.display()
        );
    }
    let selected = found.len();
    reporter.report(Event::DocumentsSelected {
        requested: wanted.len(),
        selected,
        path: output.to_path_buf(),
    });
    Ok(selected)
}

/// Copies `count` documents of `docterms`, chosen uniformly at random
/// without replacement, into `output`. Chosen lines keep their file order.
/// Blank lines are not documents.
///
/// Returns the number of lines written.
pub fn sample_documents<R: Rng + ?Sized>(
    docterms: &Path,
    count: usize,
    output: &Path,
    rng: &mut R,
    reporter: &mut dyn Reporter,
) -> Result<usize> {
    let mut documents = Vec::new();
    for line in open_input(docterms)?.lines() {
        let line = line?;
        if !line.trim().is_empty() {
            documents.push(line);
        }
    }
    if count > documents.len() {
        return Err(CompareError::SampleTooLarge {
            requested: count,
            available: documents.len(),
        });
    }

    let mut chosen = index::sample(rng, documents.len(), count).into_vec();
    chosen.sort_unstable();
    write_atomically(output, |out| {
        for &i in &chosen {
            writeln!(out, "{}", documents[i])?;
        }
        Ok(())
    })?;

    reporter.report(Event::DocumentsSelected {
        requested: count,
        selected: chosen.len(),
        path: output.to_path_buf(),
    });
    Ok(chosen.len())
}
