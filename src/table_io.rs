//! Reading and writing the persisted artifacts: frequency CSVs and word lists.
//!
//! Writers go through a temporary file in the destination directory that is
//! renamed into place only once fully written.

use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, ErrorKind, Write};
use std::path::Path;

use tempfile::NamedTempFile;

use crate::aggregate::RawTable;
use crate::error::{CompareError, Result};
use crate::table::WordTable;

/// Header of the column that holds per-word totals in raw-count CSVs.
pub const TOTAL_COUNT: &str = "total_count";

/// Opens `path` for buffered reading, mapping "not found" to
/// [`CompareError::MissingFile`].
pub fn open_input(path: &Path) -> Result<BufReader<File>> {
    match File::open(path) {
        Ok(f) => Ok(BufReader::new(f)),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            Err(CompareError::MissingFile(path.to_path_buf()))
        }
        Err(e) => Err(e.into()),
    }
}

/// Runs `write` against a temp file next to `path`, then renames it over `path`.
pub fn write_atomically<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut dyn Write) -> Result<()>,
{
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;

    let mut temp_file = NamedTempFile::new_in(parent)?;
    {
        let mut writer = BufWriter::new(temp_file.as_file_mut());
        write(&mut writer)?;
        writer.flush()?;
    }
    temp_file.persist(path).map_err(|e| e.error)?;
    Ok(())
}

fn write_table<T, F>(
    path: &Path,
    table: &WordTable<T>,
    extra: Option<(&str, &[u64])>,
    cell: F,
) -> Result<()>
where
    T: Copy + Default,
    F: Fn(T) -> String,
{
    write_atomically(path, |out| {
        let mut wtr = csv::Writer::from_writer(out);
        let mut header: Vec<&str> = Vec::with_capacity(table.documents().len() + 2);
        header.push("");
        header.extend(table.documents().iter().map(String::as_str));
        if let Some((name, _)) = extra {
            header.push(name);
        }
        wtr.write_record(&header)?;

        for (i, (word, row)) in table.rows().enumerate() {
            let mut record: Vec<String> = Vec::with_capacity(row.len() + 2);
            record.push(word.to_owned());
            record.extend(row.iter().map(|&v| cell(v)));
            if let Some((_, column)) = extra {
                record.push(column[i].to_string());
            }
            wtr.write_record(&record)?;
        }
        wtr.flush()?;
        Ok(())
    })
}

/// Writes a relative-frequency table: words as rows, documents as columns.
pub fn write_relative_table(path: &Path, table: &WordTable<f64>) -> Result<()> {
    write_table(path, table, None, |v| v.to_string())
}

/// Writes raw counts with the trailing `total_count` column.
pub fn write_raw_table(path: &Path, raw: &RawTable) -> Result<()> {
    write_table(path, &raw.counts, Some((TOTAL_COUNT, raw.totals.as_slice())), |v| {
        v.to_string()
    })
}

fn parse_f64(field: &str) -> Option<f64> {
    let field = field.trim();
    if field.is_empty() {
        return Some(0.0);
    }
    field.parse().ok()
}

fn parse_count(field: &str) -> Option<u64> {
    let field = field.trim();
    if field.is_empty() {
        return Some(0);
    }
    field.parse::<u64>().ok().or_else(|| {
        // Tools that store counts as floats write `2.0`.
        let v: f64 = field.parse().ok()?;
        (v >= 0.0 && v.fract() == 0.0 && v <= u64::MAX as f64).then_some(v as u64)
    })
}

/// Reads a CSV whose first column is the word and whose header names the
/// remaining columns. Empty cells read as zero.
fn read_table<T, F>(path: &Path, parse: F) -> Result<(Vec<String>, Vec<(String, Vec<T>)>)>
where
    F: Fn(&str) -> Option<T>,
{
    let reader = open_input(path)?;
    let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let header = rdr.headers()?.clone();
    if header.is_empty() {
        return Err(CompareError::format(path, 1, "missing header row"));
    }
    let columns: Vec<String> = header.iter().skip(1).map(String::from).collect();

    let mut rows = Vec::new();
    for (i, record) in rdr.records().enumerate() {
        let record = record?;
        let line = i + 2;
        if record.len() != header.len() {
            return Err(CompareError::format(
                path,
                line,
                format!("expected {} fields, found {}", header.len(), record.len()),
            ));
        }
        let word = record[0].to_owned();
        let mut values = Vec::with_capacity(columns.len());
        for (field, column) in record.iter().skip(1).zip(&columns) {
            let v = parse(field).ok_or_else(|| {
                CompareError::format(path, line, format!("bad value {field:?} in column {column:?}"))
            })?;
            values.push(v);
        }
        rows.push((word, values));
    }
    Ok((columns, rows))
}

fn duplicate_word(path: &Path, row: usize, word: &str) -> CompareError {
    CompareError::format(path, row + 2, format!("duplicate word {word:?}"))
}

/// Reads a relative-frequency CSV written by [`write_relative_table`].
pub fn read_relative_table(path: &Path) -> Result<WordTable<f64>> {
    let (documents, rows) = read_table(path, parse_f64)?;
    let mut table = WordTable::new(documents);
    for (i, (word, values)) in rows.into_iter().enumerate() {
        if !table.push_row(word.clone(), values) {
            return Err(duplicate_word(path, i, &word));
        }
    }
    Ok(table)
}

/// Reads a raw-count CSV; the last column must be `total_count`.
pub fn read_raw_table(path: &Path) -> Result<RawTable> {
    let (mut columns, rows) = read_table(path, parse_count)?;
    if columns.last().map(String::as_str) != Some(TOTAL_COUNT) {
        return Err(CompareError::format(
            path,
            1,
            format!("last column must be {TOTAL_COUNT:?}"),
        ));
    }
    columns.pop();

    let mut counts = WordTable::new(columns);
    let mut totals = Vec::with_capacity(rows.len());
    for (i, (word, mut values)) in rows.into_iter().enumerate() {
        let total = values.pop().unwrap_or_default();
        if !counts.push_row(word.clone(), values) {
            return Err(duplicate_word(path, i, &word));
        }
        totals.push(total);
    }
    Ok(RawTable { counts, totals })
}

/// Writes one word per line, in iteration order.
pub fn write_word_list<'a, I>(path: &Path, words: I) -> Result<()>
where
    I: IntoIterator<Item = &'a str>,
{
    write_atomically(path, |out| {
        for word in words {
            writeln!(out, "{word}")?;
        }
        Ok(())
    })
}

/// Streams the words of a list file, skipping blank lines.
pub fn read_word_list(path: &Path) -> Result<impl Iterator<Item = Result<String>>> {
    let reader = open_input(path)?;
    Ok(reader.lines().filter_map(|line| match line {
        Ok(l) => {
            let w = l.trim();
            (!w.is_empty()).then(|| Ok(w.to_owned()))
        }
        Err(e) => Some(Err(e.into())),
    }))
}
