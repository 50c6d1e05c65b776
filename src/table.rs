//! Dense word × document matrix.
//!
//! Every (word, document) pair has a cell; a word absent from a document holds
//! `T::default()` (a structural zero). Memory is O(words × documents), which is
//! fine for the small samples this tool is meant for and nothing more.

use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub struct WordTable<T> {
    words: Vec<String>,
    index: HashMap<String, usize>,
    documents: Vec<String>,
    cells: Vec<T>,
}

impl<T: Copy + Default> WordTable<T> {
    /// Empty table with the given document columns.
    pub fn new(documents: Vec<String>) -> Self {
        Self {
            words: Vec::new(),
            index: HashMap::new(),
            documents,
            cells: Vec::new(),
        }
    }

    pub fn documents(&self) -> &[String] {
        &self.documents
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Number of word rows.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.index.contains_key(word)
    }

    pub fn row_index(&self, word: &str) -> Option<usize> {
        self.index.get(word).copied()
    }

    /// Values of `word` across all documents, in column order.
    pub fn row(&self, word: &str) -> Option<&[T]> {
        self.row_index(word).map(|i| self.row_at(i))
    }

    pub fn row_at(&self, row: usize) -> &[T] {
        let width = self.documents.len();
        &self.cells[row * width..(row + 1) * width]
    }

    pub fn rows(&self) -> impl Iterator<Item = (&str, &[T])> + '_ {
        self.words
            .iter()
            .enumerate()
            .map(move |(i, w)| (w.as_str(), self.row_at(i)))
    }

    /// Row index for `word`, appending a zero row if it is new.
    pub fn row_index_or_insert(&mut self, word: &str) -> usize {
        if let Some(&i) = self.index.get(word) {
            return i;
        }
        let i = self.words.len();
        self.words.push(word.to_owned());
        self.index.insert(word.to_owned(), i);
        self.cells
            .extend(std::iter::repeat_n(T::default(), self.documents.len()));
        i
    }

    pub fn cell_mut(&mut self, row: usize, document: usize) -> &mut T {
        let width = self.documents.len();
        &mut self.cells[row * width + document]
    }

    /// Appends a complete row. Returns `false` (and leaves the table untouched)
    /// when the word already exists or the row width does not match.
    pub fn push_row(&mut self, word: String, values: Vec<T>) -> bool {
        if values.len() != self.documents.len() || self.index.contains_key(&word) {
            return false;
        }
        self.index.insert(word.clone(), self.words.len());
        self.words.push(word);
        self.cells.extend(values);
        true
    }

    /// Same shape, cells transformed by `f(row, document, value)`.
    pub fn map_cells<U, F>(&self, mut f: F) -> WordTable<U>
    where
        U: Copy + Default,
        F: FnMut(usize, usize, T) -> U,
    {
        let width = self.documents.len();
        let cells = self
            .cells
            .iter()
            .enumerate()
            .map(|(i, &v)| f(i / width.max(1), i % width.max(1), v))
            .collect();
        WordTable {
            words: self.words.clone(),
            index: self.index.clone(),
            documents: self.documents.clone(),
            cells,
        }
    }

    /// New table holding only the rows selected by `rows`, in that order.
    pub fn select_rows(&self, rows: &[usize]) -> Self {
        let mut out = WordTable::new(self.documents.clone());
        for &r in rows {
            out.push_row(self.words[r].clone(), self.row_at(r).to_vec());
        }
        out
    }

    /// Rows whose word satisfies `keep`, original order preserved.
    pub fn filter_words<F>(&self, mut keep: F) -> Self
    where
        F: FnMut(&str) -> bool,
    {
        let rows: Vec<usize> = (0..self.words.len())
            .filter(|&i| keep(&self.words[i]))
            .collect();
        self.select_rows(&rows)
    }
}
