//! Multi-index book catalog
//!
//! Books live in insertion order in one list; title, author, genre and
//! author+genre indexes map keys to titles and are kept in step on every
//! insert, removal and copy-count change.

mod analysis;

pub use analysis::*;

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// On-disk shape: `[title, author, genre, copies]`
type BookRecord = (String, String, String, u32);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BookRecord", into = "BookRecord")]
pub struct Book {
    pub title: String,
    pub author: String,
    pub genre: String,
    pub copies: u32,
}

impl Book {
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        genre: impl Into<String>,
        copies: u32,
    ) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            genre: genre.into(),
            copies,
        }
    }
}

impl From<BookRecord> for Book {
    fn from((title, author, genre, copies): BookRecord) -> Self {
        Self {
            title,
            author,
            genre,
            copies,
        }
    }
}

impl From<Book> for BookRecord {
    fn from(book: Book) -> Self {
        (book.title, book.author, book.genre, book.copies)
    }
}

/// Search criteria; unset fields are not constrained
#[derive(Debug, Clone, Default)]
pub struct BookQuery {
    pub title: Option<String>,
    pub author: Option<String>,
    pub genre: Option<String>,
}

impl BookQuery {
    pub fn by_title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Default::default()
        }
    }

    pub fn by_author(author: impl Into<String>) -> Self {
        Self {
            author: Some(author.into()),
            ..Default::default()
        }
    }

    pub fn by_genre(genre: impl Into<String>) -> Self {
        Self {
            genre: Some(genre.into()),
            ..Default::default()
        }
    }

    pub fn genre(mut self, genre: impl Into<String>) -> Self {
        self.genre = Some(genre.into());
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct Library {
    /// Titles in insertion order
    order: Vec<String>,
    by_title: HashMap<String, Book>,
    by_author: BTreeMap<String, BTreeSet<String>>,
    by_genre: BTreeMap<String, BTreeSet<String>>,
    by_author_genre: BTreeMap<String, BTreeMap<String, BTreeSet<String>>>,
}

fn unindex(index: &mut BTreeMap<String, BTreeSet<String>>, key: &str, title: &str) {
    if let Some(titles) = index.get_mut(key) {
        titles.remove(title);
        if titles.is_empty() {
            index.remove(key);
        }
    }
}

impl Library {
    pub fn new() -> Self {
        Self::default()
    }

    fn index(&mut self, book: &Book) {
        self.by_author
            .entry(book.author.clone())
            .or_default()
            .insert(book.title.clone());
        self.by_genre
            .entry(book.genre.clone())
            .or_default()
            .insert(book.title.clone());
        self.by_author_genre
            .entry(book.author.clone())
            .or_default()
            .entry(book.genre.clone())
            .or_default()
            .insert(book.title.clone());
    }

    /// Add a book. Titles are unique within the catalog.
    pub fn add_book(
        &mut self,
        title: &str,
        author: &str,
        genre: &str,
        copies: u32,
    ) -> Result<Book> {
        if self.by_title.contains_key(title) {
            return Err(Error::BookExists(title.to_string()));
        }
        let book = Book::new(title, author, genre, copies);
        self.index(&book);
        self.order.push(book.title.clone());
        self.by_title.insert(book.title.clone(), book.clone());
        Ok(book)
    }

    /// Remove a book from the catalog and every index
    pub fn remove_book(&mut self, title: &str) -> Option<Book> {
        let book = self.by_title.remove(title)?;
        self.order.retain(|t| t != title);

        unindex(&mut self.by_author, &book.author, title);
        unindex(&mut self.by_genre, &book.genre, title);
        if let Some(genres) = self.by_author_genre.get_mut(&book.author) {
            unindex(genres, &book.genre, title);
            if genres.is_empty() {
                self.by_author_genre.remove(&book.author);
            }
        }
        Some(book)
    }

    /// Take one copy out; `None` if the title is unknown or none are left
    pub fn borrow_book(&mut self, title: &str) -> Option<Book> {
        let book = self.by_title.get_mut(title)?;
        if book.copies == 0 {
            return None;
        }
        book.copies -= 1;
        Some(book.clone())
    }

    /// Put one copy back
    pub fn return_book(&mut self, title: &str) -> Result<Book> {
        let book = self
            .by_title
            .get_mut(title)
            .ok_or_else(|| Error::BookNotFound(title.to_string()))?;
        book.copies += 1;
        Ok(book.clone())
    }

    pub fn get(&self, title: &str) -> Option<&Book> {
        self.by_title.get(title)
    }

    fn books_for<'a>(&'a self, titles: impl IntoIterator<Item = &'a String>) -> Vec<Book> {
        titles
            .into_iter()
            .filter_map(|t| self.by_title.get(t))
            .cloned()
            .collect()
    }

    /// Find books matching every set field of `query`, in title order.
    /// An empty query matches nothing.
    pub fn search(&self, query: &BookQuery) -> Vec<Book> {
        let candidates: Vec<Book> = match (&query.author, &query.genre) {
            (Some(author), Some(genre)) => self
                .by_author_genre
                .get(author)
                .and_then(|genres| genres.get(genre))
                .map(|titles| self.books_for(titles))
                .unwrap_or_default(),
            (Some(author), None) => self
                .by_author
                .get(author)
                .map(|titles| self.books_for(titles))
                .unwrap_or_default(),
            (None, Some(genre)) => self
                .by_genre
                .get(genre)
                .map(|titles| self.books_for(titles))
                .unwrap_or_default(),
            (None, None) => match &query.title {
                Some(title) => self.get(title).cloned().into_iter().collect(),
                None => Vec::new(),
            },
        };

        match &query.title {
            Some(title) => candidates.into_iter().filter(|b| &b.title == title).collect(),
            None => candidates,
        }
    }

    /// All books in insertion order
    pub fn list_books(&self) -> Vec<Book> {
        self.books_for(&self.order)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Write the catalog as a JSON array of `[title, author, genre, copies]`
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string(&self.list_books())?;
        fs::write(path, content)?;
        tracing::debug!("Saved {} books to {}", self.len(), path.display());
        Ok(())
    }

    /// Replace the catalog with the contents of `path`, rebuilding all indexes
    pub fn load_from_file(&mut self, path: &Path) -> Result<()> {
        let content = fs::read_to_string(path)?;
        let books: Vec<Book> = serde_json::from_str(&content)?;

        let mut library = Library::new();
        for book in books {
            library.add_book(&book.title, &book.author, &book.genre, book.copies)?;
        }
        *self = library;
        tracing::debug!("Loaded {} books from {}", self.len(), path.display());
        Ok(())
    }

    pub fn authors(&self) -> impl Iterator<Item = (&str, usize)> {
        self.by_author.iter().map(|(a, titles)| (a.as_str(), titles.len()))
    }

    pub fn genres(&self) -> impl Iterator<Item = (&str, usize)> {
        self.by_genre.iter().map(|(g, titles)| (g.as_str(), titles.len()))
    }

    /// Genres of one author, in sorted order
    pub fn genres_of(&self, author: &str) -> Vec<&str> {
        self.by_author_genre
            .get(author)
            .map(|genres| genres.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }
}
