//! Catalog analysis

use serde::Serialize;
use std::cmp::Reverse;

use super::{Book, Library};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LibraryStats {
    /// Author with the most titles (alphabetically first on ties)
    pub popular_author: String,
    /// Genre with the most titles (alphabetically first on ties)
    pub popular_genre: String,
    /// Book with the most copies (earliest added on ties)
    pub max_copies: Book,
    /// Book with the fewest copies (earliest added on ties)
    pub min_copies: Book,
}

fn most_common<'a>(counts: impl Iterator<Item = (&'a str, usize)>) -> Option<String> {
    counts
        .min_by_key(|(_, count)| Reverse(*count))
        .map(|(name, _)| name.to_string())
}

impl Library {
    /// `None` for an empty catalog
    pub fn analyze(&self) -> Option<LibraryStats> {
        let books = self.list_books();
        let max_copies = books.iter().min_by_key(|b| Reverse(b.copies))?.clone();
        let min_copies = books.iter().min_by_key(|b| b.copies)?.clone();

        Some(LibraryStats {
            popular_author: most_common(self.authors())?,
            popular_genre: most_common(self.genres())?,
            max_copies,
            min_copies,
        })
    }
}
