//! User-curated favorites, unique by book key and kept in insertion order.
//!
//! [`Favorites`] is a plain in-memory sequence. Persistence lives in
//! [`storage`]: callers load once at startup with [`load_favorites`] and call
//! [`save_favorites`] after every mutation.

mod storage;

pub use storage::{
    FAVORITES_KEY, FileStorage, KeyValueStorage, MemoryStorage, StorageError, default_data_dir,
    load_favorites, save_favorites,
};

use serde::{Deserialize, Serialize};

use crate::book::Book;

/// Result of a [`Favorites::toggle`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoriteChange {
    Added,
    Removed,
}

/// Ordered list of favorite books with no duplicate keys.
///
/// Serializes as a plain JSON array. Deserialization goes through
/// [`Favorites::from_books`], so duplicate keys are dropped there too.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Book>", into = "Vec<Book>")]
pub struct Favorites {
    books: Vec<Book>,
}

impl From<Vec<Book>> for Favorites {
    fn from(books: Vec<Book>) -> Self {
        Self::from_books(books)
    }
}

impl From<Favorites> for Vec<Book> {
    fn from(favorites: Favorites) -> Self {
        favorites.books
    }
}

impl Favorites {
    /// Creates an empty favorites list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a favorites list from books, dropping later duplicates of a key.
    #[must_use]
    pub fn from_books(books: Vec<Book>) -> Self {
        let mut favorites = Self::new();
        for book in books {
            if !favorites.contains_key(&book.key) {
                favorites.books.push(book);
            }
        }
        favorites
    }

    /// Removes the book if a favorite shares its key, otherwise appends it.
    pub fn toggle(&mut self, book: &Book) -> FavoriteChange {
        if self.contains_key(&book.key) {
            self.books.retain(|favorite| favorite.key != book.key);
            FavoriteChange::Removed
        } else {
            self.books.push(book.clone());
            FavoriteChange::Added
        }
    }

    /// True iff some favorite shares the book's key.
    #[must_use]
    pub fn is_favorite(&self, book: &Book) -> bool {
        self.contains_key(&book.key)
    }

    /// True iff a favorite has this key.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.books.iter().any(|favorite| favorite.key == key)
    }

    /// Looks up a favorite by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Book> {
        self.books.iter().find(|favorite| favorite.key == key)
    }

    /// Removes the favorite with this key, returning it if present.
    pub fn remove(&mut self, key: &str) -> Option<Book> {
        let index = self.books.iter().position(|favorite| favorite.key == key)?;
        Some(self.books.remove(index))
    }

    /// Removes every favorite.
    pub fn clear(&mut self) {
        self.books.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.books.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Book> {
        self.books.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Book] {
        &self.books
    }
}

impl<'a> IntoIterator for &'a Favorites {
    type Item = &'a Book;
    type IntoIter = std::slice::Iter<'a, Book>;

    fn into_iter(self) -> Self::IntoIter {
        self.books.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book(key: &str) -> Book {
        Book::new(key, format!("Title {key}"))
    }

    #[test]
    fn test_toggle_adds_then_removes() {
        let mut favorites = Favorites::new();
        assert_eq!(favorites.toggle(&book("a")), FavoriteChange::Added);
        assert!(favorites.is_favorite(&book("a")));
        assert_eq!(favorites.toggle(&book("a")), FavoriteChange::Removed);
        assert!(!favorites.is_favorite(&book("a")));
        assert!(favorites.is_empty());
    }

    #[test]
    fn test_toggle_twice_restores_prior_state() {
        let mut favorites = Favorites::from_books(vec![book("a"), book("b"), book("c")]);
        let before = favorites.clone();

        for key in ["a", "b", "c", "d"] {
            favorites.toggle(&book(key));
            favorites.toggle(&book(key));
            assert_eq!(favorites, before, "even toggles of {key} must be a no-op");
        }
    }

    #[test]
    fn test_remove_preserves_relative_order() {
        let mut favorites = Favorites::from_books(vec![book("a"), book("b"), book("c")]);
        favorites.toggle(&book("b"));
        let keys: Vec<&str> = favorites.iter().map(|b| b.key.as_str()).collect();
        assert_eq!(keys, ["a", "c"]);
    }

    #[test]
    fn test_add_appends_to_end() {
        let mut favorites = Favorites::from_books(vec![book("a")]);
        favorites.toggle(&book("z"));
        assert_eq!(favorites.as_slice().last().unwrap().key, "z");
    }

    #[test]
    fn test_is_favorite_matches_by_key_only() {
        let mut favorites = Favorites::new();
        favorites.toggle(&Book::new("/works/OL1W", "Dune"));
        let same_key = Book::new("/works/OL1W", "Dune (Deluxe Edition)");
        assert!(favorites.is_favorite(&same_key));
    }

    #[test]
    fn test_from_books_drops_duplicate_keys() {
        let favorites = Favorites::from_books(vec![book("a"), book("b"), book("a")]);
        assert_eq!(favorites.len(), 2);
        assert_eq!(favorites.get("a").unwrap().title, "Title a");
    }

    #[test]
    fn test_remove_and_clear() {
        let mut favorites = Favorites::from_books(vec![book("a"), book("b")]);
        assert_eq!(favorites.remove("a").unwrap().key, "a");
        assert!(favorites.remove("a").is_none());
        favorites.clear();
        assert!(favorites.is_empty());
    }

    #[test]
    fn test_serializes_as_plain_array() {
        let favorites = Favorites::from_books(vec![book("a")]);
        let json = serde_json::to_string(&favorites).unwrap();
        assert_eq!(json, r#"[{"key":"a","title":"Title a"}]"#);
    }

    #[test]
    fn test_deserialize_drops_duplicate_keys() {
        let favorites: Favorites = serde_json::from_str(
            r#"[{"key":"a","title":"First"},{"key":"b","title":"B"},{"key":"a","title":"Second"}]"#,
        )
        .unwrap();
        let titles: Vec<&str> = favorites.iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, ["First", "B"]);
    }
}
