use tokio::sync::Mutex;

use super::models::{Book, UpdateBook};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("book {0} not found")]
    NotFound(i64),
}

/// In-memory, insertion-ordered book collection.
///
/// Every operation runs under the same lock, so mutations are serialized and
/// reads never observe a half-applied change.
#[derive(Debug, Default)]
pub struct BookStore {
    books: Mutex<Vec<Book>>,
}

impl BookStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_books(books: Vec<Book>) -> Self {
        Self {
            books: Mutex::new(books),
        }
    }

    /// Store holding the two catalogue entries the service starts with.
    pub fn seeded() -> Self {
        Self::with_books(vec![
            Book::new(1, "1984", "George Orwell"),
            Book::new(2, "The Great Gatsby", "F. Scott Fitzgerald"),
        ])
    }

    pub async fn len(&self) -> usize {
        self.books.lock().await.len()
    }

    pub async fn list(&self) -> Vec<Book> {
        self.books.lock().await.clone()
    }

    pub async fn get(&self, id: i64) -> Result<Book, StoreError> {
        self.books
            .lock()
            .await
            .iter()
            .find(|book| book.id == id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    /// Append `book` verbatim. Ids are not checked for collisions.
    pub async fn create(&self, book: Book) -> Book {
        self.books.lock().await.push(book.clone());
        book
    }

    pub async fn update(&self, id: i64, input: UpdateBook) -> Result<Book, StoreError> {
        let mut books = self.books.lock().await;
        let book = books
            .iter_mut()
            .find(|book| book.id == id)
            .ok_or(StoreError::NotFound(id))?;

        book.title = input.title;
        book.author = input.author;
        Ok(book.clone())
    }

    /// Remove the first book with `id`, keeping the others in order.
    pub async fn delete(&self, id: i64) -> Result<(), StoreError> {
        let mut books = self.books.lock().await;
        let index = books
            .iter()
            .position(|book| book.id == id)
            .ok_or(StoreError::NotFound(id))?;

        books.remove(index);
        Ok(())
    }
}
