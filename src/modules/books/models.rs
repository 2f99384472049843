use serde::{Deserialize, Serialize};

/// A catalogue entry. The id is chosen by the caller.
///
/// Fields missing from a request body fall back to `0` or `""`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Book {
    /// Caller-assigned identifier
    pub id: i64,
    /// Title of the book
    pub title: String,
    /// Author of the book
    pub author: String,
}

impl Book {
    pub fn new(id: i64, title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            author: author.into(),
        }
    }
}

/// Request model for replacing a book's title and author.
///
/// An `id` in the body is accepted and ignored; the path id wins. A missing
/// title or author replaces the stored value with an empty string.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateBook {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub title: String,
    pub author: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_book_takes_zero_values() {
        let book: Book = serde_json::from_str(r#"{"title":"t","author":"a"}"#).unwrap();
        assert_eq!(book, Book::new(0, "t", "a"));
    }

    #[test]
    fn test_wrong_field_type_is_rejected() {
        assert!(serde_json::from_str::<Book>(r#"{"id":"three"}"#).is_err());
        assert!(serde_json::from_str::<UpdateBook>(r#"{"title":7}"#).is_err());
    }

    #[test]
    fn test_empty_update_blanks_fields() {
        let update: UpdateBook = serde_json::from_str("{}").unwrap();
        assert_eq!(update.id, None);
        assert_eq!(update.title, "");
        assert_eq!(update.author, "");
    }
}
