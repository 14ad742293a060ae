//! Domain models for the book catalog
//!
//! `Book` is the only stored entity. `BookDraft` carries every field except the
//! store-assigned id and is what create/update accept. `BookForm` mirrors the
//! edit form, where the year is still free text.

use bridge_traits::database::{QueryRow, QueryValue};
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// ID Types
// =============================================================================

/// Store-assigned book identifier
///
/// Auto-increment rowid on the relational path, timestamp-derived on the
/// fallback path. Serialized as a bare integer.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct BookId(pub i64);

impl BookId {
    pub fn value(self) -> i64 {
        self.0
    }
}

impl From<i64> for BookId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// Book
// =============================================================================

/// A catalogued book
///
/// Text fields are free-form. The relational schema rejects NULLs; the
/// fallback store keeps whatever it was given, so missing fields in a persisted
/// blob decode as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub category: String,
    pub year: i32,
    pub description: String,
    pub image: String,
}

impl Book {
    /// Attach an id to a draft
    pub fn from_draft(id: BookId, draft: BookDraft) -> Self {
        Self {
            id,
            title: draft.title,
            author: draft.author,
            category: draft.category,
            year: draft.year,
            description: draft.description,
            image: draft.image,
        }
    }

    /// Every field except the id
    pub fn draft(&self) -> BookDraft {
        BookDraft {
            title: self.title.clone(),
            author: self.author.clone(),
            category: self.category.clone(),
            year: self.year,
            description: self.description.clone(),
            image: self.image.clone(),
        }
    }

    /// Replace every field except the id
    pub fn apply(&mut self, draft: BookDraft) {
        self.title = draft.title;
        self.author = draft.author;
        self.category = draft.category;
        self.year = draft.year;
        self.description = draft.description;
        self.image = draft.image;
    }

    /// Map a `books` row into a `Book`
    ///
    /// Fails when a column is missing or has the wrong type.
    pub fn from_row(row: &QueryRow) -> Result<Self, String> {
        let id = integer_column(row, "id")?;
        let year = integer_column(row, "year")?;
        let year = i32::try_from(year).map_err(|_| format!("year {} out of range", year))?;

        Ok(Self {
            id: BookId(id),
            title: text_column(row, "title")?,
            author: text_column(row, "author")?,
            category: text_column(row, "category")?,
            year,
            description: text_column(row, "description")?,
            image: text_column(row, "image")?,
        })
    }
}

fn integer_column(row: &QueryRow, name: &str) -> Result<i64, String> {
    row.get(name)
        .and_then(QueryValue::as_i64)
        .ok_or_else(|| format!("column `{}` is missing or not an integer", name))
}

fn text_column(row: &QueryRow, name: &str) -> Result<String, String> {
    row.get(name)
        .and_then(QueryValue::as_str)
        .map(str::to_string)
        .ok_or_else(|| format!("column `{}` is missing or not text", name))
}

// =============================================================================
// BookDraft
// =============================================================================

/// Book fields without the id, as accepted by create and update
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookDraft {
    pub title: String,
    pub author: String,
    pub category: String,
    pub year: i32,
    pub description: String,
    pub image: String,
}

impl BookDraft {
    pub fn new(title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            ..Self::default()
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_year(mut self, year: i32) -> Self {
        self.year = year;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }

    /// Application-level validation applied before saving a form
    ///
    /// The storage layer itself never calls this.
    pub fn validate(&self) -> Result<(), (&'static str, String)> {
        if self.title.trim().is_empty() {
            return Err(("title", "Book title cannot be empty".to_string()));
        }

        if self.author.trim().is_empty() {
            return Err(("author", "Book author cannot be empty".to_string()));
        }

        Ok(())
    }

    /// Positional parameters in schema column order
    pub(crate) fn params(&self) -> Vec<QueryValue> {
        vec![
            QueryValue::Text(self.title.clone()),
            QueryValue::Text(self.author.clone()),
            QueryValue::Text(self.category.clone()),
            QueryValue::Integer(i64::from(self.year)),
            QueryValue::Text(self.description.clone()),
            QueryValue::Text(self.image.clone()),
        ]
    }
}

// =============================================================================
// BookForm
// =============================================================================

/// Edit-form state; every field is text as typed by the user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookForm {
    pub title: String,
    pub author: String,
    pub category: String,
    pub year: String,
    pub description: String,
    pub image: String,
}

impl BookForm {
    /// Pre-fill the form for editing an existing book
    pub fn from_book(book: &Book) -> Self {
        Self {
            title: book.title.clone(),
            author: book.author.clone(),
            category: book.category.clone(),
            year: book.year.to_string(),
            description: book.description.clone(),
            image: book.image.clone(),
        }
    }

    /// Convert the form into a draft
    ///
    /// An unparsable year becomes `0`. Only an empty image is replaced by
    /// `placeholder_image`; whitespace is kept as typed.
    pub fn into_draft(self, placeholder_image: &str) -> BookDraft {
        let year = Self::parse_year(&self.year);
        let image = if self.image.is_empty() {
            placeholder_image.to_string()
        } else {
            self.image
        };

        BookDraft {
            title: self.title,
            author: self.author,
            category: self.category,
            year,
            description: self.description,
            image,
        }
    }

    /// Leading-integer parse of the year field, `0` when there is none
    ///
    /// A digit run too large for `i32` also gives `0`, since the column cannot
    /// hold it.
    pub fn parse_year(input: &str) -> i32 {
        let trimmed = input.trim();
        let (sign, digits) = match trimmed.strip_prefix('-') {
            Some(rest) => (-1, rest),
            None => (1, trimmed.strip_prefix('+').unwrap_or(trimmed)),
        };

        let end = digits
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(digits.len());

        digits[..end]
            .parse::<i32>()
            .map(|year| sign * year)
            .unwrap_or(0)
    }
}
