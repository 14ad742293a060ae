//! Form pre-population from a metadata lookup

use crate::error::Result;
use crate::providers::{BookMetadata, BookMetadataProvider};
use core_catalog::BookForm;
use tracing::debug;

/// Copy every non-empty looked-up field into the form
///
/// Fields the lookup left empty keep what the user typed. Returns how many
/// fields changed.
pub fn apply_metadata(form: &mut BookForm, metadata: &BookMetadata) -> usize {
    let mut changed = 0;

    let mut set = |field: &mut String, value: Option<String>| {
        if let Some(value) = value.filter(|v| !v.trim().is_empty()) {
            if *field != value {
                *field = value;
                changed += 1;
            }
        }
    };

    set(&mut form.title, metadata.title.clone());
    set(&mut form.author, metadata.author.clone());
    set(&mut form.description, metadata.description.clone());
    set(&mut form.year, metadata.year.map(|year| year.to_string()));
    set(&mut form.category, metadata.category.clone());
    set(&mut form.image, metadata.thumbnail.clone());

    changed
}

/// Look up the form's current title and merge the result into the form
///
/// Returns `false` when nothing was found.
pub async fn prefill_form(provider: &dyn BookMetadataProvider, form: &mut BookForm) -> Result<bool> {
    let Some(metadata) = provider.lookup(&form.title).await? else {
        return Ok(false);
    };

    let changed = apply_metadata(form, &metadata);
    debug!(changed, "Applied looked-up metadata to form");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct StaticProvider(Option<BookMetadata>);

    #[async_trait]
    impl BookMetadataProvider for StaticProvider {
        async fn lookup(&self, _title: &str) -> Result<Option<BookMetadata>> {
            Ok(self.0.clone())
        }
    }

    fn typed_form() -> BookForm {
        BookForm {
            title: "dune".to_string(),
            author: "F. Herbert".to_string(),
            category: "Sci-Fi".to_string(),
            year: String::new(),
            description: String::new(),
            image: String::new(),
        }
    }

    #[test]
    fn test_apply_overwrites_only_present_fields() {
        let mut form = typed_form();
        let metadata = BookMetadata {
            title: Some("Dune".to_string()),
            author: Some("Frank Herbert".to_string()),
            year: Some(1965),
            category: Some("  ".to_string()),
            ..BookMetadata::default()
        };

        let changed = apply_metadata(&mut form, &metadata);

        assert_eq!(changed, 3);
        assert_eq!(form.title, "Dune");
        assert_eq!(form.author, "Frank Herbert");
        assert_eq!(form.year, "1965");
        assert_eq!(form.category, "Sci-Fi");
        assert_eq!(form.image, "");
    }

    #[test]
    fn test_apply_empty_metadata_changes_nothing() {
        let mut form = typed_form();
        assert_eq!(apply_metadata(&mut form, &BookMetadata::default()), 0);
        assert_eq!(form, typed_form());
    }

    #[tokio::test]
    async fn test_prefill_form() {
        let provider = StaticProvider(Some(BookMetadata {
            thumbnail: Some("https://books.google.com/thumb".to_string()),
            ..BookMetadata::default()
        }));
        let mut form = typed_form();

        assert!(prefill_form(&provider, &mut form).await.unwrap());
        assert_eq!(form.image, "https://books.google.com/thumb");

        let mut untouched = typed_form();
        assert!(!prefill_form(&StaticProvider(None), &mut untouched).await.unwrap());
        assert_eq!(untouched, typed_form());
    }
}
