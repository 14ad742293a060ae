//! # Book Metadata Lookup
//!
//! Fetches book details from a public metadata service to pre-fill the
//! create/edit form.
//!
//! ## Overview
//!
//! This module handles:
//! - Title search against the Google Books volumes API
//! - Mapping the first hit into optional form fields
//! - Merging looked-up fields into a `BookForm`
//!
//! Nothing here touches storage; the user still saves the form.

pub mod enrichment;
pub mod error;
pub mod providers;

pub use enrichment::{apply_metadata, prefill_form};
pub use error::{MetadataError, Result};
pub use providers::{BookMetadata, BookMetadataProvider, GoogleBooksClient};
