//! # DataStore Module
//!
//! This module provides a local, append-only cache for documents submitted
//! for highlighting. Documents are downloaded once and stored on disk under a
//! file name derived from the submission title.
//!
//! The cache is exposed through the [`DocumentCache`] trait so callers can
//! substitute it in tests; [`FsDocumentCache`] is the filesystem backed
//! implementation.

mod datastore;
mod domain;

pub use datastore::fs::FsDocumentCache;
pub use datastore::DocumentCache;
pub use domain::{cache_key, CachedDocument, DOCUMENT_EXTENSION};
