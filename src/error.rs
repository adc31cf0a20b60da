//! Sitemap error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while parsing, building or generating a sitemap
#[derive(Error, Debug)]
pub enum SitemapError {
    /// Sitemap contents could not be used to build a document
    #[error("Invalid sitemap contents: {0}")]
    InvalidSitemapContents(String),

    /// Value of an unsupported type was given as a last-modified date
    #[error("Invalid last modified type: {0}")]
    InvalidLastModifiedType(String),

    /// Text is not in any of the accepted W3C datetime forms
    #[error("Invalid date format: {0}")]
    InvalidDateFormat(String),

    /// Priority is not a number
    #[error("Invalid priority: {0}")]
    InvalidPriority(String),

    /// Listing a directory failed
    #[error("Failed to read directory {}: {source}", path.display())]
    ReadDir {
        /// Directory being listed
        path: PathBuf,
        /// Underlying IO error
        source: std::io::Error,
    },

    /// Reading metadata of a directory entry failed
    #[error("Failed to stat {}: {source}", path.display())]
    Stat {
        /// Entry being inspected
        path: PathBuf,
        /// Underlying IO error
        source: std::io::Error,
    },

    /// Reading a sitemap file failed
    #[error("Failed to read {}: {source}", path.display())]
    FileRead {
        /// File being read
        path: PathBuf,
        /// Underlying IO error
        source: std::io::Error,
    },

    /// Malformed sitemap XML
    #[error("XML parse error: {0}")]
    Parse(String),
}

/// Result type alias using SitemapError
pub type Result<T> = std::result::Result<T, SitemapError>;
