#![doc = include_str!("../README.md")]

/// Directory scanner configuration
pub mod config;
/// W3C datetime parsing and formatting
pub mod date;
/// Sitemap URL entries
pub mod entry;
mod error;
/// Directory scanner
pub mod scanner;
/// Sitemap document parser and generator
pub mod sitemap;
/// Loosely typed field values
pub mod value;

pub use config::{ExtensionFilter, FieldSource, FileContext, SITEMAP_FILE, ScanOptions};
pub use date::{format_w3c, parse_w3c};
pub use entry::{DEFAULT_PRIORITY, Entry};
pub use error::{Result, SitemapError};
pub use scanner::{SiteScanner, generate};
pub use sitemap::{Sitemap, SitemapItem, parse_sitemap, read_sitemap};
pub use value::FieldValue;
