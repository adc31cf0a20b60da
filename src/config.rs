//! Directory scanner configuration

use crate::value::FieldValue;
use crate::{Result, SitemapError};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::fmt;
use std::fs::Metadata;
use std::path::Path;
use std::sync::Arc;

/// Name of the sitemap file picked up when [`ScanOptions::include_sitemap`] is set
pub const SITEMAP_FILE: &str = "sitemap.xml";

/// Callback deciding whether a file name is eligible
pub type NameFilterFn = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// Callback computing a field value for a scanned file
pub type FieldFn = Arc<dyn Fn(&FileContext<'_>) -> FieldValue + Send + Sync>;

/// What the scanner knows about the file an entry is being built for
pub struct FileContext<'a> {
    /// URL of the entry
    pub url: &'a str,
    /// Filesystem metadata of the file
    pub metadata: &'a Metadata,
    /// File name, without directory
    pub file_name: &'a str,
    /// Full path of the file
    pub path: &'a Path,
    /// URL prefix of the directory holding the file
    pub prefix: &'a str,
    /// Options of the running scan
    pub options: &'a ScanOptions,
}

/// Which directory entries are turned into sitemap entries
#[derive(Clone)]
pub enum ExtensionFilter {
    /// Keep names whose extension is in the list; names without an extension
    /// are always kept. The leading dot is optional.
    Extensions(Vec<String>),
    /// Keep names accepted by the callback
    Custom(NameFilterFn),
}

impl ExtensionFilter {
    /// Build a filter from a callback
    pub fn custom(filter: impl Fn(&str) -> bool + Send + Sync + 'static) -> Self {
        ExtensionFilter::Custom(Arc::new(filter))
    }

    /// Whether a directory entry name passes the filter
    pub fn accepts(&self, name: &str) -> bool {
        match self {
            ExtensionFilter::Extensions(list) => match Path::new(name).extension() {
                None => true,
                Some(ext) => {
                    let ext = ext.to_string_lossy();
                    list.iter()
                        .any(|allowed| allowed.strip_prefix('.').unwrap_or(allowed) == ext)
                }
            },
            ExtensionFilter::Custom(filter) => filter(name),
        }
    }
}

impl Default for ExtensionFilter {
    fn default() -> Self {
        ExtensionFilter::Extensions(vec![".html".to_string(), ".htm".to_string()])
    }
}

impl fmt::Debug for ExtensionFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtensionFilter::Extensions(list) => f.debug_tuple("Extensions").field(list).finish(),
            ExtensionFilter::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Where an entry field takes its value from
#[derive(Clone, Default)]
pub enum FieldSource {
    /// Leave the field at its default
    #[default]
    Unset,
    /// Modification time of the file
    FileModified,
    /// The same value for every entry
    Value(FieldValue),
    /// Computed per file
    Compute(FieldFn),
}

impl FieldSource {
    /// Build a source from a callback
    pub fn compute(f: impl Fn(&FileContext<'_>) -> FieldValue + Send + Sync + 'static) -> Self {
        FieldSource::Compute(Arc::new(f))
    }

    /// Resolve the value for one file
    ///
    /// Fails with [`SitemapError::Stat`] when the platform cannot report the
    /// modification time asked for by [`FieldSource::FileModified`].
    pub fn resolve(&self, ctx: &FileContext<'_>) -> Result<FieldValue> {
        let value = match self {
            FieldSource::Unset => FieldValue::Absent,
            FieldSource::FileModified => {
                let modified = ctx.metadata.modified().map_err(|source| SitemapError::Stat {
                    path: ctx.path.to_path_buf(),
                    source,
                })?;
                FieldValue::Date(modified.into())
            }
            FieldSource::Value(value) => value.clone(),
            FieldSource::Compute(f) => f(ctx),
        };
        Ok(value)
    }
}

impl From<FieldValue> for FieldSource {
    fn from(value: FieldValue) -> Self {
        FieldSource::Value(value)
    }
}

impl From<&str> for FieldSource {
    fn from(value: &str) -> Self {
        FieldSource::Value(value.into())
    }
}

impl From<String> for FieldSource {
    fn from(value: String) -> Self {
        FieldSource::Value(value.into())
    }
}

impl From<f64> for FieldSource {
    fn from(value: f64) -> Self {
        FieldSource::Value(value.into())
    }
}

impl From<DateTime<Utc>> for FieldSource {
    fn from(value: DateTime<Utc>) -> Self {
        FieldSource::Value(value.into())
    }
}

impl fmt::Debug for FieldSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldSource::Unset => f.write_str("Unset"),
            FieldSource::FileModified => f.write_str("FileModified"),
            FieldSource::Value(value) => f.debug_tuple("Value").field(value).finish(),
            FieldSource::Compute(_) => f.write_str("Compute(..)"),
        }
    }
}

/// Options for scanning a directory into a sitemap
///
/// # Example
///
/// ```
/// use static_sitemap::{FieldSource, ScanOptions};
///
/// let options = ScanOptions::default()
///     .with_extensions([".html", ".md"])
///     .with_last_modified(FieldSource::FileModified)
///     .with_change_frequency("weekly")
///     .with_include_sitemap(true);
///
/// assert!(options.ext.accepts("post.md"));
/// assert!(!options.ext.accepts("style.css"));
/// ```
#[must_use]
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Which names are eligible
    pub ext: ExtensionFilter,

    /// File names standing for their directory (`index.html`, ...)
    pub index: Vec<String>,

    /// Source of `<lastmod>`
    pub last_modified: FieldSource,

    /// Source of `<changefreq>`
    pub change_frequency: FieldSource,

    /// Source of `<priority>`
    pub priority: FieldSource,

    /// Let a `sitemap.xml` stand in for the directory holding it
    ///
    /// When set, a directory containing `sitemap.xml` is not enumerated.
    /// Its sitemap is read instead, relative locations are resolved against
    /// the directory URL, and generate markers are replaced by a scan of the
    /// directory that ignores the sitemap file.
    pub include_sitemap: bool,

    /// URL prefix of the root directory
    pub prefix: String,

    /// Free-form options made available to callbacks
    pub extra: BTreeMap<String, String>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            ext: ExtensionFilter::default(),
            index: vec!["index.html".to_string(), "index.htm".to_string()],
            last_modified: FieldSource::Unset,
            change_frequency: FieldSource::Unset,
            priority: FieldSource::Unset,
            include_sitemap: false,
            prefix: "/".to_string(),
            extra: BTreeMap::new(),
        }
    }
}

impl ScanOptions {
    /// Create options with the defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep only the given extensions
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ext = ExtensionFilter::Extensions(extensions.into_iter().map(Into::into).collect());
        self
    }

    /// Replace the name filter
    pub fn with_filter(mut self, filter: ExtensionFilter) -> Self {
        self.ext = filter;
        self
    }

    /// Replace the list of directory index names
    pub fn with_index<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.index = names.into_iter().map(Into::into).collect();
        self
    }

    /// Set the source of `<lastmod>`
    pub fn with_last_modified(mut self, source: impl Into<FieldSource>) -> Self {
        self.last_modified = source.into();
        self
    }

    /// Set the source of `<changefreq>`
    pub fn with_change_frequency(mut self, source: impl Into<FieldSource>) -> Self {
        self.change_frequency = source.into();
        self
    }

    /// Set the source of `<priority>`
    pub fn with_priority(mut self, source: impl Into<FieldSource>) -> Self {
        self.priority = source.into();
        self
    }

    /// Enable or disable embedded `sitemap.xml` handling
    pub fn with_include_sitemap(mut self, include: bool) -> Self {
        self.include_sitemap = include;
        self
    }

    /// Set the URL prefix of the root directory
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Add a free-form option
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Whether a directory entry survives filtering
    pub(crate) fn keeps(&self, name: &str) -> bool {
        (self.include_sitemap && name == SITEMAP_FILE) || self.ext.accepts(name)
    }

    /// Whether a file stands for its directory
    pub(crate) fn is_index(&self, name: &str) -> bool {
        self.index.iter().any(|index| index == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter() {
        let filter = ExtensionFilter::default();
        assert!(filter.accepts("index.html"));
        assert!(filter.accepts("old.htm"));
        assert!(filter.accepts("README"));
        assert!(filter.accepts(".htaccess"));
        assert!(!filter.accepts("sitemap.xml"));
        assert!(!filter.accepts("page.HTML"));
    }

    #[test]
    fn test_extensions_without_dot() {
        let options = ScanOptions::default().with_extensions(["md"]);
        assert!(options.ext.accepts("notes.md"));
        assert!(!options.ext.accepts("notes.html"));
    }

    #[test]
    fn test_custom_filter() {
        let options = ScanOptions::default()
            .with_filter(ExtensionFilter::custom(|name| !name.starts_with('_')));
        assert!(options.ext.accepts("page.css"));
        assert!(!options.ext.accepts("_draft.html"));
    }

    #[test]
    fn test_keeps_sitemap_only_when_included() {
        let options = ScanOptions::default();
        assert!(!options.keeps(SITEMAP_FILE));
        assert!(options.with_include_sitemap(true).keeps(SITEMAP_FILE));
    }

    #[test]
    fn test_resolve_file_modified() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.html");
        std::fs::write(&path, "page").unwrap();
        let metadata = std::fs::metadata(&path).unwrap();
        let options = ScanOptions::default();
        let ctx = FileContext {
            url: "/page.html",
            metadata: &metadata,
            file_name: "page.html",
            path: &path,
            prefix: "/",
            options: &options,
        };

        let expected: DateTime<Utc> = metadata.modified().unwrap().into();
        assert!(matches!(
            FieldSource::FileModified.resolve(&ctx).unwrap(),
            FieldValue::Date(dt) if dt == expected
        ));
        assert!(matches!(
            FieldSource::Unset.resolve(&ctx).unwrap(),
            FieldValue::Absent
        ));
        assert!(matches!(
            FieldSource::compute(|ctx| ctx.file_name.into()).resolve(&ctx).unwrap(),
            FieldValue::Text(ref s) if s == "page.html"
        ));
    }

    #[test]
    fn test_literal_sources() {
        let options = ScanOptions::default()
            .with_change_frequency("daily")
            .with_priority(0.8);
        assert!(matches!(
            options.change_frequency,
            FieldSource::Value(FieldValue::Text(ref s)) if s == "daily"
        ));
        assert!(matches!(
            options.priority,
            FieldSource::Value(FieldValue::Number(n)) if n == 0.8
        ));
    }
}
