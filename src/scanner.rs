//! Directory scanner
//!
//! Walks a directory of static content and turns every eligible file into a
//! sitemap entry. Directories are visited depth-first, one entry at a time,
//! in name order. A `sitemap.xml` found along the way can take over the
//! directory holding it (see [`ScanOptions::include_sitemap`]).

use crate::config::{FileContext, SITEMAP_FILE, ScanOptions};
use crate::entry::Entry;
use crate::sitemap::{Sitemap, SitemapItem, read_sitemap};
use crate::{Result, SitemapError};
use std::fs::Metadata;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use tracing::{debug, trace};

type ScanFuture<'a> = Pin<Box<dyn Future<Output = Result<Vec<SitemapItem>>> + Send + 'a>>;

/// Scan a directory tree into a sitemap
///
/// The first failure anywhere aborts the whole scan.
///
/// # Example
///
/// ```no_run
/// use static_sitemap::{ScanOptions, generate};
///
/// # async fn run() -> static_sitemap::Result<()> {
/// let options = ScanOptions::default().with_include_sitemap(true);
/// let sitemap = generate("public", &options).await?;
/// std::fs::write("public/sitemap.xml", sitemap.to_xml()).unwrap();
/// # Ok(())
/// # }
/// ```
pub async fn generate(root: impl AsRef<Path>, options: &ScanOptions) -> Result<Sitemap> {
    let root = root.as_ref();
    debug!(root = %root.display(), "generating sitemap");

    let prefix = make_url(&options.prefix, "", true);
    let items = scan_directory(root.to_path_buf(), prefix, options).await?;

    debug!(count = items.len(), "sitemap generated");
    Ok(Sitemap::from_items(items))
}

/// Reusable scanner holding its options
#[derive(Debug, Clone, Default)]
pub struct SiteScanner {
    options: ScanOptions,
}

impl SiteScanner {
    /// Create a scanner
    pub fn new(options: ScanOptions) -> Self {
        Self { options }
    }

    /// Options used by this scanner
    pub fn options(&self) -> &ScanOptions {
        &self.options
    }

    /// Scan a directory tree into a sitemap
    pub async fn scan(&self, root: impl AsRef<Path>) -> Result<Sitemap> {
        generate(root, &self.options).await
    }
}

/// Scan one directory whose URL is `prefix`
///
/// The prefix is owned by each call so sibling branches never share it.
fn scan_directory<'a>(dir: PathBuf, prefix: String, options: &'a ScanOptions) -> ScanFuture<'a> {
    Box::pin(async move {
        debug!(dir = %dir.display(), %prefix, "scanning directory");
        let listing = list_directory(&dir, options).await?;

        if options.include_sitemap && listing.iter().any(|(name, _)| name == SITEMAP_FILE) {
            return embedded_sitemap(&dir, &prefix, options).await;
        }

        let mut items = Vec::new();

        for (name, path) in listing {
            let metadata = tokio::fs::symlink_metadata(&path)
                .await
                .map_err(|source| SitemapError::Stat {
                    path: path.clone(),
                    source,
                })?;
            let file_type = metadata.file_type();

            if file_type.is_file() {
                let url = if options.is_index(&name) {
                    make_url(&prefix, "", true)
                } else {
                    make_url(&prefix, &name, false)
                };
                let entry = build_entry(url, &metadata, &name, &path, &prefix, options)?;
                items.push(SitemapItem::Entry(entry));
            } else if file_type.is_dir() {
                let child_prefix = make_url(&prefix, &name, true);
                items.extend(scan_directory(path, child_prefix, options).await?);
            } else {
                trace!(path = %path.display(), "skipping non-regular file");
            }
        }

        Ok(items)
    })
}

/// List the names of a directory that pass the filter, sorted
async fn list_directory(dir: &Path, options: &ScanOptions) -> Result<Vec<(String, PathBuf)>> {
    let read_dir_error = |source| SitemapError::ReadDir {
        path: dir.to_path_buf(),
        source,
    };

    let mut reader = tokio::fs::read_dir(dir).await.map_err(read_dir_error)?;
    let mut listing = Vec::new();

    while let Some(entry) = reader.next_entry().await.map_err(read_dir_error)? {
        let name = entry.file_name().to_string_lossy().into_owned();
        if options.keeps(&name) {
            listing.push((name, entry.path()));
        } else {
            trace!(%name, "filtered out");
        }
    }

    listing.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(listing)
}

/// Replace a directory by the sitemap it contains
async fn embedded_sitemap(
    dir: &Path,
    prefix: &str,
    options: &ScanOptions,
) -> Result<Vec<SitemapItem>> {
    let path = dir.join(SITEMAP_FILE);
    debug!(path = %path.display(), %prefix, "using embedded sitemap");

    let sitemap = read_sitemap(&path).await?;
    let mut items = Vec::with_capacity(sitemap.len());

    for item in sitemap.into_items() {
        match item {
            SitemapItem::Entry(mut entry) => {
                if !is_absolute_url(entry.url()) {
                    let url = make_url(prefix, entry.url(), false);
                    entry.set_url(url);
                }
                items.push(SitemapItem::Entry(entry));
            }
            SitemapItem::Generate => {
                // Scan the directory itself, without letting the sitemap take over again
                let nested = options.clone().with_include_sitemap(false);
                let generated =
                    scan_directory(dir.to_path_buf(), prefix.to_string(), &nested).await?;
                debug!(count = generated.len(), %prefix, "spliced generated entries");
                items.extend(generated);
            }
        }
    }

    Ok(items)
}

fn build_entry(
    url: String,
    metadata: &Metadata,
    file_name: &str,
    path: &Path,
    prefix: &str,
    options: &ScanOptions,
) -> Result<Entry> {
    let ctx = FileContext {
        url: &url,
        metadata,
        file_name,
        path,
        prefix,
        options,
    };

    let mut entry = Entry::with_url(url.as_str());
    entry.set_last_modified(options.last_modified.resolve(&ctx)?)?;
    entry.set_change_frequency(options.change_frequency.resolve(&ctx)?);
    entry.set_priority(options.priority.resolve(&ctx)?)?;

    trace!(%url, "entry created");
    Ok(entry)
}

/// Join `path` onto the URL `prefix`
///
/// A single leading slash of `path` is dropped, `.` and empty segments are
/// removed, `..` pops a segment, and the result starts with exactly one
/// slash. A trailing slash is kept, and added when `ensure_final_slash` is set.
fn make_url(prefix: &str, path: &str, ensure_final_slash: bool) -> String {
    let path = path.strip_prefix('/').unwrap_or(path);
    let trailing = if path.is_empty() {
        prefix.ends_with('/')
    } else {
        path.ends_with('/')
    };

    let mut segments: Vec<&str> = Vec::new();
    for segment in prefix.split('/').chain(path.split('/')) {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }

    let mut url = format!("/{}", segments.join("/"));
    if (trailing || ensure_final_slash) && !url.ends_with('/') {
        url.push('/');
    }
    url
}

/// Whether the URL starts with a `scheme:`
fn is_absolute_url(url: &str) -> bool {
    let Some((scheme, _)) = url.split_once(':') else {
        return false;
    };
    let mut chars = scheme.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}
