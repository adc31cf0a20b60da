//! Sitemap document parser and generator
//!
//! A sitemap is an XML `<urlset>` holding one `<url>` element per page.
//! Besides the standard elements, a processing instruction placed directly
//! inside `<urlset>` marks the spot where generated entries should be
//! spliced in when the document is embedded in a scanned directory.
//!
//! Reference: https://www.sitemaps.org/protocol.html

use crate::entry::Entry;
use crate::{Result, SitemapError};
use quick_xml::Reader;
use quick_xml::events::Event;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

/// Namespace of the sitemap protocol
pub const SITEMAP_NAMESPACE: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// Processing instruction written for unresolved generate markers
pub const GENERATE_INSTRUCTION: &str = "sitemap-generate";

/// One item of a sitemap document
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SitemapItem {
    /// A `<url>` entry
    Entry(Entry),
    /// Placeholder for entries generated from the surrounding directory
    Generate,
}

impl SitemapItem {
    /// The entry, unless this item is a generate marker
    pub fn as_entry(&self) -> Option<&Entry> {
        match self {
            SitemapItem::Entry(entry) => Some(entry),
            SitemapItem::Generate => None,
        }
    }
}

impl From<Entry> for SitemapItem {
    fn from(entry: Entry) -> Self {
        SitemapItem::Entry(entry)
    }
}

/// An ordered sitemap document
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sitemap {
    /// Items in document order
    pub items: Vec<SitemapItem>,
}

impl Sitemap {
    /// Create an empty sitemap
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a sitemap from entries
    pub fn from_entries(entries: Vec<Entry>) -> Self {
        entries.into_iter().collect()
    }

    /// Create a sitemap from items, markers included
    pub fn from_items(items: Vec<SitemapItem>) -> Self {
        Self { items }
    }

    /// Parse a sitemap from XML text
    pub fn parse(xml: &str) -> Result<Self> {
        parse_sitemap(xml)
    }

    /// Parse a sitemap from raw bytes
    ///
    /// Fails with [`SitemapError::InvalidSitemapContents`] if the bytes are
    /// not UTF-8.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let xml = std::str::from_utf8(bytes).map_err(|e| {
            SitemapError::InvalidSitemapContents(format!("sitemap is not valid UTF-8: {}", e))
        })?;
        parse_sitemap(xml)
    }

    /// Entries in document order, generate markers skipped
    pub fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.items.iter().filter_map(SitemapItem::as_entry)
    }

    /// Number of items, generate markers included
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the sitemap has no items
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Append an item
    pub fn push(&mut self, item: impl Into<SitemapItem>) {
        self.items.push(item.into());
    }

    /// Consume the sitemap, returning its items
    pub fn into_items(self) -> Vec<SitemapItem> {
        self.items
    }

    /// Generate the XML document
    ///
    /// # Example
    /// ```
    /// use static_sitemap::{Entry, Sitemap};
    ///
    /// let sitemap = Sitemap::from_entries(vec![Entry::with_url("/")]);
    ///
    /// assert_eq!(
    ///     sitemap.to_xml(),
    ///     "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
    ///      <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n\
    ///      \x20 <url>\n\
    ///      \x20   <loc>/</loc>\n\
    ///      \x20 </url>\n\
    ///      </urlset>\n"
    /// );
    /// ```
    pub fn to_xml(&self) -> String {
        let mut xml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        xml.push_str(&format!("<urlset xmlns=\"{}\">\n", SITEMAP_NAMESPACE));

        let body: Vec<String> = self
            .items
            .iter()
            .map(|item| match item {
                SitemapItem::Entry(entry) => entry.to_entry_xml(2),
                SitemapItem::Generate => format!("  <?{}?>", GENERATE_INSTRUCTION),
            })
            .collect();

        if !body.is_empty() {
            xml.push_str(&body.join("\n"));
            xml.push('\n');
        }

        xml.push_str("</urlset>\n");
        xml
    }

    /// Write the XML document to a writer
    pub fn write_to<W: std::io::Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writer.write_all(self.to_xml().as_bytes())
    }
}

impl From<Vec<Entry>> for Sitemap {
    fn from(entries: Vec<Entry>) -> Self {
        Self::from_entries(entries)
    }
}

impl From<Vec<SitemapItem>> for Sitemap {
    fn from(items: Vec<SitemapItem>) -> Self {
        Self::from_items(items)
    }
}

impl FromIterator<Entry> for Sitemap {
    fn from_iter<I: IntoIterator<Item = Entry>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().map(SitemapItem::Entry).collect(),
        }
    }
}

impl Extend<SitemapItem> for Sitemap {
    fn extend<I: IntoIterator<Item = SitemapItem>>(&mut self, iter: I) {
        self.items.extend(iter);
    }
}

impl FromStr for Sitemap {
    type Err = SitemapError;

    fn from_str(s: &str) -> Result<Self> {
        parse_sitemap(s)
    }
}

/// Parse a sitemap from XML string
///
/// Only `<url>` children of a top-level `<urlset>` produce entries; a
/// processing instruction among those children produces a
/// [`SitemapItem::Generate`] marker. Namespace prefixes on element names are
/// ignored.
///
/// # Example
/// ```
/// use static_sitemap::{SitemapItem, parse_sitemap};
///
/// let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
/// <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
///   <url>
///     <loc>/blog/</loc>
///     <changefreq>daily</changefreq>
///   </url>
///   <?generate?>
/// </urlset>"#;
///
/// let sitemap = parse_sitemap(xml).unwrap();
/// assert_eq!(sitemap.len(), 2);
/// assert_eq!(sitemap.items[1], SitemapItem::Generate);
/// ```
pub fn parse_sitemap(xml: &str) -> Result<Sitemap> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut sitemap = Sitemap::new();

    let mut depth = 0usize;
    let mut in_urlset = false;
    let mut url_fields: Option<Vec<(String, String)>> = None;
    let mut field: Option<(String, String)> = None;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                match depth {
                    0 if name == "urlset" => in_urlset = true,
                    1 if in_urlset && name == "url" => url_fields = Some(Vec::new()),
                    2 if url_fields.is_some() => field = Some((name, String::new())),
                    _ => {}
                }
                depth += 1;
            }
            Ok(Event::Empty(ref e)) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                match depth {
                    1 if in_urlset && name == "url" => sitemap.push(Entry::new()),
                    2 => {
                        if let Some(fields) = url_fields.as_mut() {
                            fields.push((name, String::new()));
                        }
                    }
                    _ => {}
                }
            }
            Ok(Event::End(_)) => {
                depth = depth.saturating_sub(1);
                match depth {
                    0 => in_urlset = false,
                    1 => {
                        if let Some(fields) = url_fields.take() {
                            let entry = Entry::from_fields(
                                fields.iter().map(|(name, text)| (name.as_str(), text.as_str())),
                            )?;
                            sitemap.push(entry);
                        }
                    }
                    2 => {
                        if let (Some(done), Some(fields)) = (field.take(), url_fields.as_mut()) {
                            fields.push(done);
                        }
                    }
                    _ => {}
                }
            }
            Ok(Event::Text(ref e)) => {
                if let Some((_, text)) = field.as_mut() {
                    let unescaped = e
                        .unescape()
                        .map_err(|e| SitemapError::Parse(e.to_string()))?;
                    text.push_str(&unescaped);
                }
            }
            Ok(Event::CData(ref e)) => {
                if let Some((_, text)) = field.as_mut() {
                    text.push_str(&String::from_utf8_lossy(e));
                }
            }
            // Any processing instruction directly inside <urlset> asks for generation
            Ok(Event::PI(_)) if in_urlset && depth == 1 => {
                sitemap.push(SitemapItem::Generate);
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(SitemapError::Parse(format!(
                    "{} at position {}",
                    e,
                    reader.buffer_position()
                )));
            }
            _ => {}
        }

        buf.clear();
    }

    Ok(sitemap)
}

/// Read and parse a sitemap file
///
/// IO failures are reported as [`SitemapError::FileRead`]; parse failures
/// are returned unchanged.
pub async fn read_sitemap(path: impl AsRef<Path>) -> Result<Sitemap> {
    let path = path.as_ref();
    debug!(path = %path.display(), "reading sitemap");

    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| SitemapError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;

    Sitemap::from_slice(&bytes)
}
