//! Sitemap URL entries
//!
//! An [`Entry`] is one `<url>` element of a sitemap. Field setters accept
//! loosely typed [`FieldValue`]s so entries can be filled from parsed XML,
//! filesystem metadata or user callbacks alike.

use crate::date::{format_w3c, parse_w3c};
use crate::value::FieldValue;
use crate::{Result, SitemapError};
use chrono::{DateTime, Utc};
use quick_xml::escape::escape;

/// Priority assumed by crawlers when `<priority>` is missing
pub const DEFAULT_PRIORITY: f64 = 0.5;

/// A single URL entry of a sitemap
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Entry {
    url: String,
    last_modified: Option<DateTime<Utc>>,
    priority: f64,
    change_frequency: Option<String>,
}

impl Default for Entry {
    fn default() -> Self {
        Self {
            url: String::new(),
            last_modified: None,
            priority: DEFAULT_PRIORITY,
            change_frequency: None,
        }
    }
}

impl Entry {
    /// Create an empty entry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an entry for the given URL
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Build an entry from the child elements of a `<url>` node
    ///
    /// Each item is an element name and its trimmed text content, handed to
    /// the matching setter in order. Unknown elements are ignored and
    /// repeated elements overwrite earlier ones, blank text included.
    ///
    /// # Examples
    ///
    /// ```
    /// use static_sitemap::Entry;
    ///
    /// let entry = Entry::from_fields([
    ///     ("loc", "/docs/"),
    ///     ("changefreq", "weekly"),
    ///     ("image", "ignored.png"),
    /// ])
    /// .unwrap();
    ///
    /// assert_eq!(entry.url(), "/docs/");
    /// assert_eq!(entry.change_frequency(), Some("weekly"));
    /// ```
    pub fn from_fields<'a, I>(fields: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut entry = Self::new();

        for (name, text) in fields {
            let text = text.trim();
            match name {
                "loc" => entry.set_url(text),
                "lastmod" => entry.set_last_modified(text)?,
                "changefreq" => entry.set_change_frequency(text),
                "priority" => entry.set_priority(text)?,
                _ => {}
            }
        }

        Ok(entry)
    }

    /// Location of the page (absolute path or absolute URL)
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Set the location; no validation is performed
    pub fn set_url(&mut self, url: impl Into<String>) {
        self.url = url.into();
    }

    /// Last modification time
    pub fn last_modified(&self) -> Option<DateTime<Utc>> {
        self.last_modified
    }

    /// Set the last modification time
    ///
    /// - [`FieldValue::Absent`] leaves the current value untouched
    /// - [`FieldValue::Number`] is read as milliseconds since the Unix epoch
    /// - [`FieldValue::Text`] is parsed as a W3C datetime
    /// - [`FieldValue::Date`] is stored as is
    ///
    /// Booleans fail with [`SitemapError::InvalidLastModifiedType`].
    pub fn set_last_modified(&mut self, value: impl Into<FieldValue>) -> Result<()> {
        match value.into() {
            FieldValue::Absent => {}
            FieldValue::Number(millis) => {
                let dt = Some(millis)
                    .filter(|m| m.is_finite())
                    .and_then(|m| DateTime::from_timestamp_millis(m as i64))
                    .ok_or_else(|| SitemapError::InvalidDateFormat(millis.to_string()))?;
                self.last_modified = Some(dt);
            }
            FieldValue::Text(text) => self.last_modified = Some(parse_w3c(&text)?),
            FieldValue::Date(dt) => self.last_modified = Some(dt),
            other => {
                return Err(SitemapError::InvalidLastModifiedType(format!(
                    "expected number, text or date, got {}",
                    other.kind()
                )));
            }
        }
        Ok(())
    }

    /// Priority relative to other pages of the site
    pub fn priority(&self) -> f64 {
        self.priority
    }

    /// Set the priority
    ///
    /// Falsy values (absent, `false`, `0`, empty text) leave the current
    /// priority untouched, so a numeric `0` can never be set this way. Text
    /// is parsed as a decimal number. Infinite and NaN values are rejected.
    ///
    /// # Examples
    ///
    /// ```
    /// use static_sitemap::Entry;
    ///
    /// let mut entry = Entry::with_url("/");
    /// entry.set_priority(0.0).unwrap();
    /// assert_eq!(entry.priority(), 0.5);
    ///
    /// entry.set_priority("0.8").unwrap();
    /// assert_eq!(entry.priority(), 0.8);
    ///
    /// assert!(entry.set_priority("high").is_err());
    /// ```
    pub fn set_priority(&mut self, value: impl Into<FieldValue>) -> Result<()> {
        let value = value.into();
        if value.is_falsy() {
            return Ok(());
        }

        self.priority = match value {
            FieldValue::Number(n) if n.is_finite() => n,
            FieldValue::Number(n) => return Err(SitemapError::InvalidPriority(n.to_string())),
            FieldValue::Text(text) => text
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .ok_or(SitemapError::InvalidPriority(text))?,
            other => {
                return Err(SitemapError::InvalidPriority(format!(
                    "expected number or text, got {}",
                    other.kind()
                )));
            }
        };
        Ok(())
    }

    /// Change frequency hint (`daily`, `weekly`, ...)
    pub fn change_frequency(&self) -> Option<&str> {
        self.change_frequency.as_deref()
    }

    /// Set the change frequency; the value is not checked against the
    /// protocol's list of frequencies
    pub fn set_change_frequency(&mut self, value: impl Into<FieldValue>) {
        self.change_frequency = value.into().into_text();
    }

    /// Serialize as a `<url>` element indented by `indent` spaces
    ///
    /// Default priority and empty change frequency are omitted.
    ///
    /// # Examples
    ///
    /// ```
    /// use static_sitemap::Entry;
    ///
    /// let mut entry = Entry::with_url("/about/");
    /// entry.set_change_frequency("monthly");
    ///
    /// assert_eq!(
    ///     entry.to_entry_xml(0),
    ///     "<url>\n  <loc>/about/</loc>\n  <changefreq>monthly</changefreq>\n</url>"
    /// );
    /// ```
    pub fn to_entry_xml(&self, indent: usize) -> String {
        let outer = " ".repeat(indent);
        let inner = " ".repeat(indent + 2);

        let mut lines = vec![
            format!("{outer}<url>"),
            format!("{inner}<loc>{}</loc>", escape(self.url.as_str())),
        ];

        if let Some(freq) = self.change_frequency.as_deref().filter(|f| !f.is_empty()) {
            lines.push(format!("{inner}<changefreq>{}</changefreq>", escape(freq)));
        }

        if self.priority != DEFAULT_PRIORITY {
            lines.push(format!("{inner}<priority>{}</priority>", self.priority));
        }

        if let Some(dt) = &self.last_modified {
            lines.push(format!("{inner}<lastmod>{}</lastmod>", format_w3c(dt)));
        }

        lines.push(format!("{outer}</url>"));
        lines.join("\n")
    }
}
