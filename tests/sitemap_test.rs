//! Sitemap document tests
//!
//! Reference: https://www.sitemaps.org/protocol.html

use chrono::{TimeZone, Utc};
use static_sitemap::{
    Entry, FieldValue, Sitemap, SitemapError, SitemapItem, format_w3c, parse_sitemap, parse_w3c,
    read_sitemap,
};

const PROTOCOL_EXAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
   <url>
      <loc>http://www.example.com/</loc>
      <lastmod>2005-01-01</lastmod>
      <changefreq>monthly</changefreq>
      <priority>0.8</priority>
   </url>
   <url>
      <loc>http://www.example.com/catalog?item=12&amp;desc=vacation_hawaii</loc>
      <changefreq>weekly</changefreq>
   </url>
   <url>
      <loc>http://www.example.com/catalog?item=73&amp;desc=vacation_new_zealand</loc>
      <lastmod>2004-12-23</lastmod>
      <changefreq>weekly</changefreq>
   </url>
   <url>
      <loc>http://www.example.com/catalog?item=74&amp;desc=vacation_newfoundland</loc>
      <lastmod>2004-12-23T18:00:15+00:00</lastmod>
      <priority>0.3</priority>
   </url>
   <url>
      <loc>http://www.example.com/catalog?item=83&amp;desc=vacation_usa</loc>
      <lastmod>2004-11-23</lastmod>
   </url>
</urlset>"#;

#[test]
fn test_parse_protocol_example() {
    let sitemap = parse_sitemap(PROTOCOL_EXAMPLE).unwrap();
    assert_eq!(sitemap.len(), 5);

    let entries: Vec<&Entry> = sitemap.entries().collect();
    assert_eq!(entries[0].priority(), 0.8);
    assert_eq!(entries[1].change_frequency(), Some("weekly"));
    assert!(entries[1].last_modified().is_none());
    assert_eq!(
        entries[3].last_modified(),
        Some(Utc.with_ymd_and_hms(2004, 12, 23, 18, 0, 15).unwrap())
    );
    assert_eq!(entries[3].priority(), 0.3);
}

#[test]
fn test_protocol_example_roundtrip() {
    let first = parse_sitemap(PROTOCOL_EXAMPLE).unwrap();
    let second = parse_sitemap(&first.to_xml()).unwrap();

    assert_eq!(first, second);
    assert_eq!(first.to_xml(), second.to_xml());
    assert_eq!(second.to_xml().matches("<priority>").count(), 2);
    assert!(second.to_xml().contains("&amp;desc=vacation_usa"));
}

#[test]
fn test_build_and_serialize() {
    let mut home = Entry::with_url("https://example.com/");
    home.set_priority(1.0).unwrap();
    home.set_last_modified(FieldValue::Number(0.0)).unwrap();

    let mut sitemap = Sitemap::new();
    sitemap.push(home);
    sitemap.push(Entry::with_url("https://example.com/about"));

    assert_eq!(
        sitemap.to_xml(),
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n\
         \x20 <url>\n\
         \x20   <loc>https://example.com/</loc>\n\
         \x20   <priority>1</priority>\n\
         \x20   <lastmod>1970-01-01T00:00:00Z</lastmod>\n\
         \x20 </url>\n\
         \x20 <url>\n\
         \x20   <loc>https://example.com/about</loc>\n\
         \x20 </url>\n\
         </urlset>\n"
    );
}

#[test]
fn test_from_conversions() {
    let entries = vec![Entry::with_url("/a"), Entry::with_url("/b")];
    let from_entries = Sitemap::from(entries.clone());
    let collected: Sitemap = entries.into_iter().collect();
    assert_eq!(from_entries, collected);

    let items = from_entries.clone().into_items();
    assert_eq!(Sitemap::from(items), from_entries);
}

#[test]
fn test_generate_marker_is_not_an_entry() {
    let sitemap = parse_sitemap("<urlset><?generate?></urlset>").unwrap();
    assert_eq!(sitemap.items, vec![SitemapItem::Generate]);
    assert_eq!(sitemap.entries().count(), 0);
}

#[test]
fn test_parse_errors() {
    assert!(matches!(
        parse_sitemap("<urlset><url><lastmod>soon</lastmod></url></urlset>"),
        Err(SitemapError::InvalidDateFormat(_))
    ));
    assert!(matches!(
        parse_sitemap("<urlset></url>"),
        Err(SitemapError::Parse(_))
    ));
}

#[test]
fn test_date_codec_public_api() {
    let dt = parse_w3c("2004-12-23T18:00:15.250-01:30").unwrap();
    assert_eq!(format_w3c(&dt), "2004-12-23T19:30:15Z");
}

#[tokio::test]
async fn test_read_sitemap_invalid_utf8() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sitemap.xml");
    std::fs::write(&path, [0xc3, 0x28]).unwrap();

    let err = read_sitemap(&path).await.unwrap_err();
    assert!(matches!(err, SitemapError::InvalidSitemapContents(_)));
}

#[cfg(feature = "serde")]
#[test]
fn test_serde_roundtrip() {
    let sitemap = parse_sitemap(PROTOCOL_EXAMPLE).unwrap();
    let json = serde_json::to_string(&sitemap).unwrap();
    let back: Sitemap = serde_json::from_str(&json).unwrap();
    assert_eq!(back, sitemap);
}
