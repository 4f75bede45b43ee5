//! Tolerant extraction of caption data from raw page and caption text.
//!
//! Neither the watch page nor the timed-text payload is a documented or
//! versioned format, so nothing here does a structured parse. Both steps are
//! plain regular-expression matches over the raw body: they survive malformed
//! surrounding markup, and they silently find nothing once the platform changes
//! its page layout. Keep all knowledge of those formats inside this module so a
//! structured parser can replace it without touching callers.

use anyhow::Context;
use regex::Regex;
use std::sync::OnceLock;

use super::TranscriptLine;
use crate::utils::format_timestamp;
use crate::Result;

fn caption_track_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#""captionTracks":\[\{"baseUrl":"([^"]+)""#).expect("valid caption track pattern")
    })
}

fn caption_text_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"<text start="([^"]+)" dur="([^"]+)">([^<]+)</text>"#).expect("valid caption text pattern")
    })
}

/// Find the first caption track URL embedded in a watch page.
///
/// The match is unescaped for both JSON (`\u0026`, `\/`) and HTML embedding.
pub fn find_caption_track_url(page: &str) -> Option<String> {
    let raw = caption_track_regex().captures(page)?.get(1)?.as_str();
    let unescaped = raw.replace("\\u0026", "&").replace("\\/", "/");

    Some(html_escape::decode_html_entities(&unescaped).into_owned())
}

/// Parse every `<text start=".." dur="..">..</text>` element in document order.
///
/// A start offset that is not a finite, non-negative number fails the whole
/// payload.
pub fn parse_caption_xml(xml: &str) -> Result<Vec<TranscriptLine>> {
    caption_text_regex()
        .captures_iter(xml)
        .map(|cap| -> Result<TranscriptLine> {
            let start: f64 = cap[1]
                .parse()
                .with_context(|| format!("Invalid caption start offset: {}", &cap[1]))?;
            if !start.is_finite() || start < 0.0 {
                anyhow::bail!("Invalid caption start offset: {}", &cap[1]);
            }

            Ok(TranscriptLine {
                time: format_timestamp(start),
                text: html_escape::decode_html_entities(&cap[3]).into_owned(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_caption_line() {
        let lines = parse_caption_xml(r#"<text start="1.5" dur="2.0">Hi &amp; bye</text>"#).unwrap();
        assert_eq!(
            lines,
            vec![TranscriptLine {
                time: "00:00:01".to_string(),
                text: "Hi & bye".to_string(),
            }]
        );
    }

    #[test]
    fn test_caption_document_order_and_entities() {
        let xml = concat!(
            r#"<?xml version="1.0" encoding="utf-8" ?><transcript>"#,
            r#"<text start="0" dur="1.2">it&#39;s &quot;fine&quot;</text>"#,
            r#"<text start="65.9" dur="3">a &lt;b&gt;</text>"#,
            r#"<text start="3725.25" dur="1">later</text>"#,
            r#"<broken"#,
            r#"</transcript>"#
        );

        let lines = parse_caption_xml(xml).unwrap();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].time, "00:00:00");
        assert_eq!(lines[0].text, "it's \"fine\"");
        assert_eq!(lines[1].time, "00:01:05");
        assert_eq!(lines[1].text, "a <b>");
        assert_eq!(lines[2].time, "01:02:05");
    }

    #[test]
    fn test_unmatched_elements_are_skipped() {
        // extra attributes and empty bodies fall outside the pattern
        let xml = r#"<text start="1" dur="1" foo="x">skip</text><text start="2" dur="1"></text><text start="3" dur="1">kept</text>"#;
        let lines = parse_caption_xml(xml).unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text, "kept");
    }

    #[test]
    fn test_bad_start_offset_fails() {
        assert!(parse_caption_xml(r#"<text start="abc" dur="1">x</text>"#).is_err());
        assert!(parse_caption_xml(r#"<text start="-1" dur="1">x</text>"#).is_err());
        assert!(parse_caption_xml(r#"<text start="NaN" dur="1">x</text>"#).is_err());
    }

    #[test]
    fn test_find_caption_track_url() {
        let page = r#"var x = {"captions":{"playerCaptionsTracklistRenderer":{"captionTracks":[{"baseUrl":"https:\/\/www.youtube.com\/api\/timedtext?v=abc\u0026lang=en&amp;fmt=srv1","name":{}},{"baseUrl":"https://second"}]}}};"#;
        assert_eq!(
            find_caption_track_url(page).as_deref(),
            Some("https://www.youtube.com/api/timedtext?v=abc&lang=en&fmt=srv1")
        );
    }

    #[test]
    fn test_find_caption_track_url_html_entities() {
        let page = r#""captionTracks":[{"baseUrl":"https://host/timedtext?v=a&amp;lang=de"}]"#;
        assert_eq!(
            find_caption_track_url(page).as_deref(),
            Some("https://host/timedtext?v=a&lang=de")
        );
    }

    #[test]
    fn test_no_caption_tracks() {
        assert_eq!(find_caption_track_url("<html><body>no captions</body></html>"), None);
    }
}
