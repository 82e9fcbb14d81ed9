//! Citation span tokenizer.
//!
//! Every factual statement in a report is wrapped as
//!
//! ```text
//! <claim source="Doc1.pdf" page="4" quote="Revenue grew 12%" logic="...">content</claim>
//! ```
//!
//! [`parse_citations`] scans forward and yields ordered segments. Anything that
//! does not form a complete tag stays in the output as plain text.

use serde::{Deserialize, Serialize};

const OPEN_TAG: &str = "<claim";
const CLOSE_TAG: &str = "</claim>";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    pub source: String,
    pub page: String,
    pub quote: String,
    /// Present for derived or inferred statements
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logic: Option<String>,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Segment {
    Text { text: String },
    Claim(Citation),
}

pub fn parse_citations(text: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut pending = String::new();
    let mut rest = text;

    while let Some(start) = rest.find(OPEN_TAG) {
        pending.push_str(&rest[..start]);
        let candidate = &rest[start..];
        match parse_claim(candidate) {
            Some((citation, consumed)) => {
                if !pending.is_empty() {
                    segments.push(Segment::Text {
                        text: std::mem::take(&mut pending),
                    });
                }
                segments.push(Segment::Claim(citation));
                rest = &candidate[consumed..];
            }
            None => {
                pending.push_str(OPEN_TAG);
                rest = &candidate[OPEN_TAG.len()..];
            }
        }
    }
    pending.push_str(rest);
    if !pending.is_empty() {
        segments.push(Segment::Text { text: pending });
    }
    segments
}

/// Only the citation spans of `text`, in order.
pub fn citations(text: &str) -> Vec<Citation> {
    parse_citations(text)
        .into_iter()
        .filter_map(|segment| match segment {
            Segment::Claim(citation) => Some(citation),
            Segment::Text { .. } => None,
        })
        .collect()
}

/// `text` with the tags removed and claim content kept.
pub fn plain_text(text: &str) -> String {
    parse_citations(text)
        .into_iter()
        .map(|segment| match segment {
            Segment::Text { text } => text,
            Segment::Claim(citation) => citation.content,
        })
        .collect()
}

/// Parse one complete claim at the start of `input`.
/// Returns the citation and the number of bytes consumed.
fn parse_claim(input: &str) -> Option<(Citation, usize)> {
    let mut pos = OPEN_TAG.len();
    let bytes = input.as_bytes();
    // `<claimant>` is not a claim tag
    match bytes.get(pos) {
        Some(b) if b.is_ascii_whitespace() || *b == b'>' => {}
        _ => return None,
    }

    let mut source = None;
    let mut page = None;
    let mut quote = None;
    let mut logic = None;

    loop {
        while bytes.get(pos).is_some_and(u8::is_ascii_whitespace) {
            pos += 1;
        }
        match bytes.get(pos)? {
            b'>' => {
                pos += 1;
                break;
            }
            b'/' if bytes.get(pos + 1) == Some(&b'>') => return None,
            _ => {}
        }

        let name_start = pos;
        while bytes
            .get(pos)
            .is_some_and(|b| b.is_ascii_alphanumeric() || *b == b'_' || *b == b'-')
        {
            pos += 1;
        }
        if pos == name_start {
            return None;
        }
        let name = input[name_start..pos].to_ascii_lowercase();

        while bytes.get(pos).is_some_and(u8::is_ascii_whitespace) {
            pos += 1;
        }
        if bytes.get(pos)? != &b'=' {
            return None;
        }
        pos += 1;
        while bytes.get(pos).is_some_and(u8::is_ascii_whitespace) {
            pos += 1;
        }
        let quote_char = *bytes.get(pos)?;
        if quote_char != b'"' && quote_char != b'\'' {
            return None;
        }
        pos += 1;
        let value_len = input[pos..].find(quote_char as char)?;
        let value = decode_entities(&input[pos..pos + value_len]);
        pos += value_len + 1;

        match name.as_str() {
            "source" => source = Some(value),
            "page" => page = Some(value),
            "quote" => quote = Some(value),
            "logic" => logic = Some(value).filter(|v| !v.trim().is_empty()),
            _ => {}
        }
    }

    let content_len = input[pos..].find(CLOSE_TAG)?;
    let content = input[pos..pos + content_len].to_string();
    let consumed = pos + content_len + CLOSE_TAG.len();

    Some((
        Citation {
            source: source?,
            page: page.unwrap_or_default(),
            quote: quote.unwrap_or_default(),
            logic,
            content,
        },
        consumed,
    ))
}

fn decode_entities(value: &str) -> String {
    value
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_and_claims_in_order() {
        let text = r#"Revenue rose. <claim source="Doc1.pdf" page="4" quote="Revenue grew 12%">Revenue grew by 12%</claim> in 2023."#;
        let segments = parse_citations(text);
        assert_eq!(segments.len(), 3);
        assert_eq!(
            segments[0],
            Segment::Text {
                text: "Revenue rose. ".to_string()
            }
        );
        match &segments[1] {
            Segment::Claim(c) => {
                assert_eq!(c.source, "Doc1.pdf");
                assert_eq!(c.page, "4");
                assert_eq!(c.quote, "Revenue grew 12%");
                assert_eq!(c.logic, None);
                assert_eq!(c.content, "Revenue grew by 12%");
            }
            other => panic!("expected claim, got {other:?}"),
        }
        assert_eq!(
            segments[2],
            Segment::Text {
                text: " in 2023.".to_string()
            }
        );
    }

    #[test]
    fn test_logic_attribute_and_entities() {
        let text = "<claim source='b.txt' page='2' quote='the &quot;core&quot; margin &amp; costs' logic='derived from 10 - 4'>6 points</claim>";
        let found = citations(text);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].quote, "the \"core\" margin & costs");
        assert_eq!(found[0].logic.as_deref(), Some("derived from 10 - 4"));
    }

    #[test]
    fn test_claims_inside_table_cells() {
        let text = "| Year | Revenue |\n|---|---|\n| 2023 | <claim source=\"a.pdf\" page=\"1\" quote=\"$5m\">$5m</claim> |";
        assert_eq!(citations(text).len(), 1);
        assert_eq!(
            plain_text(text),
            "| Year | Revenue |\n|---|---|\n| 2023 | $5m |"
        );
    }

    #[test]
    fn test_malformed_tags_kept_as_text() {
        let unterminated = r#"Start <claim source="a.pdf" page="1" quote="x">never closed"#;
        assert_eq!(
            parse_citations(unterminated),
            vec![Segment::Text {
                text: unterminated.to_string()
            }]
        );

        let unquoted = "<claim source=a.pdf>x</claim>";
        assert!(citations(unquoted).is_empty());
        assert_eq!(plain_text(unquoted), unquoted);

        let lookalike = "<claimant>not a tag</claimant>";
        assert_eq!(plain_text(lookalike), lookalike);
    }

    #[test]
    fn test_malformed_then_valid() {
        let text = r#"<claim broken <claim source="a.pdf" page="3" quote="q">ok</claim>"#;
        let segments = parse_citations(text);
        assert_eq!(segments.len(), 2);
        assert_eq!(
            segments[0],
            Segment::Text {
                text: "<claim broken ".to_string()
            }
        );
        assert!(matches!(&segments[1], Segment::Claim(c) if c.page == "3"));
    }

    #[test]
    fn test_missing_source_is_not_a_citation() {
        let text = r#"<claim page="1" quote="q">x</claim>"#;
        assert!(citations(text).is_empty());
    }
}
