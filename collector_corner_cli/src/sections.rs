//! Splitting generated text into its labelled sections.
//!
//! The completion service is asked for four `## ` headings but nothing
//! guarantees it complies. Lookups that miss resolve to an empty string so a
//! drifting response leaves blank fields instead of failing the request.

use serde::{Deserialize, Serialize};
use std::fmt;

const HEADING_MARKER: &str = "## ";

/// The four slots the completion service fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionLabel {
    FeaturedPressing,
    ValuationTip,
    JustIn,
    CollectorBuzz,
}

impl SectionLabel {
    /// Prompt order.
    pub const ALL: [SectionLabel; 4] = [
        SectionLabel::FeaturedPressing,
        SectionLabel::ValuationTip,
        SectionLabel::JustIn,
        SectionLabel::CollectorBuzz,
    ];

    /// Heading text the generated document must carry after `## `.
    pub fn heading(self) -> &'static str {
        match self {
            SectionLabel::FeaturedPressing => "🎯 Featured Pressing",
            SectionLabel::ValuationTip => "📈 Valuation Tip",
            SectionLabel::JustIn => "🆕 Just In",
            SectionLabel::CollectorBuzz => "🗞️ Collector Buzz",
        }
    }
}

impl fmt::Display for SectionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.heading())
    }
}

/// Raw text returned by the completion service, kept verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GeneratedDocument(String);

impl GeneratedDocument {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn parse(&self) -> ParsedDocument<'_> {
        ParsedDocument::parse(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section<'a> {
    pub heading: &'a str,
    pub body: String,
}

/// Level-2 heading/body pairs in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedDocument<'a> {
    sections: Vec<Section<'a>>,
}

impl<'a> ParsedDocument<'a> {
    /// Text before the first heading is dropped. `###` and deeper headings
    /// stay inside the body of the enclosing section.
    pub fn parse(text: &'a str) -> Self {
        let mut sections = Vec::new();
        let mut current: Option<(&'a str, Vec<&'a str>)> = None;

        for line in text.lines() {
            if let Some(heading) = heading_text(line) {
                if let Some((heading, body)) = current.take() {
                    sections.push(Section::new(heading, &body));
                }
                current = Some((heading, Vec::new()));
            } else if let Some((_, body)) = current.as_mut() {
                body.push(line);
            }
        }
        if let Some((heading, body)) = current {
            sections.push(Section::new(heading, &body));
        }

        Self { sections }
    }

    pub fn sections(&self) -> &[Section<'a>] {
        &self.sections
    }

    /// Trimmed body of the first section headed exactly by `label`.
    pub fn section(&self, label: SectionLabel) -> &str {
        self.sections
            .iter()
            .find(|s| s.heading == label.heading())
            .map(|s| s.body.as_str())
            .unwrap_or("")
    }
}

impl<'a> Section<'a> {
    fn new(heading: &'a str, lines: &[&str]) -> Self {
        Self {
            heading,
            body: lines.join("\n").trim().to_string(),
        }
    }
}

fn heading_text(line: &str) -> Option<&str> {
    line.trim_start()
        .strip_prefix(HEADING_MARKER)
        .map(str::trim)
}

/// Body of `label` in `document`, or `""` when the heading is missing.
pub fn extract(document: &GeneratedDocument, label: SectionLabel) -> String {
    document.parse().section(label).to_string()
}
