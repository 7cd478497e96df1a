use crate::month::EditionMonth;
use crate::sections::{GeneratedDocument, SectionLabel};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Every editable slot of the newsletter form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    FeaturedPressing,
    ValuationTip,
    JustIn,
    CollectorBuzz,
    Spotlight,
    CallToAction,
}

impl Field {
    pub const ALL: [Field; 6] = [
        Field::FeaturedPressing,
        Field::ValuationTip,
        Field::JustIn,
        Field::CollectorBuzz,
        Field::Spotlight,
        Field::CallToAction,
    ];

    /// `None` for the manual-only fields.
    pub fn section(self) -> Option<SectionLabel> {
        match self {
            Field::FeaturedPressing => Some(SectionLabel::FeaturedPressing),
            Field::ValuationTip => Some(SectionLabel::ValuationTip),
            Field::JustIn => Some(SectionLabel::JustIn),
            Field::CollectorBuzz => Some(SectionLabel::CollectorBuzz),
            Field::Spotlight | Field::CallToAction => None,
        }
    }
}

impl From<SectionLabel> for Field {
    fn from(label: SectionLabel) -> Self {
        match label {
            SectionLabel::FeaturedPressing => Field::FeaturedPressing,
            SectionLabel::ValuationTip => Field::ValuationTip,
            SectionLabel::JustIn => Field::JustIn,
            SectionLabel::CollectorBuzz => Field::CollectorBuzz,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldValues {
    pub featured_pressing: String,
    pub valuation_tip: String,
    pub just_in: String,
    pub collector_buzz: String,
    pub spotlight: String,
    pub call_to_action: String,
}

impl FieldValues {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::FeaturedPressing => &self.featured_pressing,
            Field::ValuationTip => &self.valuation_tip,
            Field::JustIn => &self.just_in,
            Field::CollectorBuzz => &self.collector_buzz,
            Field::Spotlight => &self.spotlight,
            Field::CallToAction => &self.call_to_action,
        }
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let slot = match field {
            Field::FeaturedPressing => &mut self.featured_pressing,
            Field::ValuationTip => &mut self.valuation_tip,
            Field::JustIn => &mut self.just_in,
            Field::CollectorBuzz => &mut self.collector_buzz,
            Field::Spotlight => &mut self.spotlight,
            Field::CallToAction => &mut self.call_to_action,
        };
        *slot = value.into();
    }
}

/// State of one user's form: field values plus the last generated text.
///
/// Each CLI run or server session owns its own `Session`; nothing here is
/// shared between users.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Session {
    fields: FieldValues,
    full_text: GeneratedDocument,
    month: Option<EditionMonth>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fields(&self) -> &FieldValues {
        &self.fields
    }

    pub fn full_text(&self) -> &GeneratedDocument {
        &self.full_text
    }

    pub fn month(&self) -> Option<EditionMonth> {
        self.month
    }

    pub fn set_month(&mut self, month: EditionMonth) {
        self.month = Some(month);
    }

    pub fn get(&self, field: Field) -> &str {
        self.fields.get(field)
    }

    /// A user edit. Overwrites whatever is in the slot.
    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        self.fields.set(field, value);
    }

    /// Replace the four AI-owned fields and the full text with what
    /// `document` contains. Spotlight and call to action are left alone.
    pub fn update_from_document(&mut self, document: GeneratedDocument) {
        let parsed = document.parse();
        for label in SectionLabel::ALL {
            let body = parsed.section(label);
            debug!(section = %label, chars = body.chars().count(), "section extracted");
            self.fields.set(label.into(), body);
        }
        self.full_text = document;
    }
}
