use crate::month::EditionMonth;
use crate::session::{Field, FieldValues};

pub const DEFAULT_SHOP_NAME: &str = "Music Record Shop";

/// Section headings of the finished newsletter, in print order. Spotlight
/// and call to action only print when they hold something.
const LAYOUT: [(Field, &str, bool); 6] = [
    (Field::FeaturedPressing, "🎯 Featured Pressing of the Month", true),
    (Field::ValuationTip, "📈 Valuation Tip of the Month", true),
    (Field::JustIn, "🆕 Just In: New Arrivals", true),
    (Field::CollectorBuzz, "🗞️ Collector News + Industry Buzz", true),
    (Field::Spotlight, "💬 Collector Spotlight", false),
    (Field::CallToAction, "📢 Want to Sell or Trade Records?", false),
];

pub fn edition_title(month: EditionMonth) -> String {
    format!("Collector's Corner — {month} Edition")
}

/// Markdown preview of the newsletter as it currently stands.
pub fn render_preview(month: EditionMonth, fields: &FieldValues, shop_name: &str) -> String {
    let mut out = format!("## 📰 {}\nFrom {shop_name}\n", edition_title(month));

    for (field, heading, always) in LAYOUT {
        let value = fields.get(field).trim();
        if !always && value.is_empty() {
            continue;
        }
        out.push_str(&format!("\n### {heading}\n{value}\n"));
    }

    out
}
