//! Segment label to display colour mapping

use serde::{Deserialize, Serialize};

/// Colour used when a label has no palette entry
pub const FALLBACK_COLOR: &str = "#1f77b4";

/// Colour of the whole-portfolio reference curve
pub const BASELINE_COLOR: &str = "black";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaletteEntry {
    pub label: String,
    pub color: String,
}

/// Ordered label/colour pairs; lookup is by exact label match, first wins
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentPalette {
    pub entries: Vec<PaletteEntry>,
}

impl SegmentPalette {
    pub fn color_for(&self, label: &str) -> &str {
        self.entries
            .iter()
            .find(|e| e.label == label)
            .map(|e| e.color.as_str())
            .unwrap_or(FALLBACK_COLOR)
    }
}

impl Default for SegmentPalette {
    /// Blues for pre-increase segments, reds for post-increase
    fn default() -> Self {
        let entries = [
            ("Super-Prime, Pre-Fed Rate Increase", "#05409e"),
            ("Prime, Pre-Fed Rate Increase", "#2470b9"),
            ("Near-Prime, Pre-Fed Rate Increase", "#4599d1"),
            ("Subprime, Pre-Fed Rate Increase", "#68bee8"),
            ("Super-Prime, Post-Fed Rate Increase", "#d61f1f"),
            ("Prime, Post-Fed Rate Increase", "#e04441"),
            ("Near-Prime, Post-Fed Rate Increase", "#e76447"),
            ("Subprime, Post-Fed Rate Increase", "#e58638"),
            ("Pre-Fed Rate Increase", "#05409e"),
            ("Post-Fed Rate Increase", "#d61f1f"),
            ("Super-Prime", "#05409e"),
            ("Prime", "#4599d1"),
            ("Near-Prime", "#e04441"),
            ("Subprime", "#e58638"),
        ];

        Self {
            entries: entries
                .iter()
                .map(|(label, color)| PaletteEntry {
                    label: label.to_string(),
                    color: color.to_string(),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_label_lookup() {
        let palette = SegmentPalette::default();
        assert_eq!(palette.color_for("Prime, Post-Fed Rate Increase"), "#e04441");
        assert_eq!(palette.color_for("Prime"), "#4599d1");
        // Reversed order is a different label
        assert_eq!(palette.color_for("Post-Fed Rate Increase, Prime"), FALLBACK_COLOR);
        assert_eq!(palette.color_for("prime"), FALLBACK_COLOR);
    }
}
