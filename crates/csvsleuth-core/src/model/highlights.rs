/// Highlights: the fixed-shape summary produced by analysing a spend report.
///
/// The same record shape is used for streaming partial results (computed
/// over the rows read so far) and for the final result. Field names are the
/// snake_case keys persisted in the history file.
use super::format::{format_amount, format_count};
use serde::{Deserialize, Serialize};

/// Summary of a galactic spend report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Highlights {
    /// Sum of `spend` across all rows.
    pub total_spend_galactic: f64,
    /// Number of data rows that contributed to the totals.
    pub rows_affected: u64,
    /// Day of year with the smallest total spend.
    pub less_spent_at: u32,
    /// Day of year with the largest total spend.
    pub big_spent_at: u32,
    /// Total spend on `less_spent_at`.
    pub less_spent_value: f64,
    /// Total spend on `big_spent_at`.
    pub big_spent_value: f64,
    /// `total_spend_galactic / rows_affected`.
    pub average_spend_galactic: f64,
    /// Civilisation with the largest total spend.
    pub big_spent_civ: String,
    /// Civilisation with the smallest total spend.
    pub less_spent_civ: String,
}

/// A single display card: a headline value and what it means.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightCard {
    pub title: String,
    pub description: &'static str,
}

impl HighlightCard {
    fn new(title: String, description: &'static str) -> Self {
        Self { title, description }
    }
}

impl Highlights {
    /// Convert the record into display cards, in a stable order.
    ///
    /// Both the upload page and the history modal render exactly this list.
    pub fn to_cards(&self) -> Vec<HighlightCard> {
        vec![
            HighlightCard::new(
                format_amount(self.total_spend_galactic),
                "Total spend in galactic credits",
            ),
            HighlightCard::new(self.less_spent_civ.clone(), "Civilisation with the lowest spend"),
            HighlightCard::new(format_count(self.rows_affected), "Rows processed"),
            HighlightCard::new(format_day(self.big_spent_at), "Day of year with the highest spend"),
            HighlightCard::new(format_day(self.less_spent_at), "Day of year with the lowest spend"),
            HighlightCard::new(
                format_amount(self.big_spent_value),
                "Highest spend in a single day",
            ),
            HighlightCard::new(
                format_amount(self.less_spent_value),
                "Lowest spend in a single day",
            ),
            HighlightCard::new(self.big_spent_civ.clone(), "Civilisation with the highest spend"),
            HighlightCard::new(
                format_amount(self.average_spend_galactic),
                "Average spend in galactic credits",
            ),
        ]
    }
}

/// Render a zero-based day-of-year index as a human-readable label.
///
/// Stored history is not range-checked; the index is widened so the label
/// cannot overflow on out-of-range values.
pub fn format_day(day: u32) -> String {
    format!("day {}", u64::from(day) + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Highlights {
        Highlights {
            total_spend_galactic: 1000.0,
            rows_affected: 50,
            less_spent_at: 100,
            big_spent_at: 500,
            less_spent_value: 50.0,
            big_spent_value: 200.0,
            average_spend_galactic: 150.0,
            big_spent_civ: "humans".into(),
            less_spent_civ: "aliens".into(),
        }
    }

    #[test]
    fn cards_cover_every_field_once() {
        let cards = sample().to_cards();
        assert_eq!(cards.len(), 9);
        assert_eq!(cards[0].title, "1000");
        assert_eq!(cards[0].description, "Total spend in galactic credits");
        assert!(cards.iter().any(|c| c.title == "humans"));
        assert!(cards.iter().any(|c| c.title == "aliens"));
        assert!(cards.iter().any(|c| c.title == "150"));
    }

    #[test]
    fn day_labels_are_one_based() {
        assert_eq!(format_day(0), "day 1");
        assert_eq!(format_day(364), "day 365");
    }

    #[test]
    fn serialises_with_snake_case_keys() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["total_spend_galactic"], 1000.0);
        assert_eq!(json["big_spent_civ"], "humans");
        assert_eq!(json["rows_affected"], 50);
    }

    #[test]
    fn out_of_range_stored_day_renders_without_panicking() {
        let json = r#"{
            "total_spend_galactic": 10.0,
            "rows_affected": 1,
            "less_spent_at": 4294967295,
            "big_spent_at": 4294967295,
            "less_spent_value": 10.0,
            "big_spent_value": 10.0,
            "average_spend_galactic": 10.0,
            "big_spent_civ": "humans",
            "less_spent_civ": "humans"
        }"#;
        let h: Highlights = serde_json::from_str(json).unwrap();
        let cards = h.to_cards();
        assert_eq!(cards[3].title, "day 4294967296");
        assert_eq!(cards[4].title, "day 4294967296");
    }

    #[test]
    fn empty_civ_labels_still_produce_cards() {
        let h = Highlights::default();
        let cards = h.to_cards();
        assert_eq!(cards.len(), 9);
        assert_eq!(cards[1].title, "");
    }
}
