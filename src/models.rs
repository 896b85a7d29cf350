use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Longest assignment name we will store.
pub const NAME_MAX_LEN: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Formative,
    Minor,
    Major,
}

impl Category {
    /// Fixed iteration order used everywhere categories are listed.
    pub const ALL: [Category; 3] = [Category::Formative, Category::Minor, Category::Major];

    /// The fixed 10/30/60 weight table. Never mutated at runtime.
    pub fn fixed_weight(self) -> f64 {
        match self {
            Category::Formative => 0.10,
            Category::Minor => 0.30,
            Category::Major => 0.60,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::Formative => "Graded Formative",
            Category::Minor => "Minor Summative",
            Category::Major => "Major Summative",
        }
    }

    /// Unrecognized input falls back to formative rather than failing.
    pub fn parse_or_default(raw: &str) -> Category {
        match raw.trim() {
            "minor" => Category::Minor,
            "major" => Category::Major,
            _ => Category::Formative,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub category: Category,
    pub earned: f64,
    pub possible: f64,
}

impl Assignment {
    pub fn new(name: &str, category: Category, earned: f64, possible: f64) -> Assignment {
        Assignment {
            id: new_id(),
            name: truncate_name(name),
            category,
            earned: coerce_points(earned),
            possible: coerce_points(possible),
        }
    }

    /// Per-row percent; `None` while the assignment is not yet gradeable.
    pub fn percent(&self) -> Option<f64> {
        if self.possible > 0.0 {
            Some(self.earned / self.possible)
        } else {
            None
        }
    }
}

/// Per-category running sums for one aggregation pass. Never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CategoryBucket {
    pub earned: f64,
    pub possible: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CategoryLine {
    pub category: Category,
    /// `None` means the category has no gradeable assignments.
    pub percent: Option<f64>,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AggregateResult {
    /// One line per category, in the fixed formative/minor/major order.
    pub categories: Vec<CategoryLine>,
    pub final_percent: Option<f64>,
    /// `None` is the "no grade" sentinel, distinct from an F.
    pub letter: Option<&'static str>,
    /// Categories without gradeable data, in fixed order.
    pub missing: Vec<Category>,
}

pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

pub fn truncate_name(raw: &str) -> String {
    raw.chars().take(NAME_MAX_LEN).collect()
}

/// Points are always non-negative and finite; everything else becomes 0.
pub fn coerce_points(value: f64) -> f64 {
    if value.is_finite() && value >= 0.0 {
        value
    } else {
        0.0
    }
}

/// Same coercion applied to raw text input from edits or imports.
pub fn coerce_points_str(raw: &str) -> f64 {
    raw.trim().parse::<f64>().map_or(0.0, coerce_points)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unrecognized_category_defaults_to_formative() {
        assert_eq!(Category::parse_or_default("major"), Category::Major);
        assert_eq!(Category::parse_or_default("minor"), Category::Minor);
        assert_eq!(Category::parse_or_default("formative"), Category::Formative);
        assert_eq!(Category::parse_or_default("extra-credit"), Category::Formative);
        assert_eq!(Category::parse_or_default(""), Category::Formative);
    }

    #[test]
    fn fixed_weights_sum_to_one() {
        let total: f64 = Category::ALL.iter().map(|c| c.fixed_weight()).sum();
        assert!((total - 1.0).abs() < 1e-12);
    }

    #[test]
    fn points_coercion_rejects_negative_and_non_finite() {
        assert_eq!(coerce_points(12.5), 12.5);
        assert_eq!(coerce_points(0.0), 0.0);
        assert_eq!(coerce_points(-5.0), 0.0);
        assert_eq!(coerce_points(f64::NAN), 0.0);
        assert_eq!(coerce_points(f64::INFINITY), 0.0);
    }

    #[test]
    fn points_coercion_from_text() {
        assert_eq!(coerce_points_str("45"), 45.0);
        assert_eq!(coerce_points_str(" 7.5 "), 7.5);
        assert_eq!(coerce_points_str("-3"), 0.0);
        assert_eq!(coerce_points_str("abc"), 0.0);
        assert_eq!(coerce_points_str(""), 0.0);
    }

    #[test]
    fn names_are_capped_at_two_hundred_chars() {
        let long = "x".repeat(500);
        assert_eq!(truncate_name(&long).chars().count(), NAME_MAX_LEN);
        assert_eq!(truncate_name("Quiz 1"), "Quiz 1");
    }

    #[test]
    fn row_percent_is_none_without_possible_points() {
        let a = Assignment::new("Quiz", Category::Minor, 8.0, 10.0);
        assert_eq!(a.percent(), Some(0.8));
        let b = Assignment::new("Draft", Category::Minor, 8.0, 0.0);
        assert_eq!(b.percent(), None);
    }

    #[test]
    fn constructor_sanitizes_every_field() {
        let a = Assignment::new("Test", Category::Major, -4.0, f64::NAN);
        assert_eq!(a.earned, 0.0);
        assert_eq!(a.possible, 0.0);
        assert_eq!(a.category, Category::Major);
        assert!(!a.id.is_empty());
    }
}
