use std::collections::{HashMap, HashSet};

use crate::models::{AggregateResult, Assignment, Category, CategoryBucket, CategoryLine};

/// Effective weight per category given which categories have data.
///
/// Without renormalization, present categories keep their fixed weight and
/// absent ones drop to 0, so the total can fall below 1. With
/// renormalization the fixed weights of the present set are rescaled to sum
/// to exactly 1; an empty present set resolves everything to 0.
pub fn resolve_weights(
    present: &HashSet<Category>,
    renormalize: bool,
) -> HashMap<Category, f64> {
    let mut weights: HashMap<Category, f64> =
        Category::ALL.iter().map(|&c| (c, 0.0)).collect();

    if !renormalize {
        for &category in present {
            weights.insert(category, category.fixed_weight());
        }
        return weights;
    }

    let total: f64 = present.iter().map(|c| c.fixed_weight()).sum();
    if total <= 0.0 {
        return weights;
    }
    for &category in present {
        weights.insert(category, category.fixed_weight() / total);
    }
    weights
}

pub fn bucket_assignments(assignments: &[Assignment]) -> HashMap<Category, CategoryBucket> {
    let mut buckets: HashMap<Category, CategoryBucket> = Category::ALL
        .iter()
        .map(|&c| (c, CategoryBucket::default()))
        .collect();

    for assignment in assignments {
        // possible == 0 means "not yet gradeable"; earned is already >= 0.
        if assignment.possible > 0.0 {
            let bucket = buckets.entry(assignment.category).or_default();
            bucket.earned += assignment.earned;
            bucket.possible += assignment.possible;
        }
    }

    buckets
}

pub fn aggregate(assignments: &[Assignment], renormalize: bool) -> AggregateResult {
    let buckets = bucket_assignments(assignments);

    let mut percents: HashMap<Category, Option<f64>> = HashMap::new();
    let mut present: HashSet<Category> = HashSet::new();
    for &category in Category::ALL.iter() {
        let bucket = buckets[&category];
        let percent = if bucket.possible > 0.0 {
            // Not clamped at 1.0: extra credit can push a category past 100%.
            Some(bucket.earned / bucket.possible)
        } else {
            None
        };
        if percent.is_some() {
            present.insert(category);
        }
        percents.insert(category, percent);
    }

    let weights = resolve_weights(&present, renormalize);

    let mut final_sum = 0.0;
    let mut weight_sum = 0.0;
    let mut categories = Vec::with_capacity(Category::ALL.len());
    for &category in Category::ALL.iter() {
        let percent = percents[&category];
        let weight = weights[&category];
        if let Some(p) = percent {
            if weight > 0.0 {
                final_sum += p * weight;
                weight_sum += weight;
            }
        }
        categories.push(CategoryLine {
            category,
            percent,
            weight,
        });
    }

    let final_percent = if weight_sum > 0.0 { Some(final_sum) } else { None };

    let missing: Vec<Category> = Category::ALL
        .iter()
        .copied()
        .filter(|c| !present.contains(c))
        .collect();

    AggregateResult {
        categories,
        final_percent,
        letter: letter_for(final_percent),
        missing,
    }
}

/// Threshold table applied to `percent * 100`, top-down, first match wins.
/// An undefined percent yields `None`, the "no grade" sentinel.
pub fn letter_for(percent: Option<f64>) -> Option<&'static str> {
    let x = percent? * 100.0;
    let letter = if x >= 97.0 {
        "A+"
    } else if x >= 93.0 {
        "A"
    } else if x >= 90.0 {
        "A-"
    } else if x >= 87.0 {
        "B+"
    } else if x >= 83.0 {
        "B"
    } else if x >= 80.0 {
        "B-"
    } else if x >= 77.0 {
        "C+"
    } else if x >= 73.0 {
        "C"
    } else if x >= 70.0 {
        "C-"
    } else if x >= 67.0 {
        "D+"
    } else if x >= 63.0 {
        "D"
    } else if x >= 60.0 {
        "D-"
    } else {
        "F"
    };
    Some(letter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Assignment;

    const EPS: f64 = 1e-9;

    fn assignment(category: Category, earned: f64, possible: f64) -> Assignment {
        Assignment::new("Sample", category, earned, possible)
    }

    fn present_set(categories: &[Category]) -> HashSet<Category> {
        categories.iter().copied().collect()
    }

    #[test]
    fn fixed_weights_zero_out_absent_categories() {
        let weights = resolve_weights(&present_set(&[Category::Major]), false);
        assert_eq!(weights[&Category::Formative], 0.0);
        assert_eq!(weights[&Category::Minor], 0.0);
        assert!((weights[&Category::Major] - 0.60).abs() < EPS);
    }

    #[test]
    fn fixed_weights_never_exceed_the_table() {
        for categories in [
            vec![],
            vec![Category::Formative],
            vec![Category::Minor, Category::Major],
            Category::ALL.to_vec(),
        ] {
            let weights = resolve_weights(&present_set(&categories), false);
            let mut total = 0.0;
            for &c in Category::ALL.iter() {
                assert!(weights[&c] <= c.fixed_weight() + EPS);
                total += weights[&c];
            }
            assert!(total <= 1.0 + EPS);
        }
    }

    #[test]
    fn renormalized_weights_sum_to_one_over_present_set() {
        for categories in [
            vec![Category::Formative],
            vec![Category::Major],
            vec![Category::Formative, Category::Minor],
            Category::ALL.to_vec(),
        ] {
            let present = present_set(&categories);
            let weights = resolve_weights(&present, true);
            let total: f64 = present.iter().map(|c| weights[c]).sum();
            assert!((total - 1.0).abs() < EPS);
            for &c in Category::ALL.iter() {
                if !present.contains(&c) {
                    assert_eq!(weights[&c], 0.0);
                }
            }
        }
    }

    #[test]
    fn renormalize_with_nothing_present_resolves_all_zero() {
        let weights = resolve_weights(&HashSet::new(), true);
        for &c in Category::ALL.iter() {
            assert_eq!(weights[&c], 0.0);
        }
    }

    #[test]
    fn ungradeable_assignments_never_touch_the_buckets() {
        let base = vec![assignment(Category::Minor, 27.0, 30.0)];
        let mut with_extra = base.clone();
        with_extra.push(assignment(Category::Minor, 99.0, 0.0));

        let a = bucket_assignments(&base);
        let b = bucket_assignments(&with_extra);
        assert_eq!(a[&Category::Minor], b[&Category::Minor]);
    }

    #[test]
    fn lone_major_under_fixed_weights() {
        // 45/50 major only: 0.9 * 0.60 with nothing else contributing.
        let result = aggregate(&[assignment(Category::Major, 45.0, 50.0)], false);
        let final_percent = result.final_percent.unwrap();
        assert!((final_percent - 0.54).abs() < EPS);
        assert_eq!(result.letter, Some("F"));
        assert_eq!(result.missing, vec![Category::Formative, Category::Minor]);
    }

    #[test]
    fn lone_major_renormalized_takes_full_weight() {
        let result = aggregate(&[assignment(Category::Major, 45.0, 50.0)], true);
        let final_percent = result.final_percent.unwrap();
        assert!((final_percent - 0.90).abs() < EPS);
        assert_eq!(result.letter, Some("A-"));
        let major = result.categories[2];
        assert!((major.weight - 1.0).abs() < EPS);
        assert_eq!(result.missing, vec![Category::Formative, Category::Minor]);
    }

    #[test]
    fn all_categories_present_uses_fixed_weights_directly() {
        let assignments = vec![
            assignment(Category::Formative, 8.0, 10.0),
            assignment(Category::Minor, 27.0, 30.0),
            assignment(Category::Major, 54.0, 60.0),
        ];
        let result = aggregate(&assignments, false);
        let final_percent = result.final_percent.unwrap();
        assert!((final_percent - 0.89).abs() < EPS);
        assert_eq!(result.letter, Some("B+"));
        assert!(result.missing.is_empty());
    }

    #[test]
    fn no_assignments_yields_the_no_grade_sentinel() {
        let result = aggregate(&[], false);
        assert_eq!(result.final_percent, None);
        assert_eq!(result.letter, None);
        assert_eq!(result.missing, Category::ALL.to_vec());
        for line in &result.categories {
            assert_eq!(line.percent, None);
            assert_eq!(line.weight, 0.0);
        }
    }

    #[test]
    fn negative_possible_is_equivalent_to_omitting_the_record() {
        let kept = vec![assignment(Category::Minor, 18.0, 20.0)];
        let mut with_bad = kept.clone();
        with_bad.push(assignment(Category::Major, 10.0, -5.0));

        assert_eq!(aggregate(&kept, false), aggregate(&with_bad, false));
    }

    #[test]
    fn aggregation_is_idempotent() {
        let assignments = vec![
            assignment(Category::Formative, 3.0, 5.0),
            assignment(Category::Major, 88.0, 100.0),
        ];
        assert_eq!(aggregate(&assignments, true), aggregate(&assignments, true));
        assert_eq!(aggregate(&assignments, false), aggregate(&assignments, false));
    }

    #[test]
    fn extra_credit_pushes_percent_past_one_uncapped() {
        let result = aggregate(&[assignment(Category::Major, 60.0, 50.0)], true);
        let major = result.categories[2];
        assert!((major.percent.unwrap() - 1.2).abs() < EPS);
        assert!((result.final_percent.unwrap() - 1.2).abs() < EPS);
        assert_eq!(result.letter, Some("A+"));
    }

    #[test]
    fn letter_boundaries_are_closed_on_the_lower_end() {
        let cases = [
            (97.0, "A+"),
            (96.999, "A"),
            (93.0, "A"),
            (90.0, "A-"),
            (87.0, "B+"),
            (83.0, "B"),
            (80.0, "B-"),
            (77.0, "C+"),
            (73.0, "C"),
            (70.0, "C-"),
            (67.0, "D+"),
            (63.0, "D"),
            (60.0, "D-"),
            (59.999, "F"),
            (0.0, "F"),
            (110.0, "A+"),
        ];
        for (x, expected) in cases {
            assert_eq!(letter_for(Some(x / 100.0)), Some(expected), "at {x}");
        }
        assert_eq!(letter_for(None), None);
    }
}
