//! Grading of a single submitted answer.
//!
//! Single-answer questions score all or nothing: only the exact singleton
//! selection of the correct option earns `1.0`. Multi-answer questions earn
//! `|selected ∩ correct| / |correct|`; extra incorrect ticks are not
//! penalised beyond that ratio.

use std::collections::HashSet;

use crate::model::{AnswerKey, Selection};

/// Score a selection against the displayed option order.
///
/// `options` is the order the user saw; `selection` holds indices into it.
/// A correct label missing from `options` cannot be selected, so it simply
/// does not contribute (single answers then score `0.0`).
#[must_use]
pub fn score(answer: &AnswerKey, selection: &Selection, options: &[String]) -> f64 {
    match answer {
        AnswerKey::Single(label) => match position_of(options, label) {
            Some(index) if selection.as_slice() == [index] => 1.0,
            _ => 0.0,
        },
        AnswerKey::Multiple(labels) => {
            let correct: Vec<usize> = labels
                .iter()
                .filter_map(|label| position_of(options, label))
                .collect();
            if correct.is_empty() {
                return 0.0;
            }
            let unique: HashSet<usize> = correct.iter().copied().collect();
            let hits = unique.iter().filter(|i| selection.contains(**i)).count();
            fraction(hits, correct.len())
        }
    }
}

/// True for an exact full-credit score.
#[must_use]
#[allow(clippy::float_cmp)]
pub fn is_full_credit(score: f64) -> bool {
    score == 1.0
}

/// True for an exact zero score.
#[must_use]
#[allow(clippy::float_cmp)]
pub fn is_no_credit(score: f64) -> bool {
    score == 0.0
}

#[allow(clippy::cast_precision_loss)]
fn fraction(hits: usize, of: usize) -> f64 {
    hits as f64 / of as f64
}

fn position_of(options: &[String], label: &str) -> Option<usize> {
    options.iter().position(|o| o == label)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| (*v).to_owned()).collect()
    }

    fn multi(values: &[&str]) -> AnswerKey {
        AnswerKey::Multiple(opts(values))
    }

    #[test]
    fn single_answer_requires_exact_singleton() {
        let options = opts(&["A", "B", "C"]);
        let answer = AnswerKey::Single("B".into());

        assert!(is_full_credit(score(&answer, &Selection::from([1]), &options)));
        assert!(is_no_credit(score(&answer, &Selection::from([0]), &options)));
        assert!(is_no_credit(score(&answer, &Selection::from([1, 2]), &options)));
        assert!(is_no_credit(score(&answer, &Selection::empty(), &options)));
    }

    #[test]
    fn single_answer_missing_from_options_scores_zero() {
        let options = opts(&["A", "B"]);
        let answer = AnswerKey::Single("Z".into());
        assert!(is_no_credit(score(&answer, &Selection::from([0]), &options)));
    }

    #[test]
    fn single_answer_uses_first_occurrence() {
        let options = opts(&["B", "A", "B"]);
        let answer = AnswerKey::Single("B".into());
        assert!(is_full_credit(score(&answer, &Selection::from([0]), &options)));
        assert!(is_no_credit(score(&answer, &Selection::from([2]), &options)));
    }

    #[test]
    fn multi_answer_partial_credit() {
        let options = opts(&["W", "X", "Y", "Z"]);
        let answer = multi(&["X", "Y"]);

        assert!(is_full_credit(score(&answer, &Selection::from([1, 2]), &options)));
        assert!(is_no_credit(score(&answer, &Selection::empty(), &options)));
        let half = score(&answer, &Selection::from([1, 3]), &options);
        assert!((half - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn multi_answer_extra_ticks_are_not_penalised() {
        let options = opts(&["W", "X", "Y", "Z"]);
        let answer = multi(&["X", "Y", "Z"]);

        let all = score(&answer, &Selection::from([0, 1, 2, 3]), &options);
        assert!(is_full_credit(all));

        let one_plus_wrong = score(&answer, &Selection::from([0, 3]), &options);
        assert!((one_plus_wrong - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn multi_answer_with_no_present_labels_scores_zero() {
        let options = opts(&["A", "B"]);
        assert!(is_no_credit(score(&multi(&["Q"]), &Selection::from([0, 1]), &options)));
        assert!(is_no_credit(score(&multi(&[]), &Selection::from([0]), &options)));
    }

    #[test]
    fn duplicated_answer_label_counts_twice_in_denominator() {
        let options = opts(&["A", "B"]);
        let answer = multi(&["A", "A"]);
        let s = score(&answer, &Selection::from([0]), &options);
        assert!((s - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn j_of_k_correct_plus_any_incorrect_is_j_over_k() {
        let options = opts(&["A", "B", "C", "D", "E", "F"]);
        let answer = multi(&["A", "C", "E", "F"]);
        for (selection, expected) in [
            (Selection::from([0, 1]), 0.25),
            (Selection::from([0, 2, 3]), 0.5),
            (Selection::from([0, 1, 2, 3, 4]), 0.75),
            (Selection::from([1, 3]), 0.0),
        ] {
            let s = score(&answer, &selection, &options);
            assert!((s - expected).abs() < 1e-12, "{selection:?} scored {s}");
        }
    }
}
