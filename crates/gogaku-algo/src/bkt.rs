//! Bayesian Knowledge Tracing mastery update.
//!
//! Standard two-state BKT: the posterior over the known state given the
//! observed answer, followed by the learning transition, collapsed into
//! a single step.
//!
//! Correct answer:
//! ```text
//! P(correct) = m*(1-slip) + (1-m)*guess
//! m' = (m*(1-slip) + (1-m)*learn*guess) / P(correct)
//! ```
//!
//! Incorrect answer:
//! ```text
//! P(incorrect) = m*slip + (1-m)*(1-guess)
//! m' = (m*slip + (1-m)*learn*(1-guess)) / P(incorrect)
//! ```
//!
//! References:
//! - Corbett, A. T., & Anderson, J. R. (1995). Knowledge tracing:
//!   Modeling the acquisition of procedural knowledge.

use crate::types::BktParams;

/// New mastery probability after one observed answer.
///
/// When the evidence probability is exactly zero the observation carries
/// no usable signal and the mastery is returned unchanged rather than
/// dividing by zero. The result is clamped into [0, 1].
pub fn update_mastery(mastery: f64, is_correct: bool, params: &BktParams) -> f64 {
    let BktParams {
        learning_rate,
        slip_rate,
        guess_rate,
        ..
    } = *params;

    if is_correct {
        let p_correct = mastery * (1.0 - slip_rate) + (1.0 - mastery) * guess_rate;
        if p_correct == 0.0 {
            return mastery;
        }
        let numerator = mastery * (1.0 - slip_rate) + (1.0 - mastery) * learning_rate * guess_rate;
        (numerator / p_correct).min(1.0)
    } else {
        let p_incorrect = mastery * slip_rate + (1.0 - mastery) * (1.0 - guess_rate);
        if p_incorrect == 0.0 {
            return mastery;
        }
        let numerator = mastery * slip_rate + (1.0 - mastery) * learning_rate * (1.0 - guess_rate);
        (numerator / p_incorrect).max(0.0)
    }
}
