use crate::session::AnswerRecord;

/// Number of correct answers in a completed (or partial) answer list.
/// Order-independent.
pub fn score(answers: &[AnswerRecord]) -> u32 {
    answers.iter().filter(|a| a.is_correct).count() as u32
}

/// Rounded percentage, with an empty test defined as 0% rather than an error.
pub fn percentage(score: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    ((score as f64 / total as f64) * 100.0).round() as u32
}

/// Qualitative score band used for results messaging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Tier {
    #[strum(serialize = "excellent")]
    Excellent,
    #[strum(serialize = "good")]
    Good,
    #[strum(serialize = "needs improvement")]
    NeedsImprovement,
}

impl Tier {
    /// Band thresholds are fixed at 80 and 60.
    pub fn from_percentage(percentage: u32) -> Self {
        if percentage >= 80 {
            Tier::Excellent
        } else if percentage >= 60 {
            Tier::Good
        } else {
            Tier::NeedsImprovement
        }
    }

    pub fn headline(&self) -> &'static str {
        match self {
            Tier::Excellent | Tier::Good => "Congratulations!",
            Tier::NeedsImprovement => "Keep Trying!",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Tier::Excellent => "Excellent! Great job, you did it!",
            Tier::Good => "Good job! Keep practicing to improve further.",
            Tier::NeedsImprovement => "Keep studying and try again!",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(is_correct: bool) -> AnswerRecord {
        AnswerRecord {
            question_number: 1,
            selected_answer: "A. something".into(),
            is_correct,
        }
    }

    #[test]
    fn test_score_counts_correct_records() {
        let answers = vec![record(true), record(false), record(true)];
        assert_eq!(score(&answers), 2);
    }

    #[test]
    fn test_score_empty_list() {
        assert_eq!(score(&[]), 0);
    }

    #[test]
    fn test_score_is_order_independent() {
        let mut answers = vec![record(true), record(false), record(false), record(true)];
        let forward = score(&answers);
        answers.reverse();
        assert_eq!(score(&answers), forward);
    }

    #[test]
    fn test_percentage_zero_total() {
        assert_eq!(percentage(0, 0), 0);
    }

    #[test]
    fn test_percentage_rounds() {
        assert_eq!(percentage(3, 4), 75);
        assert_eq!(percentage(2, 3), 67);
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(4, 4), 100);
    }

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(Tier::from_percentage(80), Tier::Excellent);
        assert_eq!(Tier::from_percentage(79), Tier::Good);
        assert_eq!(Tier::from_percentage(60), Tier::Good);
        assert_eq!(Tier::from_percentage(59), Tier::NeedsImprovement);
        assert_eq!(Tier::from_percentage(100), Tier::Excellent);
        assert_eq!(Tier::from_percentage(0), Tier::NeedsImprovement);
    }

    #[test]
    fn test_tier_display() {
        assert_eq!(Tier::Excellent.to_string(), "excellent");
        assert_eq!(Tier::Good.to_string(), "good");
        assert_eq!(Tier::NeedsImprovement.to_string(), "needs improvement");
    }

    #[test]
    fn test_tier_messages() {
        assert!(Tier::Excellent.message().starts_with("Excellent"));
        assert!(Tier::Good.message().starts_with("Good job"));
        assert_eq!(Tier::NeedsImprovement.headline(), "Keep Trying!");
    }
}
