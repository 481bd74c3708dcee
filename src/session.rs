use crate::content::{Question, Quiz};
use crate::score;
use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    /// Advance/retreat outside the allowed bounds. Callers treat this as a
    /// no-op; the controls are disabled in the UI before it can happen.
    #[error("transition not allowed from the current position")]
    InvalidTransition,
}

/// Outcome of one answered question. At most one record per question exists
/// at any time; re-answering replaces rather than appends.
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerRecord {
    pub question_number: u32,
    pub selected_answer: String,
    pub is_correct: bool,
}

/// The supplementary text blocks a question can open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfoKind {
    AnswerInfo,
    Vocabulary,
}

impl InfoKind {
    pub fn title(&self) -> &'static str {
        match self {
            InfoKind::AnswerInfo => "Answer Information",
            InfoKind::Vocabulary => "Vocabulary",
        }
    }
}

/// What `advance` did: either moved to the next question or finalized the
/// attempt with the score to hand off to the results view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    Moved,
    Finished { score: u32, total: u32 },
}

/// One attempt at a single test: the loaded quiz, the position cursor and the
/// answers committed so far. Discarded when the user leaves or finishes; the
/// final score travels onward as route parameters only.
#[derive(Debug, Clone)]
pub struct Session {
    pub test_id: String,
    quiz: Quiz,
    current_index: usize,
    answers: Vec<AnswerRecord>,
    revealed: bool,
}

impl Session {
    pub fn new(test_id: impl Into<String>, quiz: Quiz) -> Self {
        Self {
            test_id: test_id.into(),
            quiz,
            current_index: 0,
            answers: Vec::new(),
            revealed: false,
        }
    }

    pub fn quiz(&self) -> &Quiz {
        &self.quiz
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn total(&self) -> usize {
        self.quiz.questions.len()
    }

    pub fn current_question(&self) -> &Question {
        &self.quiz.questions[self.current_index]
    }

    pub fn answers(&self) -> &[AnswerRecord] {
        &self.answers
    }

    /// Whether the current question has a locked-in answer and its feedback
    /// is visible.
    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    /// The record for the current question, present only while revealed.
    pub fn current_answer(&self) -> Option<&AnswerRecord> {
        if self.revealed {
            self.answers.last()
        } else {
            None
        }
    }

    /// Locks in an answer for the current question and reveals feedback.
    /// Correctness is a prefix match against the canonical answer marker
    /// ("B. She doesn't like coffee." matches a stored "B"), never equality.
    /// Texts not present in the choice list are accepted and scored
    /// incorrect.
    pub fn select_answer(&mut self, answer_text: &str) {
        let question = self.current_question();
        let record = AnswerRecord {
            question_number: question.question_number,
            selected_answer: answer_text.to_string(),
            is_correct: answer_text.starts_with(&question.correct_answer),
        };

        if self.revealed {
            // The UI locks input once revealed; if a second selection gets
            // through anyway, replace so the one-record-per-question
            // invariant holds.
            *self.answers.last_mut().unwrap() = record;
        } else {
            self.answers.push(record);
            self.revealed = true;
        }
    }

    /// Moves to the next question, or finalizes the attempt at the last one.
    /// Requires the current question to be answered.
    pub fn advance(&mut self) -> Result<Progress, SessionError> {
        if !self.revealed {
            return Err(SessionError::InvalidTransition);
        }

        if self.current_index + 1 < self.quiz.questions.len() {
            self.current_index += 1;
            self.revealed = false;
            Ok(Progress::Moved)
        } else {
            Ok(Progress::Finished {
                score: score::score(&self.answers),
                total: self.quiz.questions.len() as u32,
            })
        }
    }

    /// Steps back one question. The current selection (if any) and the
    /// answer committed for the question being returned to are both
    /// discarded, so it must be re-answered on the way forward. Keeps
    /// `answers.len() == current_index` after every retreat.
    pub fn retreat(&mut self) -> Result<(), SessionError> {
        if self.current_index == 0 {
            return Err(SessionError::InvalidTransition);
        }

        if self.revealed {
            self.answers.pop();
        }
        self.current_index -= 1;
        self.revealed = false;
        self.answers.pop();
        Ok(())
    }

    /// Read-only supplementary text for the current question.
    pub fn info(&self, kind: InfoKind) -> Vec<String> {
        let question = self.current_question();
        match kind {
            InfoKind::AnswerInfo => question
                .answer_info
                .iter()
                .chain(question.answer_selection.iter())
                .cloned()
                .collect(),
            InfoKind::Vocabulary => question.vocabulary.clone(),
        }
    }
}

/// Lifecycle of one quiz attempt, from nothing loaded to a completed score.
/// A tagged variant so that states like "completed but no score" cannot be
/// represented.
#[derive(Debug, Clone)]
pub enum SessionPhase {
    Idle,
    Loading {
        test_id: String,
        generation: u64,
    },
    Active(Session),
    Completed {
        test_id: String,
        score: u32,
        total: u32,
    },
}

impl SessionPhase {
    /// Whether a finished fetch belongs to the load we are still waiting
    /// for. Stale results (the user navigated away, or a newer load started)
    /// must be discarded without touching any state.
    pub fn accepts_load(&self, test_id: &str, generation: u64) -> bool {
        matches!(
            self,
            SessionPhase::Loading { test_id: id, generation: gen }
                if id == test_id && *gen == generation
        )
    }
}
