use itertools::Itertools;
use serde::Deserialize;
use serde_json::from_str;
use thiserror::Error;

use include_dir::{include_dir, Dir};
use std::fs;
use std::path::{Path, PathBuf};

static CONTENT_DIR: Dir = include_dir!("src/content");

/// One multiple-choice question as it appears in a test document.
///
/// `correct_answer` is a prefix matched against the displayed choices
/// ("B" against "B. She doesn't like coffee."), never a full answer string.
#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub question: String,
    pub question_number: u32,
    pub answers: Vec<String>,
    pub correct_answer: String,
    #[serde(default)]
    pub answer_info: Vec<String>,
    #[serde(default)]
    pub answer_selection: Vec<String>,
    #[serde(default)]
    pub vocabulary: Vec<String>,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct Quiz {
    pub category: String,
    pub questions: Vec<Question>,
}

impl Quiz {
    /// Document invariants: a non-empty question list, exactly one choice per
    /// question matching the correct-answer prefix, and unique ascending
    /// question numbers.
    pub fn validate(&self) -> Result<(), String> {
        if self.questions.is_empty() {
            return Err("quiz has no questions".into());
        }

        for q in &self.questions {
            let matching = q
                .answers
                .iter()
                .filter(|a| a.starts_with(&q.correct_answer))
                .count();
            if matching != 1 {
                return Err(format!(
                    "question {} has {} choices matching '{}', expected exactly one",
                    q.question_number, matching, q.correct_answer
                ));
            }
        }

        let ascending = self
            .questions
            .iter()
            .map(|q| q.question_number)
            .tuple_windows()
            .all(|(a, b)| a < b);
        if !ascending {
            return Err("question numbers must be unique and ascending".into());
        }

        Ok(())
    }
}

#[derive(Error, Clone, Debug, PartialEq)]
pub enum ContentError {
    #[error("no test document for id '{0}'")]
    NotFound(String),
    #[error("test document '{id}' is malformed: {reason}")]
    Malformed { id: String, reason: String },
}

/// A listing entry for the home screen.
#[derive(Debug, Clone, PartialEq)]
pub struct TestEntry {
    pub id: String,
    pub category: String,
    pub question_count: usize,
}

/// Read-only source of test documents keyed by test identifier.
pub trait ContentStore: Send + Sync {
    fn fetch(&self, test_id: &str) -> Result<Quiz, ContentError>;
    fn list(&self) -> Vec<TestEntry>;
}

fn parse_document(test_id: &str, raw: &str) -> Result<Quiz, ContentError> {
    let quiz: Quiz = from_str(raw).map_err(|e| ContentError::Malformed {
        id: test_id.to_string(),
        reason: e.to_string(),
    })?;
    quiz.validate().map_err(|reason| ContentError::Malformed {
        id: test_id.to_string(),
        reason,
    })?;
    Ok(quiz)
}

fn document_name(test_id: &str) -> String {
    format!("test{}.json", test_id)
}

fn id_from_file_name(name: &str) -> Option<&str> {
    name.strip_prefix("test")?.strip_suffix(".json")
}

fn sorted_entries(mut entries: Vec<TestEntry>) -> Vec<TestEntry> {
    // Numeric ids first in numeric order, anything else after, alphabetically
    entries.sort_by_key(|e| {
        let number = e.id.parse::<u32>().ok();
        (number.is_none(), number, e.id.clone())
    });
    entries
}

/// Test documents compiled into the binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedContentStore;

impl EmbeddedContentStore {
    pub fn new() -> Self {
        Self
    }
}

impl ContentStore for EmbeddedContentStore {
    fn fetch(&self, test_id: &str) -> Result<Quiz, ContentError> {
        let file = CONTENT_DIR
            .get_file(document_name(test_id))
            .ok_or_else(|| ContentError::NotFound(test_id.to_string()))?;
        let raw = file
            .contents_utf8()
            .ok_or_else(|| ContentError::Malformed {
                id: test_id.to_string(),
                reason: "document is not valid utf-8".into(),
            })?;
        parse_document(test_id, raw)
    }

    fn list(&self) -> Vec<TestEntry> {
        let entries = CONTENT_DIR
            .files()
            .filter_map(|f| {
                let name = f.path().file_name()?.to_str()?;
                let id = id_from_file_name(name)?;
                let quiz = self.fetch(id).ok()?;
                Some(TestEntry {
                    id: id.to_string(),
                    category: quiz.category,
                    question_count: quiz.questions.len(),
                })
            })
            .collect();
        sorted_entries(entries)
    }
}

/// Test documents read from a directory on disk. Used by integration tests
/// and for authoring new content without rebuilding.
#[derive(Debug, Clone)]
pub struct DirContentStore {
    dir: PathBuf,
}

impl DirContentStore {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }
}

impl ContentStore for DirContentStore {
    fn fetch(&self, test_id: &str) -> Result<Quiz, ContentError> {
        let path = self.dir.join(document_name(test_id));
        let raw =
            fs::read_to_string(path).map_err(|_| ContentError::NotFound(test_id.to_string()))?;
        parse_document(test_id, &raw)
    }

    fn list(&self) -> Vec<TestEntry> {
        let Ok(dir) = fs::read_dir(&self.dir) else {
            return Vec::new();
        };
        let entries = dir
            .filter_map(|e| {
                let name = e.ok()?.file_name();
                let id = id_from_file_name(name.to_str()?)?.to_string();
                let quiz = self.fetch(&id).ok()?;
                Some(TestEntry {
                    id,
                    category: quiz.category,
                    question_count: quiz.questions.len(),
                })
            })
            .collect();
        sorted_entries(entries)
    }
}
