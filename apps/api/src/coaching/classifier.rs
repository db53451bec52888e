//! Question classification: decides whether a question is a case/scenario
//! question (longer answer allowed) or a standard one.
//!
//! Keyword heuristic only: a plain case-insensitive substring match. It will
//! misfire on questions that use a keyword incidentally ("problema" in an
//! unrelated sense); that is accepted behavior, not something to patch here.

use serde::{Deserialize, Serialize};

/// Portuguese terms first (the product's locale), then English equivalents.
pub const DEFAULT_CASE_KEYWORDS: &[&str] = &[
    "case",
    "cenário",
    "situação",
    "como você faria",
    "como faria",
    "resolver",
    "resolveu",
    "desafio",
    "problema",
    "scenario",
    "situation",
    "how would you",
    "solve",
    "challenge",
    "problem",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    Case,
    Standard,
}

impl QuestionKind {
    /// Maximum number of non-empty lines in a shaped answer.
    pub const fn line_limit(self) -> usize {
        match self {
            QuestionKind::Case => 10,
            QuestionKind::Standard => 8,
        }
    }
}

/// Lowercased keyword set used to spot case questions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseKeywords {
    keywords: Vec<String>,
}

impl CaseKeywords {
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut unique: Vec<String> = Vec::new();
        for keyword in keywords {
            let keyword = keyword.as_ref().trim().to_lowercase();
            if !keyword.is_empty() && !unique.contains(&keyword) {
                unique.push(keyword);
            }
        }
        Self { keywords: unique }
    }

    /// Parses a comma-separated list. `None` if it holds no usable keyword.
    pub fn parse(raw: &str) -> Option<Self> {
        let parsed = Self::new(raw.split(','));
        (!parsed.keywords.is_empty()).then_some(parsed)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.keywords
    }

    /// Any keyword occurring anywhere in the question makes it a case question.
    pub fn classify(&self, question: &str) -> QuestionKind {
        let question = question.to_lowercase();
        if self.keywords.iter().any(|k| question.contains(k.as_str())) {
            QuestionKind::Case
        } else {
            QuestionKind::Standard
        }
    }
}

impl Default for CaseKeywords {
    fn default() -> Self {
        Self::new(DEFAULT_CASE_KEYWORDS)
    }
}
