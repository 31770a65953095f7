use serde::{Deserialize, Serialize};

use crate::GamebookError;

pub const MAX_BRANCHES: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    // 1-based; columns count chars, not bytes.
    pub fn at_offset(source: &str, offset: usize) -> Self {
        let mut line = 1;
        let mut column = 1;
        for (index, ch) in source.char_indices() {
            if index >= offset {
                break;
            }
            if ch == '\n' {
                line += 1;
                column = 1;
            } else {
                column += 1;
            }
        }
        Self { line, column }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StatementKind {
    PlainText,
    ChoicePrompt,
    PauseDirective,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Branch {
    pub target_label: String,
    pub button_text: String,
}

impl Branch {
    pub fn new(target_label: impl Into<String>, button_text: impl Into<String>) -> Self {
        Self {
            target_label: target_label.into(),
            button_text: button_text.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Statement {
    Text { text: String },
    Choice { prompt: String, branches: Vec<Branch> },
    Pause { duration: String },
}

impl Statement {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    pub fn pause(duration: impl Into<String>) -> Self {
        Self::Pause {
            duration: duration.into(),
        }
    }

    pub fn choice(
        prompt: impl Into<String>,
        branches: Vec<Branch>,
        max_branches: usize,
    ) -> Result<Self, GamebookError> {
        if branches.len() > max_branches {
            return Err(GamebookError::new(
                "CHOICE_TOO_MANY_BRANCHES",
                format!(
                    "Choice prompt has {} branches, at most {} are allowed.",
                    branches.len(),
                    max_branches
                ),
            ));
        }
        Ok(Self::Choice {
            prompt: prompt.into(),
            branches,
        })
    }

    pub fn kind(&self) -> StatementKind {
        match self {
            Self::Text { .. } => StatementKind::PlainText,
            Self::Choice { .. } => StatementKind::ChoicePrompt,
            Self::Pause { .. } => StatementKind::PauseDirective,
        }
    }

    pub fn display_text(&self) -> &str {
        match self {
            Self::Text { text } => text,
            Self::Choice { prompt, .. } => prompt,
            Self::Pause { .. } => "",
        }
    }

    pub fn branches(&self) -> &[Branch] {
        match self {
            Self::Choice { branches, .. } => branches,
            _ => &[],
        }
    }
}
