use serde::{Deserialize, Serialize};

pub const TESTCASE_SCHEMA_V1: &str = "gb-tool-case.v1";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCase {
    pub schema_version: String,
    #[serde(default = "default_script")]
    pub script: String,
    #[serde(default = "default_start_label")]
    pub start_label: String,
    #[serde(default)]
    pub strict: bool,
    #[serde(default)]
    pub actions: Vec<TestAction>,
    #[serde(default)]
    pub expected_events: Vec<ExpectedEvent>,
}

fn default_script() -> String {
    "story.lgscript".to_string()
}

fn default_start_label() -> String {
    "*start".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TestAction {
    Choose { target: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceEntry {
    pub target: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ExpectedEvent {
    Text {
        text: String,
    },
    Choices {
        prompt: String,
        choices: Vec<ChoiceEntry>,
    },
    Pause {
        duration: String,
    },
    End,
}
