use std::path::Path;

use gb_api::{load_script_file, resolve_reference, resolve_with_options, ParseOptions, Strictness};
use gb_core::Statement;
use tracing::debug;

use crate::source::read_test_case;
use crate::{ChoiceEntry, ExpectedEvent, GbToolError, TestAction, TestCase};

const MAX_STEPS: usize = 5_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub observed_events: Vec<ExpectedEvent>,
    pub consumed_actions: usize,
    pub steps: usize,
}

pub fn run_case(example_dir: &Path, case: &TestCase) -> Result<RunReport, GbToolError> {
    let source = load_script_file(&example_dir.join(&case.script))?;
    let options = ParseOptions {
        strictness: if case.strict {
            Strictness::Strict
        } else {
            Strictness::Lenient
        },
        ..ParseOptions::default()
    };

    let mut statements = resolve_with_options(&source, &case.start_label, options)?;
    let mut observed_events = Vec::new();
    let mut action_index = 0usize;

    for step in 1..=MAX_STEPS {
        debug!(step, statements = statements.len(), "segment resolved");
        let mut offered = Vec::new();
        for statement in &statements {
            observed_events.push(observe(statement));
            if let Statement::Choice { branches, .. } = statement {
                offered = branches
                    .iter()
                    .map(|branch| branch.target_label.clone())
                    .collect();
            }
        }

        if offered.is_empty() {
            observed_events.push(ExpectedEvent::End);
            if action_index != case.actions.len() {
                return Err(GbToolError::UnusedActions {
                    used: action_index,
                    total: case.actions.len(),
                });
            }
            return Ok(RunReport {
                observed_events,
                consumed_actions: action_index,
                steps: step,
            });
        }

        let event_index = observed_events.len() - 1;
        let TestAction::Choose { target } = case
            .actions
            .get(action_index)
            .ok_or(GbToolError::MissingAction { event_index })?;
        if !offered.iter().any(|label| label == target) {
            return Err(GbToolError::ChoiceNotOffered {
                event_index,
                target: target.clone(),
                offered,
            });
        }
        action_index += 1;
        statements = resolve_reference(&source, target, options)?;
    }

    Err(GbToolError::GuardExceeded {
        max_steps: MAX_STEPS,
    })
}

fn observe(statement: &Statement) -> ExpectedEvent {
    match statement {
        Statement::Text { text } => ExpectedEvent::Text { text: text.clone() },
        Statement::Pause { duration } => ExpectedEvent::Pause {
            duration: duration.clone(),
        },
        Statement::Choice { prompt, branches } => ExpectedEvent::Choices {
            prompt: prompt.clone(),
            choices: branches
                .iter()
                .map(|branch| ChoiceEntry {
                    target: branch.target_label.clone(),
                    text: branch.button_text.clone(),
                })
                .collect(),
        },
    }
}

pub fn assert_case(example_dir: &Path, case_path: &Path) -> Result<(), GbToolError> {
    let case = read_test_case(case_path)?;
    let report = run_case(example_dir, &case)?;

    if report.observed_events.len() != case.expected_events.len() {
        let observed = serde_json::to_string_pretty(&report.observed_events)
            .map_err(GbToolError::EventSerialize)?;
        return Err(GbToolError::EventCountMismatch {
            expected: case.expected_events.len(),
            actual: report.observed_events.len(),
            observed,
        });
    }

    for (index, (expected, actual)) in case
        .expected_events
        .iter()
        .zip(report.observed_events.iter())
        .enumerate()
    {
        if expected != actual {
            let expected = serde_json::to_string(expected).map_err(GbToolError::EventSerialize)?;
            let actual = serde_json::to_string(actual).map_err(GbToolError::EventSerialize)?;
            return Err(GbToolError::EventMismatch {
                index,
                expected,
                actual,
            });
        }
    }

    Ok(())
}
