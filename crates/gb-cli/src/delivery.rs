use std::sync::OnceLock;
use std::time::Duration;

use gb_core::{Branch, GamebookError, Statement};
use regex::Regex;

use crate::{OutboundMessage, PostbackAction, ScheduledMessage};

const NANOS_PER_MICRO: f64 = 1e3;
const NANOS_PER_MILLI: f64 = 1e6;
const NANOS_PER_SECOND: f64 = 1e9;

// Nothing is sent until the whole plan builds.
pub fn plan_delivery(statements: &[Statement]) -> Result<Vec<ScheduledMessage>, GamebookError> {
    let mut offset = Duration::ZERO;
    let mut plan = Vec::new();

    for statement in statements {
        let message = match statement {
            Statement::Pause { duration } => {
                offset += parse_duration(duration)?;
                continue;
            }
            Statement::Text { text } => OutboundMessage::Text { text: text.clone() },
            Statement::Choice { prompt, branches } => OutboundMessage::Buttons {
                alt_text: prompt.clone(),
                prompt: prompt.clone(),
                actions: postback_actions(branches),
            },
        };

        let delay = typing_delay(statement.display_text().chars().count()) + offset;
        offset = delay;
        plan.push(ScheduledMessage { delay, message });
    }

    Ok(plan)
}

pub fn typing_delay(char_count: usize) -> Duration {
    let millis = match char_count {
        0..=4 => 2_000,
        5..=9 => 2_500,
        10..=14 => 3_000,
        _ => 4_000,
    };
    Duration::from_millis(millis)
}

fn postback_actions(branches: &[Branch]) -> Vec<PostbackAction> {
    branches
        .iter()
        .take_while(|branch| !branch.button_text.is_empty())
        .map(|branch| PostbackAction {
            label: branch.button_text.clone(),
            data: branch.target_label.clone(),
            display_text: branch.button_text.clone(),
        })
        .collect()
}

pub fn parse_duration(literal: &str) -> Result<Duration, GamebookError> {
    let trimmed = literal.trim();
    let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);
    if unsigned == "0" {
        return Ok(Duration::ZERO);
    }
    if !duration_shape().is_match(unsigned) {
        return Err(invalid_duration(literal, "expected <number><unit> pairs"));
    }

    let mut total_nanos = 0f64;
    for caps in duration_part().captures_iter(unsigned) {
        let value: f64 = caps[1]
            .parse()
            .map_err(|_| invalid_duration(literal, "bad number"))?;
        let scale = match &caps[2] {
            "ns" => 1.0,
            "us" | "µs" | "μs" => NANOS_PER_MICRO,
            "ms" => NANOS_PER_MILLI,
            "s" => NANOS_PER_SECOND,
            "m" => 60.0 * NANOS_PER_SECOND,
            _ => 3_600.0 * NANOS_PER_SECOND,
        };
        total_nanos += value * scale;
    }

    if !total_nanos.is_finite() || total_nanos > u64::MAX as f64 {
        return Err(invalid_duration(literal, "out of range"));
    }
    Ok(Duration::from_nanos(total_nanos.round() as u64))
}

fn duration_shape() -> &'static Regex {
    static SHAPE: OnceLock<Regex> = OnceLock::new();
    SHAPE.get_or_init(|| {
        Regex::new(r"^(?:(?:\d+(?:\.\d*)?|\.\d+)(?:ns|us|µs|μs|ms|s|m|h))+$")
            .expect("duration shape regex must compile")
    })
}

fn duration_part() -> &'static Regex {
    static PART: OnceLock<Regex> = OnceLock::new();
    PART.get_or_init(|| {
        Regex::new(r"(\d+(?:\.\d*)?|\.\d+)(ns|us|µs|μs|ms|s|m|h)")
            .expect("duration part regex must compile")
    })
}

fn invalid_duration(literal: &str, reason: &str) -> GamebookError {
    GamebookError::new(
        "DELIVERY_INVALID_DURATION",
        format!("Invalid @wait duration \"{}\": {}.", literal, reason),
    )
}
