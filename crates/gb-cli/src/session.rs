use gb_api::{load_script_file, resolve_reference, resolve_with_options};
use gb_core::{GamebookError, Statement};
use tracing::info;

use crate::{
    load_user_state, plan_delivery, save_user_state, DispatchOutcome, InboundEvent,
    MessagingClient, OutboundMessage, PlayerConfig, UserState,
};

pub fn dispatch_event(
    config: &PlayerConfig,
    client: &mut dyn MessagingClient,
    user_id: &str,
    event: &InboundEvent,
) -> Result<DispatchOutcome, GamebookError> {
    match event {
        InboundEvent::Follow => start_story(config, client, user_id),
        InboundEvent::Message { text } => {
            if text.as_str() != config.start_keyword {
                info!(user_id, "message is not the start keyword");
                return Ok(DispatchOutcome::Ignored {
                    reason: "message is not the start keyword".to_string(),
                });
            }
            start_story(config, client, user_id)
        }
        InboundEvent::Postback { data } => choose_branch(config, client, user_id, data),
    }
}

fn start_story(
    config: &PlayerConfig,
    client: &mut dyn MessagingClient,
    user_id: &str,
) -> Result<DispatchOutcome, GamebookError> {
    let source = load_script_file(&config.script_path)?;
    let statements =
        resolve_with_options(&source, &config.start_label, config.parse_options)?;
    let state = load_user_state(&config.state_dir, user_id)?;
    deliver(config, client, state, &statements)
}

fn choose_branch(
    config: &PlayerConfig,
    client: &mut dyn MessagingClient,
    user_id: &str,
    data: &str,
) -> Result<DispatchOutcome, GamebookError> {
    let mut state = load_user_state(&config.state_dir, user_id)?;
    if !state.tappable.iter().any(|label| label == data) {
        info!(user_id, data, "postback is not a tappable choice");
        return Ok(DispatchOutcome::Ignored {
            reason: "postback is not a tappable choice".to_string(),
        });
    }

    let source = load_script_file(&config.script_path)?;
    let statements = resolve_reference(&source, data, config.parse_options)?;
    state.tappable.clear();
    deliver(config, client, state, &statements)
}

fn deliver(
    config: &PlayerConfig,
    client: &mut dyn MessagingClient,
    mut state: UserState,
    statements: &[Statement],
) -> Result<DispatchOutcome, GamebookError> {
    let plan = plan_delivery(statements)?;

    for scheduled in &plan {
        client.push(&state.user_id, scheduled)?;
        if let OutboundMessage::Buttons { actions, .. } = &scheduled.message {
            state.tappable = actions.iter().map(|action| action.data.clone()).collect();
        }
    }
    save_user_state(&config.state_dir, &state)?;

    Ok(DispatchOutcome::Delivered {
        messages: plan.len(),
        tappable: state.tappable,
    })
}
