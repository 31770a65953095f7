use std::fs;
use std::path::{Path, PathBuf};

use gb_core::GamebookError;

use crate::{
    map_cli_encode, map_cli_state_invalid, map_cli_state_read, map_cli_state_write, UserState,
    USER_STATE_SCHEMA,
};

pub(crate) fn user_state_path(state_dir: &Path, user_id: &str) -> Result<PathBuf, GamebookError> {
    let valid = !user_id.is_empty()
        && user_id
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_');
    if !valid {
        return Err(GamebookError::new(
            "CLI_USER_INVALID",
            format!("User id must be non-empty [A-Za-z0-9_-]: {:?}", user_id),
        ));
    }
    Ok(state_dir.join(format!("{}.json", user_id)))
}

pub(crate) fn save_user_state(state_dir: &Path, state: &UserState) -> Result<(), GamebookError> {
    let path = user_state_path(state_dir, &state.user_id)?;
    fs::create_dir_all(state_dir).map_err(map_cli_state_write)?;

    let payload = serde_json::to_string(state).map_err(map_cli_encode)?;
    fs::write(path, payload).map_err(map_cli_state_write)
}

pub(crate) fn load_user_state(state_dir: &Path, user_id: &str) -> Result<UserState, GamebookError> {
    let path = user_state_path(state_dir, user_id)?;
    if !path.exists() {
        return Ok(UserState::empty(user_id));
    }

    let raw = fs::read_to_string(&path).map_err(map_cli_state_read)?;

    let state: UserState = serde_json::from_str(&raw).map_err(map_cli_state_invalid)?;

    if state.schema_version != USER_STATE_SCHEMA {
        return Err(GamebookError::new(
            "CLI_STATE_SCHEMA",
            format!("Unsupported user state schema: {}", state.schema_version),
        ));
    }

    Ok(state)
}

#[cfg(test)]
mod state_store_tests {
    use super::*;
    use crate::cli_test_support::*;

    #[test]
    fn missing_state_loads_as_empty() {
        let dir = temp_path("state-missing");
        let state = load_user_state(&dir, "U1").expect("missing state is empty");
        assert_eq!(state, UserState::empty("U1"));
    }

    #[test]
    fn save_and_load_roundtrip_keeps_tappable_order() {
        let dir = temp_path("state-roundtrip");
        let mut state = UserState::empty("U2");
        state.tappable = vec!["*b".to_string(), "*a".to_string()];
        save_user_state(&dir, &state).expect("save should pass");
        let loaded = load_user_state(&dir, "U2").expect("load should pass");
        assert_eq!(loaded, state);
    }

    #[test]
    fn load_rejects_bad_schema_and_invalid_json() {
        let dir = temp_path("state-bad");
        write_file(
            &dir.join("U3.json"),
            r#"{"schemaVersion":"user-state.v0","userId":"U3","tappable":[]}"#,
        );
        let error = load_user_state(&dir, "U3").expect_err("bad schema should fail");
        assert_eq!(error.code, "CLI_STATE_SCHEMA");

        write_file(&dir.join("U4.json"), "{");
        let error = load_user_state(&dir, "U4").expect_err("invalid json should fail");
        assert_eq!(error.code, "CLI_STATE_INVALID");
    }

    #[test]
    fn user_ids_cannot_escape_the_state_dir() {
        let dir = temp_path("state-escape");
        for user in ["", "../x", "a/b", "a.b"] {
            let error = user_state_path(&dir, user).expect_err(user);
            assert_eq!(error.code, "CLI_USER_INVALID");
        }
        assert!(user_state_path(&dir, "Uabc-1_2").is_ok());
    }

    #[test]
    fn save_reports_write_failures() {
        let blocker = temp_path("state-blocker");
        write_file(&blocker, "not a directory");
        let error =
            save_user_state(&blocker, &UserState::empty("U5")).expect_err("write should fail");
        assert_eq!(error.code, "CLI_STATE_WRITE");
    }
}
