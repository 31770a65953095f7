use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::{GbToolError, TestCase, TESTCASE_SCHEMA_V1};

pub const TESTCASE_FILE_NAME: &str = "testcase.json";

pub fn discover_cases(root: &Path) -> Vec<PathBuf> {
    let mut dirs: Vec<PathBuf> = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file() && entry.file_name() == TESTCASE_FILE_NAME)
        .filter_map(|entry| entry.path().parent().map(Path::to_path_buf))
        .collect();
    dirs.sort();
    dirs
}

pub fn read_test_case(case_path: &Path) -> Result<TestCase, GbToolError> {
    let raw = fs::read_to_string(case_path).map_err(|source| GbToolError::ReadFile {
        path: case_path.to_path_buf(),
        source,
    })?;
    let parsed: TestCase = serde_json::from_str(&raw).map_err(|source| GbToolError::ParseCase {
        path: case_path.to_path_buf(),
        source,
    })?;

    if parsed.schema_version != TESTCASE_SCHEMA_V1 {
        return Err(GbToolError::InvalidSchemaVersion {
            expected: TESTCASE_SCHEMA_V1.to_string(),
            found: parsed.schema_version,
        });
    }

    Ok(parsed)
}

#[cfg(test)]
mod source_tests {
    use super::*;

    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_dir(name: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time should move forward")
            .as_nanos();
        std::env::temp_dir().join(format!("gb-tool-{}-{}", name, nanos))
    }

    fn write_file(path: &Path, content: &str) {
        let parent = path.parent().expect("path should have parent");
        fs::create_dir_all(parent).expect("parent dir should be created");
        fs::write(path, content).expect("file should be written");
    }

    #[test]
    fn discover_cases_finds_nested_testcases_in_order() {
        let root = temp_dir("discover");
        write_file(&root.join("b-second/testcase.json"), "{}");
        write_file(&root.join("a-first/testcase.json"), "{}");
        write_file(&root.join("a-first/nested/testcase.json"), "{}");
        write_file(&root.join("c-none/story.lgscript"), "*start\n@end\n");

        let found = discover_cases(&root);
        assert_eq!(
            found,
            vec![
                root.join("a-first"),
                root.join("a-first/nested"),
                root.join("b-second"),
            ]
        );
    }

    #[test]
    fn discover_cases_on_missing_root_is_empty() {
        assert!(discover_cases(&temp_dir("discover-missing")).is_empty());
    }

    #[test]
    fn read_test_case_parses_valid_json() {
        let root = temp_dir("case-ok");
        let case_path = root.join(TESTCASE_FILE_NAME);
        write_file(
            &case_path,
            r#"{
  "schemaVersion":"gb-tool-case.v1",
  "startLabel":"*intro",
  "strict":true,
  "expectedEvents":[{"kind":"end"}]
}"#,
        );

        let parsed = read_test_case(&case_path).expect("case should parse");
        assert_eq!(parsed.start_label, "*intro");
        assert!(parsed.strict);
        assert_eq!(parsed.expected_events.len(), 1);
    }

    #[test]
    fn read_test_case_reports_read_error() {
        let root = temp_dir("case-read-error");
        fs::create_dir_all(&root).expect("root should be created");
        let error = read_test_case(&root.join("missing.json")).expect_err("missing case should fail");
        assert!(matches!(error, GbToolError::ReadFile { .. }));
    }

    #[test]
    fn read_test_case_reports_parse_and_schema_errors() {
        let root = temp_dir("case-errors");

        let bad_json_path = root.join("bad.json");
        write_file(&bad_json_path, "{");
        let parse_error = read_test_case(&bad_json_path).expect_err("parse should fail");
        assert!(matches!(parse_error, GbToolError::ParseCase { .. }));

        let bad_schema_path = root.join("bad-schema.json");
        write_file(&bad_schema_path, r#"{"schemaVersion":"v0"}"#);
        let schema_error = read_test_case(&bad_schema_path).expect_err("schema should fail");
        assert!(matches!(
            schema_error,
            GbToolError::InvalidSchemaVersion { .. }
        ));
    }
}
