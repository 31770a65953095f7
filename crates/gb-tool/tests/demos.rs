use gb_test_example::{demo_dir, demos_root, testcase_path};
use gb_tool::{assert_case, discover_cases, TESTCASE_FILE_NAME};

#[test]
fn every_demo_testcase_passes() {
    let cases = discover_cases(&demos_root());
    assert!(!cases.is_empty(), "demos should contain testcases");

    for dir in cases {
        let case_path = dir.join(TESTCASE_FILE_NAME);
        if let Err(error) = assert_case(&dir, &case_path) {
            panic!("demo {} failed: {}", dir.display(), error);
        }
    }
}

#[test]
fn continuation_demo_runs_in_strict_mode() {
    let case = gb_tool::read_test_case(&testcase_path("03-continuation")).expect("case should load");
    assert!(case.strict);
    assert_case(&demo_dir("03-continuation"), &testcase_path("03-continuation"))
        .expect("strict demo should pass");
}
