//! End-to-end tests for command construction and execution against a
//! recording fake tool.

#![cfg(unix)]

use anyhow::Result;
use sitectl_harness::SiteCommand;
use sitectl_harness::constants::EXIT_SUCCESS;
use sitectl_harness::test_utils::TestEnvironment;

#[test]
fn builder_tokens_arrive_at_the_tool_in_order() -> Result<()> {
    let env = TestEnvironment::new()?;
    let mut harness = env.harness()?;

    SiteCommand::new("status")
        .site("@dev")
        .option("uri", "dev")
        .flag("full")
        .run(&mut harness)?;

    let invocations = env.tool().invocations()?;
    assert_eq!(invocations, ["@dev status --uri=dev --full --nocolor"]);
    Ok(())
}

#[test]
fn escaped_arguments_reach_the_tool_verbatim() -> Result<()> {
    let env = TestEnvironment::new()?;
    let mut harness = env.harness()?;

    let query = "select * from users where name = 'bob'";
    SiteCommand::new("sql-query").arg(query).run(&mut harness)?;

    let invocations = env.tool().invocations()?;
    assert_eq!(invocations.len(), 1);
    assert!(
        invocations[0].contains(query),
        "quoting should be stripped by the shell, got: {}",
        invocations[0]
    );
    Ok(())
}

#[test]
fn valued_option_with_spaces_survives_the_shell() -> Result<()> {
    let env = TestEnvironment::new()?;
    let mut harness = env.harness()?;

    SiteCommand::new("variable-set")
        .arg("site_name")
        .option("value", "My Test Site")
        .run(&mut harness)?;

    let invocations = env.tool().invocations()?;
    assert!(invocations[0].contains("--value=My Test Site"), "got: {}", invocations[0]);
    Ok(())
}

#[test]
fn run_returns_the_exit_code() -> Result<()> {
    let env = TestEnvironment::new()?;
    let mut harness = env.harness()?;

    let code = SiteCommand::new("status").run(&mut harness)?;
    assert_eq!(code, EXIT_SUCCESS);
    Ok(())
}

#[test]
fn execute_captures_output_lines_in_order() -> Result<()> {
    let env = TestEnvironment::new()?;
    let mut harness = env.harness()?;

    harness.execute("echo alpha && echo beta", EXIT_SUCCESS)?;
    assert_eq!(harness.output_lines(), ["alpha", "beta"]);
    assert_eq!(harness.output(), "alpha\nbeta");
    Ok(())
}

#[test]
fn execute_accepts_an_expected_failure() -> Result<()> {
    let env = TestEnvironment::new()?;
    let mut harness = env.harness()?;

    let code = harness.execute("exit 7", 7)?;
    assert_eq!(code, 7);
    Ok(())
}

#[test]
fn unexpected_exit_code_fails_with_the_command_line() -> Result<()> {
    let env = TestEnvironment::new()?;
    let mut harness = env.harness()?;

    let err = harness.execute("exit 2", EXIT_SUCCESS).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("exit 2"), "message should name the command: {msg}");
    assert!(msg.contains("expected 0"));
    Ok(())
}
