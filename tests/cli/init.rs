use anyhow::{Context, Result};
use serde_json::Value;

use crate::{CliTest, stderr, stdout};

#[test]
fn test_init_creates_config() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.run(&["init"])?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Created"));

    let content = test.read_file(".i18nrc.json")?;
    let parsed: Value = serde_json::from_str(&content).context("Config should be valid JSON")?;
    assert_eq!(parsed["defaultLocale"], "zh-cn");
    assert_eq!(parsed["outputDir"], "./output");
    assert_eq!(parsed["keyMappings"]["提交"], "Common.submit");
    assert_eq!(parsed["calls"]["template"], "$t");
    assert!(content.contains("\n  \""), "Config should use 2-space indentation");

    Ok(())
}

#[test]
fn test_init_refuses_existing_config() -> Result<()> {
    let test = CliTest::with_file(".i18nrc.json", "{}")?;

    let output = test.run(&["init"])?;
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("already exists"));
    assert_eq!(test.read_file(".i18nrc.json")?, "{}");

    Ok(())
}

#[test]
fn test_init_config_is_immediately_usable() -> Result<()> {
    let test = CliTest::new()?;
    test.run(&["init"])?;
    test.write_file("src/main.js", "const title = '标题';\n")?;

    let output = test.run(&["extract"])?;
    assert!(
        output.status.success(),
        "extract should work with the initialized config. stderr: {}",
        stderr(&output)
    );

    Ok(())
}

#[test]
fn test_invalid_config_is_fatal() -> Result<()> {
    let test = CliTest::with_file(".i18nrc.json", r#"{ "targetScript": "Klingon" }"#)?;

    let output = test.run(&["extract"])?;
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("targetScript"));

    Ok(())
}

#[test]
fn test_help_without_command() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.run(&[])?;
    assert!(output.status.success());
    assert!(stdout(&output).contains("extract"));

    Ok(())
}
