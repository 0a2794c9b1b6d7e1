use anyhow::Result;
use serde_json::Value;

use crate::{APP_VUE, CliTest, stderr, stdout};

#[test]
fn test_extract_writes_locale_template_and_snapshot() -> Result<()> {
    let test = CliTest::with_file("src/App.vue", APP_VUE)?;

    let output = test.run(&["extract"])?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Extracted 2 occurrences (2 plain, 0 interpolated)"));

    let module = test.read_file("output/lang/zh-cn/common.js")?;
    assert!(module.starts_with("export default {\n"));
    assert!(module.contains(r#"textdzq5: "你好""#));
    assert!(module.contains(r#"texteml0: "再见""#));

    let bootstrap = test.read_file("output/lang/index.js")?;
    assert!(bootstrap.contains("vue-i18n"));
    assert!(bootstrap.contains("zh-cn"));

    let template = test.read_file("output/translation-template.txt")?;
    assert!(template.contains("你好 ="));
    assert!(template.contains("再见 ="));

    let snapshots: Vec<String> = test
        .list_dir("output")?
        .into_iter()
        .filter(|name| name.starts_with("i18n-extracted-"))
        .collect();
    assert_eq!(snapshots.len(), 1);
    let snapshot: Value =
        serde_json::from_str(&test.read_file(&format!("output/{}", snapshots[0]))?)?;
    assert_eq!(snapshot["metadata"]["total"], 2);
    assert_eq!(snapshot["metadata"]["plainCount"], 2);

    Ok(())
}

#[test]
fn test_extract_uses_key_mappings_and_prefixes() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(
        ".i18nrc.json",
        r#"{
  "keyPrefixes": [{ "pattern": "views/user", "prefix": "User" }],
  "keyStrategy": "semantic"
}"#,
    )?;
    test.write_file(
        "src/views/user/Edit.vue",
        "<template>\n  <button>提交</button>\n  <button>删除</button>\n  <p>用户</p>\n</template>\n",
    )?;

    let output = test.run(&["extract"])?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let common = test.read_file("output/lang/zh-cn/common.js")?;
    assert!(common.contains(r#"submit: "提交""#));
    assert!(common.contains(r#"delete: "删除""#));

    let user = test.read_file("output/lang/zh-cn/user.js")?;
    assert!(user.contains(r#"user: "用户""#));

    Ok(())
}

#[test]
fn test_extract_keeps_existing_keys() -> Result<()> {
    let test = CliTest::with_file("src/a.js", "const a = '你好';\n")?;
    test.run(&["extract"])?;

    test.write_file("src/b.js", "const b = '你好';\nconst c = '再见';\n")?;
    let output = test.run(&["extract"])?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let module = test.read_file("output/lang/zh-cn/common.js")?;
    assert_eq!(module.matches("你好").count(), 1);
    assert!(module.contains(r#"textdzq5: "你好""#));
    assert!(module.contains(r#"texteml0: "再见""#));

    Ok(())
}

#[test]
fn test_extract_reports_parse_errors_and_continues() -> Result<()> {
    let test = CliTest::with_file("src/broken.js", "const = '坏了';\n")?;
    test.write_file("src/ok.js", "const ok = '好的';\n")?;

    let output = test.run(&["extract"])?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stderr(&output).contains("1 file(s) could not be parsed"));
    assert!(test.read_file("output/lang/zh-cn/common.js")?.contains("好的"));

    Ok(())
}

#[test]
fn test_extract_skips_console_and_comments() -> Result<()> {
    let test = CliTest::with_file(
        "src/log.js",
        "// 注释\nconsole.log('调试');\nconst title = '标题';\n",
    )?;

    let output = test.run(&["extract"])?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Extracted 1 occurrence "));

    let module = test.read_file("output/lang/zh-cn/common.js")?;
    assert!(module.contains("标题"));
    assert!(!module.contains("调试"));
    assert!(!module.contains("注释"));

    Ok(())
}

#[test]
fn test_extract_generates_secondary_locale() -> Result<()> {
    let test = CliTest::with_file("src/a.js", "const a = '你好';\n")?;
    test.write_file(".i18nrc.json", r#"{ "generateSecondaryLocale": true }"#)?;

    let output = test.run(&["extract"])?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Generated locale en-us"));
    assert!(test.root().join("output/lang/en-us/common.js").exists());
    assert!(test.root().join("output/missing-translations-en-us.md").exists());

    Ok(())
}
