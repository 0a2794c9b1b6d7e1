use anyhow::Result;

use crate::{APP_VUE, CliTest, stderr, stdout};

#[test]
fn test_translate_requires_extract() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.run(&["translate", "en-us"])?;
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("`extract`"));

    Ok(())
}

#[test]
fn test_translate_uses_template_and_reports_gaps() -> Result<()> {
    let test = CliTest::with_file("src/App.vue", APP_VUE)?;
    test.run(&["extract"])?;

    let template = test.read_file("output/translation-template.txt")?;
    test.write_file(
        "output/translation-template.txt",
        &template.replace("你好 =\n", "你好 = Hello\n"),
    )?;

    let output = test.run(&["translate", "EN-US"])?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let out = stdout(&output);
    assert!(out.contains("Generated locale en-us"));
    assert!(out.contains("Untranslated 1 phrase (1 empty, 0 missing)"));

    let module = test.read_file("output/lang/en-us/common.js")?;
    assert!(module.contains(r#"textdzq5: "Hello""#));
    assert!(module.contains(r#"texteml0: """#));

    let report = test.read_file("output/missing-translations-en-us.md")?;
    assert!(report.contains("Common.texteml0"));
    assert!(!report.contains("Common.textdzq5"));

    Ok(())
}

#[test]
fn test_translate_rejects_default_locale() -> Result<()> {
    let test = CliTest::with_file("src/App.vue", APP_VUE)?;
    test.run(&["extract"])?;

    let output = test.run(&["translate", "zh-CN"])?;
    assert_eq!(output.status.code(), Some(2));
    assert!(test.read_file("output/lang/zh-cn/common.js")?.contains("你好"));

    Ok(())
}

#[test]
fn test_reextract_keeps_filled_translations() -> Result<()> {
    let test = CliTest::with_file("src/a.js", "const a = '你好';\n")?;
    test.run(&["extract"])?;
    test.write_file("output/translation-template.txt", "你好 = Hello\n")?;

    test.write_file("src/a.js", "const b = '再见';\n")?;
    let output = test.run(&["extract"])?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let template = test.read_file("output/translation-template.txt")?;
    assert!(template.contains("你好 = Hello"));
    assert!(template.contains("再见 ="));

    Ok(())
}
