use anyhow::Result;

use crate::{CliTest, stderr, stdout};

#[test]
fn test_validate_reports_untranslated_text() -> Result<()> {
    let test = CliTest::with_file(
        "src/App.vue",
        "<template>\n  <div>\n    <span>{{ $t('Common.textdzq5') }}</span>\n    <p>{{ '未翻译' }}</p>\n    <p>正文</p>\n  </div>\n</template>\n",
    )?;

    let output = test.run(&["validate"])?;
    // Findings are reported, not fatal.
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let out = stdout(&output);
    assert!(out.contains("--> src/App.vue:4:12"));
    assert!(out.contains("1 untranslated text in 1 file"));

    let report = test.read_file("output/validation-report.md")?;
    assert!(report.contains("## src/App.vue"));
    assert!(report.contains("未翻译"));
    // Bare template text is not flagged.
    assert!(!report.contains("正文"));

    Ok(())
}

#[test]
fn test_validate_ignores_comments_and_translation_calls() -> Result<()> {
    let test = CliTest::with_file(
        "src/a.js",
        "/*\n * 多行注释\n */\n// 单行注释\nconst a = i18n.t('Common.textdzq5');\n",
    )?;

    let output = test.run(&["validate"])?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("no untranslated text found"));

    Ok(())
}

#[test]
fn test_validate_after_rewrite_is_clean() -> Result<()> {
    let test = CliTest::with_file("src/App.vue", crate::APP_VUE)?;
    test.run(&["extract"])?;
    test.run(&["rewrite"])?;

    let output = test.run(&["validate"])?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Checked 1 source file - no untranslated text found"));

    Ok(())
}
