use anyhow::Result;

use crate::{APP_VUE, CliTest, stderr, stdout};

#[test]
fn test_rewrite_requires_snapshot() -> Result<()> {
    let test = CliTest::with_file("src/App.vue", APP_VUE)?;

    let output = test.run(&["rewrite"])?;
    assert_eq!(output.status.code(), Some(2));
    let err = stderr(&output);
    assert!(err.contains("extraction snapshot"));
    assert!(err.contains("`extract`"));
    assert_eq!(test.read_file("src/App.vue")?, APP_VUE);

    Ok(())
}

#[test]
fn test_extract_rewrite_then_nothing_left() -> Result<()> {
    let test = CliTest::with_file("src/App.vue", APP_VUE)?;

    let output = test.run(&["extract"])?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let output = test.run(&["rewrite"])?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Replaced 2 occurrences in 1 file"));

    let rewritten = test.read_file("src/App.vue")?;
    assert!(rewritten.contains("<span>{{ $t('Common.textdzq5') }}</span>"));
    assert!(rewritten.contains("this.msg = this.$t('Common.texteml0');"));

    let module = test.read_file("output/lang/zh-cn/common.js")?;
    assert!(module.contains("textdzq5"));
    assert!(module.contains("texteml0"));

    // The original is kept in a timestamped backup.
    let backups = test.list_dir("backup")?;
    assert_eq!(backups.len(), 1);
    assert!(backups[0].starts_with("backup-"));
    assert_eq!(
        test.read_file(&format!("backup/{}/src/App.vue", backups[0]))?,
        APP_VUE
    );

    let output = test.run(&["extract"])?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Extracted 0 occurrences"));

    Ok(())
}

#[test]
fn test_replace_alias_preview_writes_nothing() -> Result<()> {
    let test = CliTest::with_file("src/App.vue", APP_VUE)?;
    test.run(&["extract"])?;

    let output = test.run(&["replace", "--preview"])?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let out = stdout(&output);
    assert!(out.contains("- 你好"));
    assert!(out.contains("+ {{ $t('Common.textdzq5') }}"));
    assert!(out.contains("Would replace 2 occurrences in 1 file"));

    assert_eq!(test.read_file("src/App.vue")?, APP_VUE);
    assert!(!test.root().join("backup").exists());

    Ok(())
}

#[test]
fn test_rewrite_module_inserts_import() -> Result<()> {
    let test = CliTest::with_file("src/api/user.js", "export const title = '用户列表';\n")?;
    test.run(&["extract"])?;

    let output = test.run(&["rewrite"])?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let rewritten = test.read_file("src/api/user.js")?;
    assert!(rewritten.starts_with("import i18n from '@/lang';\n"));
    assert!(rewritten.contains("export const title = i18n.t('Common.text"));

    Ok(())
}

#[test]
fn test_rewrite_reports_drifted_text() -> Result<()> {
    let test = CliTest::with_file("src/a.js", "const a = '你好';\nconst b = '再见';\n")?;
    test.run(&["extract"])?;
    test.write_file("src/a.js", "const a = '您好';\nconst b = '再见';\n")?;

    let output = test.run(&["rewrite"])?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("1 substitution need manual work"));

    let rewritten = test.read_file("src/a.js")?;
    assert!(rewritten.contains("const a = '您好';"));
    assert!(rewritten.contains("const b = i18n.t('Common.texteml0');"));

    let pending: Vec<String> = test
        .list_dir("output")?
        .into_iter()
        .filter(|name| name.starts_with("pending-tasks-") && name.ends_with(".md"))
        .collect();
    assert_eq!(pending.len(), 1);
    let report = test.read_file(&format!("output/{}", pending[0]))?;
    assert!(report.contains("- [ ] line 1"));
    assert!(report.contains("text not found"));

    Ok(())
}
