use std::path::Path;

use regex::Regex;

/// Whether `content` already binds `binding` through an import or a declaration.
pub fn has_module_binding(content: &str, binding: &str) -> bool {
    let binding = regex::escape(binding);
    let pattern = format!(
        r"(?m)import\s+(?:\*\s+as\s+)?{b}\b|\b(?:const|let|var)\s+{b}\s*=",
        b = binding
    );
    Regex::new(&pattern).is_ok_and(|re| re.is_match(content))
}

/// Path used in the inserted import: `import_path` when configured, else the
/// translation module relative to the importing file, without extension.
pub fn import_specifier(import_path: Option<&str>, translation_module: &Path, file: &Path) -> String {
    if let Some(path) = import_path {
        return path.to_string();
    }

    let target = translation_module.with_extension("");
    let from = file.parent().unwrap_or_else(|| Path::new(""));
    let relative = pathdiff::diff_paths(&target, from).unwrap_or(target);
    let relative = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");

    if relative.starts_with("../") || relative.starts_with("./") {
        relative
    } else {
        format!("./{}", relative)
    }
}

/// Insert `import <binding> from '<specifier>';` at the top, after any shebang.
pub fn insert_import(content: &str, binding: &str, specifier: &str) -> String {
    let statement = format!("import {} from '{}';\n", binding, specifier);

    if content.starts_with("#!") {
        let split = content.find('\n').map(|i| i + 1).unwrap_or(content.len());
        let (shebang, rest) = content.split_at(split);
        let newline = if shebang.ends_with('\n') { "" } else { "\n" };
        return format!("{}{}{}{}", shebang, newline, statement, rest);
    }
    format!("{}{}", statement, content)
}
