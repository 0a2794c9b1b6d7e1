//! Resource modules: `export default { ... };` files holding one module of a
//! locale. Written from a JSON value and read back through the script
//! parser as a data literal.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde_json::{Map, Value};
use swc_ecma_ast::{Expr, Lit, ModuleDecl, ModuleItem, ObjectLit, Prop, PropName, PropOrSpread};

use crate::core::parsers::{ScriptDialect, parse_script};
use crate::utils::is_identifier;

/// Render `content` as an ES module with a default-exported object literal.
pub fn render_module(content: &Value) -> String {
    let mut out = String::from("export default ");
    write_value(content, 0, &mut out);
    out.push_str(";\n");
    out
}

fn write_value(value: &Value, depth: usize, out: &mut String) {
    match value {
        Value::Object(map) if map.is_empty() => out.push_str("{}"),
        Value::Object(map) => {
            out.push_str("{\n");
            let indent = "  ".repeat(depth + 1);
            let last = map.len() - 1;
            for (i, (key, child)) in map.iter().enumerate() {
                out.push_str(&indent);
                if is_identifier(key) {
                    out.push_str(key);
                } else {
                    out.push_str(&json_string(key));
                }
                out.push_str(": ");
                write_value(child, depth + 1, out);
                if i != last {
                    out.push(',');
                }
                out.push('\n');
            }
            out.push_str(&"  ".repeat(depth));
            out.push('}');
        }
        Value::String(text) => out.push_str(&json_string(text)),
        other => out.push_str(&other.to_string()),
    }
}

fn json_string(text: &str) -> String {
    Value::String(text.to_string()).to_string()
}

/// Parse a resource module back into its data.
pub fn parse_module(source: &str, file_path: &str) -> Result<Map<String, Value>> {
    let parsed = parse_script(source, file_path, ScriptDialect::JavaScript)?;

    let export = parsed.module.body.iter().find_map(|item| match item {
        ModuleItem::ModuleDecl(ModuleDecl::ExportDefaultExpr(export)) => Some(&export.expr),
        _ => None,
    });
    let Some(expr) = export else {
        bail!("{} has no default export", file_path);
    };

    match unwrap_parens(expr) {
        Expr::Object(object) => object_to_map(object, file_path),
        _ => bail!("default export of {} is not an object literal", file_path),
    }
}

/// Read a module file, returning `None` when it does not exist.
pub fn read_module_file(path: &Path) -> Result<Option<Map<String, Value>>> {
    if !path.exists() {
        return Ok(None);
    }
    let source = fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    parse_module(&source, &path.to_string_lossy()).map(Some)
}

fn unwrap_parens(expr: &Expr) -> &Expr {
    match expr {
        Expr::Paren(paren) => unwrap_parens(&paren.expr),
        other => other,
    }
}

fn object_to_map(object: &ObjectLit, file_path: &str) -> Result<Map<String, Value>> {
    let mut map = Map::new();
    for prop in &object.props {
        let PropOrSpread::Prop(prop) = prop else {
            bail!("spread element in {}", file_path);
        };
        let Prop::KeyValue(kv) = &**prop else {
            bail!("unsupported property in {}", file_path);
        };
        let key = match &kv.key {
            PropName::Ident(ident) => ident.sym.to_string(),
            PropName::Str(s) => s.value.as_str().map(str::to_string).with_context(|| {
                format!("invalid string key in {}", file_path)
            })?,
            PropName::Num(n) => n.value.to_string(),
            _ => bail!("computed key in {}", file_path),
        };
        map.insert(key, expr_to_value(unwrap_parens(&kv.value), file_path)?);
    }
    Ok(map)
}

fn expr_to_value(expr: &Expr, file_path: &str) -> Result<Value> {
    match expr {
        Expr::Object(object) => object_to_map(object, file_path).map(Value::Object),
        Expr::Lit(Lit::Str(s)) => s
            .value
            .as_str()
            .map(|text| Value::String(text.to_string()))
            .with_context(|| format!("invalid string value in {}", file_path)),
        Expr::Tpl(tpl) if tpl.exprs.is_empty() => {
            let text = tpl
                .quasis
                .iter()
                .filter_map(|q| q.cooked.as_ref().and_then(|c| c.as_str()))
                .collect::<String>();
            Ok(Value::String(text))
        }
        Expr::Lit(Lit::Num(n)) => Ok(Value::from(n.value)),
        Expr::Lit(Lit::Bool(b)) => Ok(Value::Bool(b.value)),
        _ => bail!("unsupported value in {}", file_path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_render_module() {
        let content = json!({
            "submit": "提交",
            "form": { "title": "用户 \"管理\"" },
            "with-dash": "第一行\n第二行"
        });

        assert_eq!(
            render_module(&content),
            r#"export default {
  submit: "提交",
  form: {
    title: "用户 \"管理\""
  },
  "with-dash": "第一行\n第二行"
};
"#
        );
    }

    #[test]
    fn test_render_empty_module() {
        assert_eq!(render_module(&json!({})), "export default {};\n");
    }

    #[test]
    fn test_parse_rendered_module() {
        let content = json!({
            "textdzq5": "你好",
            "form": { "name": "用户{name}登录" },
            "with-dash": "a\nb"
        });
        let parsed = parse_module(&render_module(&content), "common.js").unwrap();
        assert_eq!(Value::Object(parsed), content);
    }

    #[test]
    fn test_parse_hand_written_module() {
        let source = "// edited\nexport default ({\n  'save': '保存',\n  tip: `提示`,\n});\n";
        let parsed = parse_module(source, "common.js").unwrap();
        assert_eq!(Value::Object(parsed), json!({ "save": "保存", "tip": "提示" }));
    }

    #[test]
    fn test_parse_rejects_code() {
        assert!(parse_module("export default { a: foo() };", "x.js").is_err());
        assert!(parse_module("export const a = {};", "x.js").is_err());
        assert!(parse_module("export default [];", "x.js").is_err());
    }
}
