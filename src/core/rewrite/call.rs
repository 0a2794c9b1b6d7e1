use crate::config::CallSpellings;
use crate::core::extract::{CapturedExpression, RegionKind, Site};
use crate::utils::escape_single_quoted;

/// `callee('key')`, or `callee('key', { label: expression, ... })` when
/// there are bindings.
pub fn render_call(callee: &str, key: &str, bindings: &[CapturedExpression]) -> String {
    let key = escape_single_quoted(key);
    if bindings.is_empty() {
        return format!("{}('{}')", callee, key);
    }
    let params = bindings
        .iter()
        .map(|b| format!("{}: {}", b.label, b.expression.trim()))
        .collect::<Vec<_>>()
        .join(", ");
    format!("{}('{}', {{ {} }})", callee, key, params)
}

/// Source text replacing an occurrence at `site` in `region`.
pub fn replacement(
    region: RegionKind,
    site: &Site,
    key: &str,
    bindings: &[CapturedExpression],
    calls: &CallSpellings,
) -> String {
    match region {
        RegionKind::Template => {
            let call = render_call(&calls.template, key, bindings);
            match site {
                Site::TernaryBranch => call,
                Site::Attribute { name } => format!(":{}=\"{}\"", name, call),
                _ => format!("{{{{ {} }}}}", call),
            }
        }
        RegionKind::Script => render_call(&calls.component, key, bindings),
        RegionKind::File => render_call(&calls.module, key, bindings),
    }
}
