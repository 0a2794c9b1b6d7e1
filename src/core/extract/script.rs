//! AST collector for script blocks and plain script files.
//!
//! Only literals in expression position are candidates, so property keys,
//! TypeScript literal types, module specifiers and JSX attribute strings are
//! excluded structurally. The remaining exclusions (comments, diagnostic
//! calls, route metadata) are tracked while walking and recorded as skips.

use std::ops::Range;

use swc_common::{Span, Spanned};
use swc_ecma_ast::{
    ArrayLit, CallExpr, Callee, ExportAll, Expr, ImportDecl, KeyValueProp, Lit, NamedExport,
    Pat, PropName, Str, TaggedTpl, Tpl, TsEnumDecl, VarDeclarator,
};
use swc_ecma_visit::{Visit, VisitWith};

use super::occurrence::{
    Candidate, CapturedExpression, OccurrenceKind, RegionKind, Site, bind_expressions,
};
use super::{ExtractSettings, RegionScan};
use crate::core::parsers::ParsedScript;
use crate::issues::{SkipReason, SkipRecord};

/// Where a parsed script sits inside its file.
#[derive(Debug, Clone, Copy)]
pub struct Placement {
    pub region: RegionKind,
    /// Byte offset of the script source within the file.
    pub offset: usize,
    /// 1-based file line of the script source's first line.
    pub start_line: usize,
}

impl Placement {
    pub fn whole_file() -> Self {
        Self {
            region: RegionKind::File,
            offset: 0,
            start_line: 1,
        }
    }
}

pub fn collect_script(
    parsed: &ParsedScript,
    source: &str,
    placement: Placement,
    file: &str,
    settings: &ExtractSettings,
) -> RegionScan {
    let mut collector = ScriptCollector {
        parsed,
        source,
        placement,
        file,
        settings,
        comment_spans: parsed.comments.spans(),
        diagnostic_depth: 0,
        route_depth: 0,
        route_array_depth: 0,
        meta_depth: 0,
        scan: RegionScan::default(),
    };
    parsed.module.visit_with(&mut collector);
    collector.scan
}

struct ScriptCollector<'a> {
    parsed: &'a ParsedScript,
    source: &'a str,
    placement: Placement,
    file: &'a str,
    settings: &'a ExtractSettings,
    comment_spans: Vec<Span>,
    /// Nesting depth inside arguments of `console.*(...)`-style calls.
    diagnostic_depth: usize,
    /// Nesting depth inside initializers bound to a route-config name.
    route_depth: usize,
    /// Nesting depth of arrays inside a route config.
    route_array_depth: usize,
    /// Nesting depth inside `meta` properties of route entries.
    meta_depth: usize,
    scan: RegionScan,
}

impl ScriptCollector<'_> {
    fn range(&self, span: Span) -> Range<usize> {
        self.parsed.range(span)
    }

    fn line(&self, span: Span) -> usize {
        self.placement.start_line + self.parsed.line(span.lo) - 1
    }

    fn in_comment(&self, span: Span) -> bool {
        self.comment_spans
            .iter()
            .any(|c| c.lo <= span.lo && span.hi <= c.hi)
    }

    /// First exclusion that applies to a node, if any.
    fn exclusion(&self, span: Span) -> Option<SkipReason> {
        if self.in_comment(span) {
            Some(SkipReason::Comment)
        } else if self.diagnostic_depth > 0 {
            Some(SkipReason::DiagnosticCall)
        } else if self.meta_depth > 0 {
            Some(SkipReason::RouteMetadata)
        } else {
            None
        }
    }

    fn skip(&mut self, span: Span, text: &str, reason: SkipReason) {
        let line = self.line(span);
        tracing::debug!(file = self.file, line, text, %reason, "literal skipped");
        self.scan.skips.push(SkipRecord {
            file: self.file.to_string(),
            line,
            text: text.to_string(),
            reason,
        });
    }

    fn skip_specifier(&mut self, src: &Str) {
        if let Some(value) = src.value.as_str()
            && self.settings.detector.contains(value)
        {
            let value = value.to_string();
            self.skip(src.span, &value, SkipReason::ModuleSpecifier);
        }
    }

    fn push(
        &mut self,
        span: Span,
        site: Site,
        kind: OccurrenceKind,
        text: String,
        captured: Vec<CapturedExpression>,
    ) {
        let range = self.range(span);
        let raw_text = self.source[range.clone()].to_string();
        let offset = self.placement.offset;
        self.scan.candidates.push(Candidate {
            region: self.placement.region,
            line: self.line(span),
            site,
            span: offset + range.start..offset + range.end,
            kind,
            text,
            raw_text,
            captured,
        });
    }

    fn collect_str(&mut self, lit: &Str) {
        let Some(value) = lit.value.as_str() else {
            return;
        };
        if !self.settings.detector.contains(value) {
            return;
        }
        let value = value.to_string();
        match self.exclusion(lit.span) {
            Some(reason) => self.skip(lit.span, &value, reason),
            None => self.push(lit.span, Site::Literal, OccurrenceKind::Plain, value, Vec::new()),
        }
    }

    /// Returns true when the template literal was consumed (extracted or skipped).
    fn collect_tpl(&mut self, tpl: &Tpl) -> bool {
        let chunks: Vec<String> = tpl
            .quasis
            .iter()
            .map(|q| {
                q.cooked
                    .as_ref()
                    .and_then(|c| c.as_str())
                    .unwrap_or(&*q.raw)
                    .to_string()
            })
            .collect();

        if !chunks.iter().any(|c| self.settings.detector.contains(c)) {
            return false;
        }

        let raw = self.source[self.range(tpl.span)].to_string();
        if let Some(reason) = self.exclusion(tpl.span) {
            self.skip(tpl.span, &raw, reason);
            return true;
        }

        if tpl.exprs.is_empty() {
            let text = chunks.concat();
            self.push(tpl.span, Site::TemplateLiteral, OccurrenceKind::Plain, text, Vec::new());
            return true;
        }

        let expressions: Vec<String> = tpl
            .exprs
            .iter()
            .map(|e| self.source[self.range(e.span())].to_string())
            .collect();
        let captured = bind_expressions(expressions);

        let mut text = String::new();
        for (i, chunk) in chunks.iter().enumerate() {
            text.push_str(chunk);
            if let Some(binding) = captured.get(i) {
                text.push('{');
                text.push_str(&binding.label);
                text.push('}');
            }
        }

        self.push(
            tpl.span,
            Site::TemplateLiteral,
            OccurrenceKind::Interpolated,
            text,
            captured,
        );
        true
    }

    fn is_diagnostic_call(&self, callee: &Callee) -> bool {
        if let Callee::Expr(expr) = callee
            && let Expr::Member(member) = &**expr
            && let Expr::Ident(object) = &*member.obj
        {
            return self.settings.is_diagnostic_object(&object.sym);
        }
        false
    }

    fn is_module_load(callee: &Callee) -> bool {
        match callee {
            Callee::Import(_) => true,
            Callee::Expr(expr) => matches!(&**expr, Expr::Ident(ident) if &*ident.sym == "require"),
            Callee::Super(_) => false,
        }
    }
}

fn prop_name(key: &PropName) -> Option<String> {
    match key {
        PropName::Ident(ident) => Some(ident.sym.to_string()),
        PropName::Str(s) => s.value.as_str().map(str::to_string),
        _ => None,
    }
}

impl Visit for ScriptCollector<'_> {
    fn visit_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Lit(Lit::Str(lit)) => self.collect_str(lit),
            Expr::Tpl(tpl) => {
                if !self.collect_tpl(tpl) {
                    tpl.visit_children_with(self);
                }
            }
            _ => expr.visit_children_with(self),
        }
    }

    fn visit_tagged_tpl(&mut self, tagged: &TaggedTpl) {
        // Quasis of a tagged template belong to the tag function.
        tagged.tag.visit_with(self);
        for expr in &tagged.tpl.exprs {
            expr.visit_with(self);
        }
    }

    fn visit_call_expr(&mut self, call: &CallExpr) {
        if Self::is_module_load(&call.callee) {
            for arg in &call.args {
                match &*arg.expr {
                    Expr::Lit(Lit::Str(src)) => self.skip_specifier(src),
                    _ => arg.visit_with(self),
                }
            }
            return;
        }

        if self.is_diagnostic_call(&call.callee) {
            self.diagnostic_depth += 1;
            call.visit_children_with(self);
            self.diagnostic_depth -= 1;
            return;
        }

        call.visit_children_with(self);
    }

    fn visit_import_decl(&mut self, import: &ImportDecl) {
        self.skip_specifier(&import.src);
    }

    fn visit_export_all(&mut self, export: &ExportAll) {
        self.skip_specifier(&export.src);
    }

    fn visit_named_export(&mut self, export: &NamedExport) {
        if let Some(src) = &export.src {
            self.skip_specifier(src);
        }
    }

    fn visit_ts_enum_decl(&mut self, _: &TsEnumDecl) {
        // Enum initializers must stay constant expressions.
    }

    fn visit_var_declarator(&mut self, declarator: &VarDeclarator) {
        let is_route_config = matches!(
            &declarator.name,
            Pat::Ident(binding) if self.settings.is_route_config_name(&binding.id.sym)
        );

        if is_route_config {
            self.route_depth += 1;
            declarator.visit_children_with(self);
            self.route_depth -= 1;
        } else {
            declarator.visit_children_with(self);
        }
    }

    fn visit_key_value_prop(&mut self, prop: &KeyValueProp) {
        let name = prop_name(&prop.key);
        let name = name.as_deref().unwrap_or_default();

        if self.settings.is_route_config_name(name) {
            self.route_depth += 1;
            prop.value.visit_with(self);
            self.route_depth -= 1;
        } else if name == "meta" && self.route_depth > 0 && self.route_array_depth > 0 {
            self.meta_depth += 1;
            prop.value.visit_with(self);
            self.meta_depth -= 1;
        } else {
            prop.value.visit_with(self);
        }
    }

    fn visit_array_lit(&mut self, array: &ArrayLit) {
        if self.route_depth > 0 {
            self.route_array_depth += 1;
            array.visit_children_with(self);
            self.route_array_depth -= 1;
        } else {
            array.visit_children_with(self);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::parsers::{ScriptDialect, parse_script};
    use pretty_assertions::assert_eq;

    fn collect(code: &str) -> RegionScan {
        collect_with(code, ScriptDialect::JavaScript)
    }

    fn collect_with(code: &str, dialect: ScriptDialect) -> RegionScan {
        let parsed = parse_script(code, "test.js", dialect).unwrap();
        collect_script(
            &parsed,
            code,
            Placement::whole_file(),
            "test.js",
            &ExtractSettings::default(),
        )
    }

    fn texts(scan: &RegionScan) -> Vec<&str> {
        scan.candidates.iter().map(|c| c.text.as_str()).collect()
    }

    #[test]
    fn test_string_literal() {
        let code = "const a = '你好';\nconst b = 'hello';";
        let scan = collect(code);
        assert_eq!(texts(&scan), vec!["你好"]);
        let candidate = &scan.candidates[0];
        assert_eq!(candidate.site, Site::Literal);
        assert_eq!(candidate.raw_text, "'你好'");
        assert_eq!(&code[candidate.span.clone()], "'你好'");
        assert_eq!(candidate.line, 1);
    }

    #[test]
    fn test_console_call_is_excluded() {
        let scan = collect("console.log('你好');\nconsole.error(`失败 ${e}`, { msg: '错误' });");
        assert!(scan.candidates.is_empty());
        assert_eq!(scan.skips.len(), 3);
        assert!(scan.skips.iter().all(|s| s.reason == SkipReason::DiagnosticCall));
    }

    #[test]
    fn test_import_specifiers_are_excluded() {
        let scan = collect(
            "import x from './你好.js';\nconst y = require('./再见.js');\nexport * from './模块';",
        );
        assert!(scan.candidates.is_empty());
        assert_eq!(scan.skips.len(), 3);
        assert!(scan.skips.iter().all(|s| s.reason == SkipReason::ModuleSpecifier));
    }

    #[test]
    fn test_dynamic_import_is_excluded() {
        let scan = collect("const page = () => import('./页面.vue');");
        assert!(scan.candidates.is_empty());
    }

    #[test]
    fn test_block_comment_yields_nothing() {
        let scan = collect("/* 你好 */\nconst a = 1;");
        assert!(scan.candidates.is_empty());
        assert!(scan.skips.is_empty());
    }

    #[test]
    fn test_trailing_comment_does_not_affect_literal() {
        let scan = collect("const a = '你好'; // 注释");
        assert_eq!(texts(&scan), vec!["你好"]);
    }

    #[test]
    fn test_template_literal_with_member_access() {
        let code = "const msg = `用户${user.name}登录`;";
        let scan = collect(code);

        assert_eq!(texts(&scan), vec!["用户{name}登录"]);
        let candidate = &scan.candidates[0];
        assert_eq!(candidate.kind, OccurrenceKind::Interpolated);
        assert_eq!(candidate.site, Site::TemplateLiteral);
        assert_eq!(
            candidate.captured,
            vec![CapturedExpression {
                label: "name".to_string(),
                expression: "user.name".to_string(),
            }]
        );
        assert_eq!(&code[candidate.span.clone()], "`用户${user.name}登录`");
    }

    #[test]
    fn test_template_literal_without_expressions() {
        let scan = collect("const a = `纯文本`;");
        assert_eq!(texts(&scan), vec!["纯文本"]);
        assert_eq!(scan.candidates[0].kind, OccurrenceKind::Plain);
    }

    #[test]
    fn test_template_literal_complex_expression_gets_positional_name() {
        let scan = collect("const a = `共${list.length + 1}项`;");
        assert_eq!(texts(&scan), vec!["共{val0}项"]);
        assert_eq!(scan.candidates[0].captured[0].expression, "list.length + 1");
    }

    #[test]
    fn test_nested_literals_in_plain_template_literal() {
        let scan = collect("const a = `${ok ? '是' : '否'}`;");
        assert_eq!(texts(&scan), vec!["是", "否"]);
    }

    #[test]
    fn test_object_keys_are_not_candidates() {
        let scan = collect("const map = { '中文键': 1, label: '标签' };");
        assert_eq!(texts(&scan), vec!["标签"]);
    }

    #[test]
    fn test_route_meta_is_excluded() {
        let code = r#"
const routes = [
  { path: '/', meta: { title: '首页' }, children: [{ path: 'a', meta: { title: '子页' } }] },
];
const menus = [{ meta: { title: '菜单' } }];
"#;
        let scan = collect(code);
        assert_eq!(texts(&scan), vec!["菜单"]);
        assert_eq!(scan.skips.len(), 2);
        assert!(scan.skips.iter().all(|s| s.reason == SkipReason::RouteMetadata));
    }

    #[test]
    fn test_router_options_routes_key() {
        let code = "export default new Router({ routes: [{ meta: { title: '关于' } }] });";
        let scan = collect(code);
        assert!(scan.candidates.is_empty());
        assert_eq!(scan.skips[0].reason, SkipReason::RouteMetadata);
    }

    #[test]
    fn test_typescript_literal_types_are_not_candidates() {
        let scan = collect_with(
            "type Mode = '编辑' | '查看';\nenum E { A = '甲' }\nconst m: Mode = '编辑';",
            ScriptDialect::TypeScript,
        );
        assert_eq!(texts(&scan), vec!["编辑"]);
        assert_eq!(scan.candidates[0].line, 3);
    }

    #[test]
    fn test_tagged_template_is_not_candidate() {
        let scan = collect("const q = gql`查询`;");
        assert!(scan.candidates.is_empty());
    }

    #[test]
    fn test_placement_offsets() {
        let code = "this.msg = '再见'";
        let parsed = parse_script(code, "App.vue", ScriptDialect::JavaScript).unwrap();
        let placement = Placement {
            region: RegionKind::Script,
            offset: 100,
            start_line: 7,
        };
        let scan = collect_script(&parsed, code, placement, "App.vue", &ExtractSettings::default());
        let candidate = &scan.candidates[0];
        assert_eq!(candidate.region, RegionKind::Script);
        assert_eq!(candidate.span, 111..119);
        assert_eq!(candidate.line, 7);
    }
}
