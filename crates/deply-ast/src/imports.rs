//! Import statements and alias-aware name resolution.

use std::collections::HashMap;

use tree_sitter::Node;

use crate::parse::ParsedModule;

/// Which import statement form produced a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportKind {
    /// `import M [as A]`
    Import,
    /// `from M import N [as A]`
    FromImport,
}

/// One imported name.
///
/// For `from M import N` the `module` is the joined path `M.N`. Leading
/// dots of relative imports are dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRecord {
    /// Statement form.
    pub kind: ImportKind,
    /// Fully qualified dotted name being imported.
    pub module: String,
    /// 1-indexed line of the import statement.
    pub line: usize,
    /// Local alias from an `as` clause.
    pub alias: Option<String>,
}

impl ImportRecord {
    /// The name this import binds in the importing module.
    #[must_use]
    pub fn bound_name(&self) -> &str {
        if let Some(alias) = &self.alias {
            return alias;
        }
        match self.kind {
            ImportKind::Import => &self.module,
            ImportKind::FromImport => self
                .module
                .rsplit_once('.')
                .map_or(self.module.as_str(), |(_, name)| name),
        }
    }
}

pub(crate) fn collect(module: &ParsedModule) -> Vec<ImportRecord> {
    let mut records = Vec::new();
    for (node, _) in module.walk() {
        match node.kind() {
            "import_statement" => {
                let line = node.start_position().row + 1;
                let mut cursor = node.walk();
                for name in node.children_by_field_name("name", &mut cursor) {
                    let (dotted, alias) = split_alias(module, name);
                    records.push(ImportRecord {
                        kind: ImportKind::Import,
                        module: dotted,
                        line,
                        alias,
                    });
                }
            }
            "import_from_statement" => {
                let line = node.start_position().row + 1;
                let base = node
                    .child_by_field_name("module_name")
                    .map(|m| from_module_name(module, m))
                    .unwrap_or_default();
                let mut cursor = node.walk();
                for name in node.children_by_field_name("name", &mut cursor) {
                    let (imported, alias) = split_alias(module, name);
                    let full = if base.is_empty() {
                        imported
                    } else {
                        format!("{base}.{imported}")
                    };
                    records.push(ImportRecord {
                        kind: ImportKind::FromImport,
                        module: full,
                        line,
                        alias,
                    });
                }
            }
            _ => {}
        }
    }
    records
}

/// Splits a `dotted_name` or `aliased_import` node into `(name, alias)`.
fn split_alias(module: &ParsedModule, node: Node<'_>) -> (String, Option<String>) {
    if node.kind() == "aliased_import" {
        let name = node
            .child_by_field_name("name")
            .map(|n| module.text(n).to_string())
            .unwrap_or_default();
        let alias = node
            .child_by_field_name("alias")
            .map(|a| module.text(a).to_string());
        (name, alias)
    } else {
        (module.text(node).to_string(), None)
    }
}

/// Module path of a `from` clause without relative-import dots.
fn from_module_name(module: &ParsedModule, node: Node<'_>) -> String {
    if node.kind() != "relative_import" {
        return module.text(node).to_string();
    }
    let mut cursor = node.walk();
    let dotted = node
        .named_children(&mut cursor)
        .find(|c| c.kind() == "dotted_name")
        .map(|c| module.text(c).to_string());
    dotted.unwrap_or_default()
}

/// Maps every locally bound import name to the dotted name it refers to.
///
/// `import X as Y` gives `Y → X`, `from M import N as P` gives `P → M.N`,
/// `import X` gives `X → X` and `from M import N` gives `N → M.N`.
#[must_use]
pub fn import_aliases(module: &ParsedModule) -> HashMap<String, String> {
    module
        .imports()
        .into_iter()
        .map(|record| (record.bound_name().to_string(), record.module.clone()))
        .collect()
}

/// Dotted text of an attribute chain such as `a.b.c`.
///
/// Returns an empty string when the head of the chain is not a plain name
/// (e.g. `f().x` or `a[0].b`).
#[must_use]
pub fn full_dotted(module: &ParsedModule, expr: Node<'_>) -> String {
    match expr.kind() {
        "identifier" => module.text(expr).to_string(),
        "attribute" => {
            let (Some(object), Some(attr)) = (
                expr.child_by_field_name("object"),
                expr.child_by_field_name("attribute"),
            ) else {
                return String::new();
            };
            let head = full_dotted(module, object);
            if head.is_empty() {
                return head;
            }
            format!("{head}.{}", module.text(attr))
        }
        _ => String::new(),
    }
}

/// Alias-resolved dotted name of a class base expression.
///
/// The head name is replaced through `aliases`, so with
/// `from pkg import models as m`, the base `m.Model` resolves to
/// `pkg.models.Model`.
#[must_use]
pub fn base_name(module: &ParsedModule, expr: Node<'_>, aliases: &HashMap<String, String>) -> String {
    match expr.kind() {
        "identifier" => {
            let name = module.text(expr);
            aliases
                .get(name)
                .cloned()
                .unwrap_or_else(|| name.to_string())
        }
        "attribute" => {
            let (Some(object), Some(attr)) = (
                expr.child_by_field_name("object"),
                expr.child_by_field_name("attribute"),
            ) else {
                return String::new();
            };
            let head = base_name(module, object, aliases);
            if head.is_empty() {
                return head;
            }
            format!("{head}.{}", module.text(attr))
        }
        _ => String::new(),
    }
}
