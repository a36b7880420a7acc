//! Classes, functions and module-level variables defined in a module.

use std::collections::HashMap;

use tree_sitter::Node;

use crate::imports::{base_name, import_aliases};
use crate::parse::ParsedModule;
use crate::walk::ParentMap;

/// Kind of definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DefinitionKind {
    /// `class Foo: ...`
    Class,
    /// `def foo(): ...` or `async def foo(): ...`
    Function,
    /// `FOO = ...` at module scope
    Variable,
}

/// A definition extracted from source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Definition {
    /// Kind of definition.
    pub kind: DefinitionKind,
    /// Identifier as written (`method`).
    pub name: String,
    /// Name qualified by enclosing classes and functions (`Outer.Inner.method`).
    pub qualified_name: String,
    /// Line of the defining token (1-indexed).
    pub line: usize,
    /// Column of the defining token (1-indexed).
    pub column: usize,
    /// Alias-resolved base class names (classes only).
    pub bases: Vec<String>,
    /// Lexical decorator names (classes and functions only).
    pub decorators: Vec<String>,
}

impl Definition {
    /// Whether one of the bases equals `base_class` or ends in `.base_class`.
    #[must_use]
    pub fn inherits_from(&self, base_class: &str) -> bool {
        self.bases.iter().any(|b| {
            b == base_class
                || b.strip_suffix(base_class)
                    .is_some_and(|prefix| prefix.ends_with('.'))
        })
    }
}

pub(crate) fn collect(module: &ParsedModule) -> Vec<Definition> {
    let parents = module.parents();
    let aliases = import_aliases(module);
    let mut definitions = Vec::new();

    for (node, _) in module.walk() {
        let kind = match node.kind() {
            "class_definition" => DefinitionKind::Class,
            "function_definition" => DefinitionKind::Function,
            _ => continue,
        };
        let Some(name_node) = node.child_by_field_name("name") else {
            continue;
        };
        let name = module.text(name_node).to_string();
        let position = node.start_position();

        definitions.push(Definition {
            kind,
            qualified_name: qualified_name(module, &parents, node, &name),
            name,
            line: position.row + 1,
            column: position.column + 1,
            bases: if kind == DefinitionKind::Class {
                class_bases(module, node, &aliases)
            } else {
                Vec::new()
            },
            decorators: decorators(module, &parents, node),
        });
    }

    module_variables(module, module.root(), &mut definitions);
    definitions
}

/// Joins the names of enclosing class/function definitions with `.`.
fn qualified_name(
    module: &ParsedModule,
    parents: &ParentMap<'_>,
    node: Node<'_>,
    name: &str,
) -> String {
    let mut parts: Vec<&str> = parents
        .ancestors(node)
        .filter(|a| matches!(a.kind(), "class_definition" | "function_definition"))
        .filter_map(|a| a.child_by_field_name("name"))
        .map(|n| module.text(n))
        .collect();
    parts.reverse();
    parts.push(name);
    parts.join(".")
}

fn class_bases(
    module: &ParsedModule,
    class: Node<'_>,
    aliases: &HashMap<String, String>,
) -> Vec<String> {
    let Some(superclasses) = class.child_by_field_name("superclasses") else {
        return Vec::new();
    };
    let mut cursor = superclasses.walk();
    superclasses
        .named_children(&mut cursor)
        .filter(|n| matches!(n.kind(), "identifier" | "attribute"))
        .map(|n| base_name(module, n, aliases))
        .filter(|b| !b.is_empty())
        .collect()
}

fn decorators(module: &ParsedModule, parents: &ParentMap<'_>, node: Node<'_>) -> Vec<String> {
    let Some(decorated) = parents
        .parent(node)
        .filter(|p| p.kind() == "decorated_definition")
    else {
        return Vec::new();
    };
    let mut cursor = decorated.walk();
    let decorator_nodes: Vec<Node<'_>> = decorated
        .named_children(&mut cursor)
        .filter(|c| c.kind() == "decorator")
        .collect();

    decorator_nodes
        .into_iter()
        .filter_map(|d| {
            let mut cursor = d.walk();
            let expr = d.named_children(&mut cursor).next();
            expr.and_then(|e| lexical_name(module, e))
        })
        .collect()
}

/// `Name.id`, `Attribute.attr`, or the name of a call's callee.
fn lexical_name(module: &ParsedModule, expr: Node<'_>) -> Option<String> {
    match expr.kind() {
        "identifier" => Some(module.text(expr).to_string()),
        "attribute" => expr
            .child_by_field_name("attribute")
            .map(|a| module.text(a).to_string()),
        "call" => expr
            .child_by_field_name("function")
            .and_then(|f| lexical_name(module, f)),
        _ => None,
    }
}

const MODULE_SCOPE_BLOCKS: &[&str] = &[
    "block",
    "if_statement",
    "elif_clause",
    "else_clause",
    "try_statement",
    "except_clause",
    "except_group_clause",
    "finally_clause",
    "with_statement",
    "for_statement",
    "while_statement",
    "match_statement",
    "case_clause",
];

/// Assignment targets in module scope, never descending into class or
/// function bodies.
fn module_variables(module: &ParsedModule, node: Node<'_>, out: &mut Vec<Definition>) {
    let mut cursor = node.walk();
    let children: Vec<Node<'_>> = node.named_children(&mut cursor).collect();

    for child in children {
        match child.kind() {
            "expression_statement" => {
                let mut cursor = child.walk();
                for expr in child.named_children(&mut cursor) {
                    if expr.kind() == "assignment" {
                        assignment_targets(module, expr, out);
                    }
                }
            }
            kind if MODULE_SCOPE_BLOCKS.contains(&kind) => module_variables(module, child, out),
            _ => {}
        }
    }
}

fn assignment_targets(module: &ParsedModule, assignment: Node<'_>, out: &mut Vec<Definition>) {
    // `x: int` without a value binds nothing.
    let Some(right) = assignment.child_by_field_name("right") else {
        return;
    };
    if let Some(left) = assignment.child_by_field_name("left") {
        target_names(module, left, out);
    }
    if right.kind() == "assignment" {
        assignment_targets(module, right, out);
    }
}

fn target_names(module: &ParsedModule, target: Node<'_>, out: &mut Vec<Definition>) {
    match target.kind() {
        "identifier" => {
            let name = module.text(target).to_string();
            let position = target.start_position();
            out.push(Definition {
                kind: DefinitionKind::Variable,
                qualified_name: name.clone(),
                name,
                line: position.row + 1,
                column: position.column + 1,
                bases: Vec::new(),
                decorators: Vec::new(),
            });
        }
        "pattern_list" | "tuple_pattern" | "list_pattern" | "list_splat_pattern" => {
            let mut cursor = target.walk();
            let children: Vec<Node<'_>> = target.named_children(&mut cursor).collect();
            for child in children {
                target_names(module, child, out);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defs(src: &str) -> Vec<Definition> {
        ParsedModule::parse("t.py", src).unwrap().definitions()
    }

    fn names(defs: &[Definition], kind: DefinitionKind) -> Vec<String> {
        defs.iter()
            .filter(|d| d.kind == kind)
            .map(|d| d.qualified_name.clone())
            .collect()
    }

    #[test]
    fn nested_definitions_are_qualified() {
        let d = defs(
            "class Outer:\n    class Inner:\n        def method(self):\n            pass\n\ndef top():\n    def helper():\n        pass\n",
        );
        assert_eq!(
            names(&d, DefinitionKind::Class),
            vec!["Outer", "Outer.Inner"]
        );
        assert_eq!(
            names(&d, DefinitionKind::Function),
            vec!["Outer.Inner.method", "top", "top.helper"]
        );
        let method = d.iter().find(|x| x.name == "method").unwrap();
        assert_eq!((method.line, method.column), (3, 9));
    }

    #[test]
    fn async_functions_are_functions() {
        let d = defs("async def fetch():\n    pass\n");
        assert_eq!(names(&d, DefinitionKind::Function), vec!["fetch"]);
        assert_eq!(d[0].column, 1);
    }

    #[test]
    fn bases_are_alias_resolved() {
        let d = defs("from app.base import BaseModel as BM\nclass User(BM, mixins.Audit, metaclass=Meta):\n    pass\n");
        let user = &d[0];
        assert_eq!(user.bases, vec!["app.base.BaseModel", "mixins.Audit"]);
        assert!(user.inherits_from("BaseModel"));
        assert!(user.inherits_from("Audit"));
        assert!(!user.inherits_from("Model"));
    }

    #[test]
    fn decorators_use_lexical_names() {
        let d = defs(
            "@login_required\nclass A:\n    pass\n\n@app.route('/x')\ndef view():\n    pass\n\n@pkg.cached\ndef other():\n    pass\n",
        );
        assert_eq!(d[0].decorators, vec!["login_required"]);
        assert_eq!(d[1].decorators, vec!["route"]);
        assert_eq!(d[2].decorators, vec!["cached"]);
        // decorated class still starts at the `class` keyword
        assert_eq!(d[0].line, 2);
    }

    #[test]
    fn only_module_scope_assignments_are_variables() {
        let d = defs(
            "A = 1\nB: int = 2\nC: str\nx, (y, z) = 1, (2, 3)\nm = n = 0\nif True:\n    D = 4\n\n@dataclass\nclass P:\n    path: str = ''\n    field = 1\n\ndef f():\n    local = 1\n",
        );
        assert_eq!(
            names(&d, DefinitionKind::Variable),
            vec!["A", "B", "x", "y", "z", "m", "n", "D"]
        );
    }

    #[test]
    fn attribute_targets_are_not_variables() {
        let d = defs("obj.attr = 1\nitems[0] = 2\n");
        assert!(names(&d, DefinitionKind::Variable).is_empty());
    }
}
