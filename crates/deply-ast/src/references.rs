//! Syntactic references that dependency edges are derived from.

use tree_sitter::Node;

use crate::parse::ParsedModule;
use crate::walk::ParentMap;

/// Which construct produced a reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceKind {
    /// `import M [as A]`
    Import,
    /// `from M import N [as A]`
    FromImport,
    /// `name(...)`
    Call,
    /// `x.y` with a plain-name head
    Attribute,
    /// An identifier read in expression position
    NameLoad,
}

/// A probe string plus the line it occurs on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Reference {
    /// Construct that produced this reference.
    pub kind: ReferenceKind,
    /// Name to look up in the element index.
    pub probe: String,
    /// 1-indexed line of the reference.
    pub line: usize,
}

pub(crate) fn collect(module: &ParsedModule) -> Vec<Reference> {
    let parents = module.parents();
    let mut refs = Vec::new();

    for (node, _) in module.walk() {
        let line = node.start_position().row + 1;
        match node.kind() {
            "import_statement" => {
                let mut cursor = node.walk();
                for name in node.children_by_field_name("name", &mut cursor) {
                    let probe = match alias_of(module, name) {
                        Some(alias) => alias,
                        None => module
                            .text(name)
                            .split('.')
                            .next()
                            .unwrap_or_default()
                            .to_string(),
                    };
                    refs.push(Reference {
                        kind: ReferenceKind::Import,
                        probe,
                        line,
                    });
                }
            }
            "import_from_statement" => {
                let mut cursor = node.walk();
                for name in node.children_by_field_name("name", &mut cursor) {
                    let probe =
                        alias_of(module, name).unwrap_or_else(|| module.text(name).to_string());
                    refs.push(Reference {
                        kind: ReferenceKind::FromImport,
                        probe,
                        line,
                    });
                }
            }
            "call" => {
                if let Some(function) = node
                    .child_by_field_name("function")
                    .filter(|f| f.kind() == "identifier")
                {
                    refs.push(Reference {
                        kind: ReferenceKind::Call,
                        probe: module.text(function).to_string(),
                        line,
                    });
                }
            }
            "attribute" => {
                if let (Some(object), Some(attr)) = (
                    node.child_by_field_name("object"),
                    node.child_by_field_name("attribute"),
                ) {
                    if object.kind() == "identifier" {
                        refs.push(Reference {
                            kind: ReferenceKind::Attribute,
                            probe: format!("{}.{}", module.text(object), module.text(attr)),
                            line,
                        });
                    }
                }
            }
            "identifier" if is_name_load(&parents, node) => {
                refs.push(Reference {
                    kind: ReferenceKind::NameLoad,
                    probe: module.text(node).to_string(),
                    line,
                });
            }
            _ => {}
        }
    }
    refs
}

fn alias_of(module: &ParsedModule, name: Node<'_>) -> Option<String> {
    if name.kind() != "aliased_import" {
        return None;
    }
    name.child_by_field_name("alias")
        .map(|a| module.text(a).to_string())
}

fn is_field(parent: Node<'_>, field: &str, node: Node<'_>) -> bool {
    parent.child_by_field_name(field) == Some(node)
}

/// Like [`is_field`] for fields that repeat, such as dict-pattern values.
fn in_field(parent: Node<'_>, field: &str, node: Node<'_>) -> bool {
    let mut cursor = parent.walk();
    let found = parent
        .children_by_field_name(field, &mut cursor)
        .any(|child| child == node);
    found
}

/// Whether an `identifier` node is read in expression position.
///
/// Binding sites (definition names, parameters, assignment targets, loop
/// and `with` targets, match-case captures, `type` alias names, keyword
/// names, attribute members) and everything inside import statements are
/// not loads.
fn is_name_load(parents: &ParentMap<'_>, node: Node<'_>) -> bool {
    let Some(parent) = parents.parent(node) else {
        return false;
    };
    let binding = match parent.kind() {
        "class_definition" | "function_definition" | "keyword_argument" | "named_expression"
        | "default_parameter" | "typed_default_parameter" => is_field(parent, "name", node),
        "attribute" => is_field(parent, "attribute", node),
        "assignment" | "augmented_assignment" | "for_statement" | "for_in_clause" => {
            is_field(parent, "left", node)
        }
        "typed_parameter" => !is_field(parent, "type", node),
        "parameters" | "lambda_parameters" | "pattern_list" | "tuple_pattern" | "list_pattern"
        | "list_splat_pattern" | "dictionary_splat_pattern" | "as_pattern_target"
        | "global_statement" | "nonlocal_statement" | "aliased_import" | "import_prefix"
        | "keyword_pattern" | "case_pattern" | "splat_pattern" => true,
        "as_pattern" => is_field(parent, "alias", node),
        "dict_pattern" => in_field(parent, "value", node),
        // a capture is a one-segment dotted name inside a pattern
        "dotted_name" => {
            parent.named_child_count() == 1
                && parents
                    .parent(parent)
                    .is_some_and(|g| matches!(g.kind(), "case_pattern" | "keyword_pattern"))
        }
        "type_alias_statement" => is_field(parent, "left", node),
        "type" => parents.parent(parent).is_some_and(|g| {
            g.kind() == "type_alias_statement" && is_field(g, "left", parent)
        }),
        _ => false,
    };
    if binding {
        return false;
    }
    !parents.ancestors(node).any(|a| {
        matches!(
            a.kind(),
            "import_statement" | "import_from_statement" | "future_import_statement"
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn refs(src: &str) -> Vec<Reference> {
        ParsedModule::parse("t.py", src).unwrap().references()
    }

    fn probes(refs: &[Reference], kind: ReferenceKind) -> Vec<String> {
        refs.iter()
            .filter(|r| r.kind == kind)
            .map(|r| r.probe.clone())
            .collect()
    }

    #[test]
    fn import_probes_use_alias_or_head_segment() {
        let r = refs("import os.path\nimport numpy as np\n");
        assert_eq!(probes(&r, ReferenceKind::Import), vec!["os", "np"]);
        assert!(probes(&r, ReferenceKind::NameLoad).is_empty());
    }

    #[test]
    fn from_import_probes_use_alias_or_name() {
        let r = refs("from ..models.my_model import MyModel, Other as O\n");
        assert_eq!(probes(&r, ReferenceKind::FromImport), vec!["MyModel", "O"]);
        assert!(probes(&r, ReferenceKind::NameLoad).is_empty());
    }

    #[test]
    fn calls_and_attributes() {
        let r = refs("def v():\n    m = MyModel()\n    return m.save(helpers.clean(x))\n");
        assert_eq!(probes(&r, ReferenceKind::Call), vec!["MyModel"]);
        assert_eq!(
            probes(&r, ReferenceKind::Attribute),
            vec!["m.save", "helpers.clean"]
        );
        let call = r.iter().find(|x| x.kind == ReferenceKind::Call).unwrap();
        assert_eq!(call.line, 2);
    }

    #[test]
    fn name_loads_skip_binding_sites() {
        let r = refs(
            "def f(a, b: Hint = DEFAULT, *args, **kw):\n    total = a + b\n    for i in items:\n        g(key=value)\n    obj.member\n    return total\n",
        );
        let loads = probes(&r, ReferenceKind::NameLoad);
        for expected in ["Hint", "DEFAULT", "a", "b", "items", "g", "value", "obj", "total"] {
            assert!(loads.contains(&expected.to_string()), "missing {expected}");
        }
        for unexpected in ["f", "args", "kw", "i", "key", "member"] {
            assert!(!loads.contains(&unexpected.to_string()), "unexpected {unexpected}");
        }
        // `total` is loaded once (the return), not at its assignment
        assert_eq!(loads.iter().filter(|l| *l == "total").count(), 1);
    }

    #[test]
    fn match_captures_are_not_loads() {
        let r = refs(
            "match command:\n    case [first, *rest]:\n        pass\n    case {'k': value}:\n        pass\n    case Point(x=px) if px > LIMIT:\n        pass\n    case Color.RED:\n        pass\n",
        );
        let loads = probes(&r, ReferenceKind::NameLoad);
        for expected in ["command", "Point", "px", "LIMIT", "Color"] {
            assert!(loads.contains(&expected.to_string()), "missing {expected}");
        }
        for unexpected in ["first", "rest", "value"] {
            assert!(!loads.contains(&unexpected.to_string()), "unexpected {unexpected}");
        }
        // `px` is read only in the guard
        assert_eq!(loads.iter().filter(|l| *l == "px").count(), 1);
    }

    #[test]
    fn type_alias_name_is_not_a_load() {
        let r = refs("type Point = tuple[float, Coord]\n");
        let loads = probes(&r, ReferenceKind::NameLoad);
        assert!(!loads.contains(&"Point".to_string()));
        assert!(loads.contains(&"Coord".to_string()));
    }

    #[test]
    fn decorators_and_bases_are_loads() {
        let r = refs("@register\nclass A(Base):\n    pass\n");
        let loads = probes(&r, ReferenceKind::NameLoad);
        assert!(loads.contains(&"register".to_string()));
        assert!(loads.contains(&"Base".to_string()));
        assert!(!loads.contains(&"A".to_string()));
    }

    #[test]
    fn with_targets_are_not_loads() {
        let r = refs("with open(p) as handle:\n    pass\n");
        let loads = probes(&r, ReferenceKind::NameLoad);
        assert!(loads.contains(&"p".to_string()));
        assert!(!loads.contains(&"handle".to_string()));
    }
}
