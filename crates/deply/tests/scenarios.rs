//! End-to-end scenarios over small Python projects.

use std::fs;
use std::path::Path;

use deply::{render, run, AnalysisResult, ConfigFormat, DeplyConfig, ReportFormat, ViolationType};

fn write_tree(root: &Path, files: &[(&str, &str)]) {
    for (path, content) in files {
        let full = root.join(path);
        fs::create_dir_all(full.parent().unwrap()).unwrap();
        fs::write(full, content).unwrap();
    }
}

fn analyze(root: &Path, yaml: &str) -> AnalysisResult {
    let config = DeplyConfig::parse(yaml, ConfigFormat::Yaml, root).unwrap();
    run(&config).unwrap()
}

const LAYERED: &[(&str, &str)] = &[
    ("models/base_model.py", "class BaseModel:\n    pass\n"),
    (
        "models/my_model.py",
        "from .base_model import BaseModel\n\nclass MyModel(BaseModel):\n    pass\n",
    ),
    (
        "views/views.py",
        "from ..models.my_model import MyModel\n\ndef my_view():\n    model = MyModel()\n",
    ),
];

const LAYERED_CONFIG: &str = r"
deply:
  layers:
    - name: models
      collectors:
        - type: class_inherits
          base_class: BaseModel
    - name: views
      collectors:
        - type: file_regex
          regex: .*/views.py
  ruleset:
    views:
      disallow: [models]
";

#[test]
fn layered_disallow_fires() {
    let dir = tempfile::tempdir().unwrap();
    write_tree(dir.path(), LAYERED);

    let result = analyze(dir.path(), LAYERED_CONFIG);
    assert!(result.has_violations());
    assert!(result
        .violations
        .iter()
        .all(|v| v.violation_type == ViolationType::LayerDependency));

    let text = render(&result.violations, ReportFormat::Text).unwrap();
    assert!(text.contains("Layer 'views' is not allowed to depend on layer 'models'"));
    let lines: Vec<usize> = result.violations.iter().map(|v| v.line).collect();
    assert_eq!(lines, vec![1, 4]);
    assert!(text.lines().all(|l| l.ends_with("(function my_view)")));
}

#[test]
fn imported_name_matching_a_dataclass_field_is_not_a_violation() {
    let dir = tempfile::tempdir().unwrap();
    write_tree(
        dir.path(),
        &[
            (
                "service.py",
                "from dataclasses import dataclass\n\n@dataclass\nclass LinkParams:\n    path: str = ''\n    name: str = ''\n",
            ),
            (
                "urls.py",
                "from django.urls import path\n\nurlpatterns = [path('links/', None)]\n",
            ),
        ],
    );
    let result = analyze(
        dir.path(),
        r"
layers:
  - name: service
    collectors:
      - type: file_regex
        regex: .*service.py
  - name: urls
    collectors:
      - type: file_regex
        regex: .*urls.py
ruleset:
  urls:
    disallow: [service]
",
    );
    assert!(!result.has_violations(), "{:?}", result.violations);
    assert_eq!(result.elements_checked, 2);
}

#[test]
fn class_naming_rule_reports_offenders_in_its_layer_only() {
    let dir = tempfile::tempdir().unwrap();
    write_tree(
        dir.path(),
        &[
            ("services/user.py", "class UserService:\n    pass\nclass UserHelper:\n    pass\n"),
            ("views/user.py", "class UserView:\n    pass\n"),
        ],
    );
    let result = analyze(
        dir.path(),
        r"
layers:
  - name: services
    collectors:
      - type: directory
        directories: [services]
        element_type: class
  - name: views
    collectors:
      - type: directory
        directories: [views]
ruleset:
  services:
    class_naming:
      regex: .*Service$
",
    );
    let names: Vec<&str> = result
        .violations
        .iter()
        .map(|v| v.element_name.as_str())
        .collect();
    assert_eq!(names, vec!["UserHelper"]);
    assert_eq!(result.violations[0].violation_type, ViolationType::ClassNaming);
}

#[test]
fn function_naming_rule() {
    let dir = tempfile::tempdir().unwrap();
    write_tree(
        dir.path(),
        &[("handlers.py", "def handle_get():\n    pass\ndef process():\n    pass\n")],
    );
    let result = analyze(
        dir.path(),
        r"
layers:
  - name: handlers
    collectors:
      - type: function_name_regex
        function_name_regex: .*
ruleset:
  handlers:
    function_naming:
      regex: handle_
",
    );
    assert_eq!(result.violations.len(), 1);
    assert_eq!(result.violations[0].element_name, "process");
    assert_eq!(
        result.violations[0].violation_type,
        ViolationType::FunctionNaming
    );
}

#[test]
fn edges_within_a_layer_never_violate() {
    let dir = tempfile::tempdir().unwrap();
    write_tree(
        dir.path(),
        &[(
            "models.py",
            "class Base:\n    pass\nclass Child(Base):\n    def save(self):\n        return Child()\n",
        )],
    );
    let result = analyze(
        dir.path(),
        r"
layers:
  - name: models
    collectors:
      - type: file_regex
        regex: models.py
ruleset:
  models:
    disallow: [models]
",
    );
    assert!(result.edges_checked > 0);
    assert!(!result.has_violations());
}

#[test]
fn boolean_collector_builds_layer() {
    let dir = tempfile::tempdir().unwrap();
    write_tree(
        dir.path(),
        &[
            (
                "base_service.py",
                "class BaseService:\n    pass\nclass OtherService:\n    pass\n",
            ),
            ("user_service.py", "class UserService:\n    pass\n"),
            ("api.py", "from user_service import UserService\n\ndef endpoint():\n    return UserService()\n"),
        ],
    );
    let result = analyze(
        dir.path(),
        r"
layers:
  - name: services
    collectors:
      - type: bool
        must:
          - type: class_name_regex
            class_name_regex: .*Service$
        must_not:
          - type: file_regex
            regex: .*base_service.py
  - name: api
    collectors:
      - type: file_regex
        regex: api.py
ruleset:
  api:
    disallow: [services]
",
    );
    assert_eq!(result.elements_checked, 2);
    assert_eq!(result.violations.len(), 2);
    assert!(result.violations.iter().all(|v| v.element_name == "endpoint"));
}

#[test]
fn empty_project_has_no_violations() {
    let dir = tempfile::tempdir().unwrap();
    let result = analyze(dir.path(), LAYERED_CONFIG);
    assert!(!result.has_violations());
    assert_eq!(result.elements_checked, 0);
    assert_eq!(render(&result.violations, ReportFormat::Text).unwrap(), "");
}

#[test]
fn runs_are_deterministic() {
    let dir = tempfile::tempdir().unwrap();
    write_tree(dir.path(), LAYERED);
    let first = render(&analyze(dir.path(), LAYERED_CONFIG).violations, ReportFormat::Text).unwrap();
    let second = render(&analyze(dir.path(), LAYERED_CONFIG).violations, ReportFormat::Text).unwrap();
    assert_eq!(first, second);
}

#[test]
fn broken_file_does_not_change_other_violations() {
    let dir = tempfile::tempdir().unwrap();
    write_tree(dir.path(), LAYERED);
    let before = analyze(dir.path(), LAYERED_CONFIG).violations;

    write_tree(
        dir.path(),
        &[("views/broken_views.py", "from ..models.my_model import MyModel\ndef (:\n")],
    );
    let after = analyze(dir.path(), LAYERED_CONFIG).violations;
    assert_eq!(before, after);
}

#[test]
fn global_exclude_files_drop_whole_files() {
    let dir = tempfile::tempdir().unwrap();
    write_tree(dir.path(), LAYERED);
    let result = analyze(
        dir.path(),
        &LAYERED_CONFIG.replace("  layers:", "  exclude_files: ['views/']\n  layers:"),
    );
    assert!(!result.has_violations());
}

#[test]
fn unknown_collector_is_a_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = DeplyConfig::parse(
        "layers:\n  - name: a\n    collectors:\n      - type: package_regex\n",
        ConfigFormat::Yaml,
        dir.path(),
    )
    .unwrap();
    let err = run(&config).unwrap_err();
    assert!(err.to_string().contains("package_regex"));
}

#[test]
fn json_report_lists_violations() {
    let dir = tempfile::tempdir().unwrap();
    write_tree(dir.path(), LAYERED);
    let result = analyze(dir.path(), LAYERED_CONFIG);
    let json = render(&result.violations, ReportFormat::Json).unwrap();
    assert!(json.contains("\"violation_type\": \"LAYER_DEPENDENCY\""));
    assert!(json.contains("\"element_name\": \"my_view\""));
}

#[test]
fn text_report_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    write_tree(dir.path(), LAYERED);
    let root = dir.path().canonicalize().unwrap();

    let result = analyze(dir.path(), LAYERED_CONFIG);
    let text = render(&result.violations, ReportFormat::Text)
        .unwrap()
        .replace(&root.display().to_string(), "<root>");
    insta::assert_snapshot!(text, @r"
    <root>/views/views.py:1 - Layer 'views' is not allowed to depend on layer 'models' (my_view -> MyModel) (function my_view)
    <root>/views/views.py:4 - Layer 'views' is not allowed to depend on layer 'models' (my_view -> MyModel) (function my_view)
    ");
}
