use std::sync::Arc;

use javasym_config::{ConfigError, SolverConfig};
use javasym_test_utils::{write_jar, write_sources, ClassFileBuilder};
use javasym_types::{ReferenceType, TypeSolver};
use pretty_assertions::assert_eq;

#[test]
fn children_follow_runtime_jars_sources_order() {
    let dir = tempfile::tempdir().unwrap();
    write_jar(
        &dir.path().join("deps/widgets.jar"),
        &[("com/acme/Widget.class", ClassFileBuilder::new("com/acme/Widget").build())],
    );
    write_sources(&dir.path().join("src"), &[("app/Main.java", "package app;\n\nclass Main {}\n")]);
    let config_path = dir.path().join("javasym.toml");
    std::fs::write(
        &config_path,
        "jars = [\"deps/widgets.jar\"]\nsource_roots = [\"src\"]\n\n[runtime]\nallowed_prefixes = [\"java.\"]\n",
    )
    .unwrap();

    let solver = SolverConfig::load(&config_path).unwrap().build_solver().unwrap();
    let children: Vec<String> = solver.children().iter().map(|c| c.description()).collect();
    assert_eq!(children.len(), 3);
    assert_eq!(children[0], "ReflectionTypeSolver[java.]");
    assert!(children[1].starts_with("JarTypeSolver("), "{children:?}");
    assert!(children[2].starts_with("JavaParserTypeSolver("), "{children:?}");

    let root: Arc<dyn TypeSolver> = solver;
    assert!(root.try_to_solve_type("com.acme.Widget").is_solved());
    assert!(root.try_to_solve_type("app.Main").is_solved());
    assert!(root.try_to_solve_type("java.lang.String").is_solved());
}

#[test]
fn sources_resolve_runtime_supertypes_through_the_root() {
    let dir = tempfile::tempdir().unwrap();
    write_sources(
        dir.path(),
        &[(
            "app/Names.java",
            "package app;\n\nimport java.util.ArrayList;\n\npublic class Names extends ArrayList<String> {\n}\n",
        )],
    );
    let config = SolverConfig {
        source_roots: vec![dir.path().to_path_buf()],
        ..SolverConfig::default()
    };
    let root: Arc<dyn TypeSolver> = config.build_solver().unwrap();
    let names = root.solve_type("app.Names").unwrap();
    let ancestors: Vec<String> = names.all_ancestors().unwrap().iter().map(ReferenceType::describe).collect();
    assert_eq!(ancestors.first().map(String::as_str), Some("java.util.ArrayList<java.lang.String>"));
    assert!(ancestors.contains(&"java.util.List<java.lang.String>".to_string()));
}

#[test]
fn disabled_runtime_is_left_out() {
    let mut config = SolverConfig::default();
    config.runtime.enabled = false;
    let solver = config.build_solver().unwrap();
    assert!(solver.children().is_empty());
    let root: Arc<dyn TypeSolver> = solver;
    assert!(!root.try_to_solve_type("java.lang.String").is_solved());
}

#[test]
fn missing_inputs_fail_the_build() {
    let dir = tempfile::tempdir().unwrap();

    let config = SolverConfig {
        jars: vec![dir.path().join("missing.jar")],
        ..SolverConfig::default()
    };
    assert!(matches!(config.build_solver(), Err(ConfigError::Jar(_))));

    let config = SolverConfig {
        source_roots: vec![dir.path().join("missing")],
        ..SolverConfig::default()
    };
    assert!(matches!(config.build_solver(), Err(ConfigError::Source(_))));
}
