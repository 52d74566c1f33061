use std::sync::Arc;

use javasym_resolve::ReflectionTypeSolver;
use javasym_types::{Origin, PrimitiveType, ReferenceType, Type, TypeKind, TypeSolver};
use pretty_assertions::assert_eq;

use super::{class_type, session};

fn runtime() -> Arc<dyn TypeSolver> {
    ReflectionTypeSolver::new()
}

#[test]
fn resolves_core_classes() {
    let solver = runtime();
    let string = solver.solve_type("java.lang.String").unwrap();
    assert_eq!(string.name(), "String");
    assert_eq!(string.package_name(), "java.lang");
    assert_eq!(string.kind(), TypeKind::Class);
    assert_eq!(string.origin(), Origin::Runtime);

    let list = solver.solve_type("java.util.List").unwrap();
    assert_eq!(list.kind(), TypeKind::Interface);
    let names: Vec<String> = list.type_parameters().iter().map(|tp| tp.name().to_string()).collect();
    assert_eq!(names, vec!["E".to_string()]);
}

#[test]
fn nested_classes_resolve_through_their_outer_class() {
    let solver = runtime();
    let entry = solver.solve_type("java.util.Map.Entry").unwrap();
    assert_eq!(entry.name(), "Entry");
    assert_eq!(entry.qualified_name(), "java.util.Map.Entry");
    let outer = entry.containing_type().unwrap().unwrap();
    assert_eq!(outer.qualified_name(), "java.util.Map");

    let map = solver.solve_type("java.util.Map").unwrap();
    let inner: Vec<String> = map.internal_types().iter().map(|t| t.name().to_string()).collect();
    assert_eq!(inner, vec!["Entry".to_string()]);
}

#[test]
fn unknown_names_are_unsolved() {
    let solver = runtime();
    assert!(!solver.try_to_solve_type("java.lang.Nope").is_solved());
    assert!(!solver.try_to_solve_type("com.acme.Widget").is_solved());
    assert!(solver.solve_type("java.lang.Nope").is_err());
}

#[test]
fn allowed_prefixes_restrict_lookups() {
    let jre: Arc<dyn TypeSolver> = ReflectionTypeSolver::jre_only();
    assert!(jre.try_to_solve_type("java.lang.String").is_solved());

    let util_only: Arc<dyn TypeSolver> = ReflectionTypeSolver::with_allowed_prefixes(vec!["java.util.".into()]);
    assert!(util_only.try_to_solve_type("java.util.ArrayList").is_solved());
    assert!(!util_only.try_to_solve_type("java.lang.String").is_solved());
}

#[test]
fn generic_supertypes_are_substituted() {
    let solver = runtime();
    let string = solver.solve_type("java.lang.String").unwrap();
    let ancestors: Vec<String> = string.all_ancestors().unwrap().iter().map(ReferenceType::describe).collect();
    assert!(ancestors.contains(&"java.lang.Comparable<java.lang.String>".to_string()));
    assert!(ancestors.contains(&"java.lang.Object".to_string()));

    let array_list = ReferenceType::new(
        solver.solve_type("java.util.ArrayList").unwrap(),
        vec![class_type(&solver, "java.lang.String")],
    )
    .unwrap();
    let ancestors: Vec<String> = array_list.all_ancestors().unwrap().iter().map(ReferenceType::describe).collect();
    for expected in [
        "java.util.List<java.lang.String>",
        "java.util.Collection<java.lang.String>",
        "java.lang.Iterable<java.lang.String>",
    ] {
        assert!(ancestors.contains(&expected.to_string()), "missing {expected} in {ancestors:?}");
    }
    assert_eq!(ancestors.last().map(String::as_str), Some("java.lang.Object"));
}

#[test]
fn overloads_pick_the_most_specific_method() {
    let solver = runtime();
    let math = solver.solve_type("java.lang.Math").unwrap();
    let int = Type::Primitive(PrimitiveType::Int);
    let long = Type::Primitive(PrimitiveType::Long);

    let exact = math.solve_method("max", &[int.clone(), int.clone()], true).unwrap();
    assert_eq!(exact.corresponding_declaration().unwrap().signature().unwrap(), "max(int, int)");

    let widened = math.solve_method("max", &[long, int], true).unwrap();
    assert_eq!(widened.corresponding_declaration().unwrap().signature().unwrap(), "max(long, long)");
}

#[test]
fn bridge_methods_are_hidden() {
    let solver = runtime();
    let string = solver.solve_type("java.lang.String").unwrap();
    let compare_to: Vec<String> = string
        .declared_methods()
        .iter()
        .filter(|m| m.name() == "compareTo")
        .map(|m| m.signature().unwrap())
        .collect();
    assert_eq!(compare_to, vec!["compareTo(java.lang.String)".to_string()]);
}

#[test]
fn variadic_methods_accept_trailing_arguments() {
    let solver = session(Vec::new());
    let string = solver.solve_type("java.lang.String").unwrap();
    let args = [
        class_type(&solver, "java.lang.String"),
        class_type(&solver, "java.lang.Integer"),
        class_type(&solver, "java.lang.String"),
    ];
    let format = string.solve_method("format", &args, true).unwrap();
    let format = format.corresponding_declaration().unwrap();
    assert!(format.is_variadic());
    assert_eq!(format.signature().unwrap(), "format(java.lang.String, java.lang.Object[])");
}

#[test]
fn interfaces_fall_back_to_object_members() {
    let solver = runtime();
    let runnable = solver.solve_type("java.lang.Runnable").unwrap();
    assert!(runnable.ancestors().unwrap().is_empty());
    let object = solver.solve_type("java.lang.Object").unwrap();
    assert!(runnable.can_be_assigned_to(object.as_ref()));
}

#[test]
fn declarations_are_cached_per_solver() {
    let solver = runtime();
    let first = solver.solve_type("java.util.HashMap").unwrap();
    let second = solver.solve_type("java.util.HashMap").unwrap();
    assert!(Arc::ptr_eq(&first, &second));
}
