use std::collections::HashMap;
use std::sync::Arc;

use javasym_types::resolution::{
    find_most_applicable_method, is_applicable, match_type_parameters, solve_constructor, solve_method_in_type,
};
use javasym_types::synthetic::{MethodBuilder, TypeDeclarationBuilder};
use javasym_types::{MemoryTypeSolver, MethodDeclaration, ReferenceTypeDeclaration, ResolveError, Type, Wildcard};
use pretty_assertions::assert_eq;

use super::{jdk, reference, ty, types};

fn class_with(solver: &MemoryTypeSolver, methods: Vec<MethodBuilder>) -> Arc<dyn ReferenceTypeDeclaration> {
    let builder = methods
        .into_iter()
        .fold(TypeDeclarationBuilder::class("com.example.Calls"), |b, m| b.method(m));
    solver.define(builder).unwrap()
}

fn f(params: &[&str]) -> MethodBuilder {
    params
        .iter()
        .enumerate()
        .fold(MethodBuilder::new("f"), |m, (i, p)| m.param(format!("p{i}"), *p))
}

fn resolve(decl: &Arc<dyn ReferenceTypeDeclaration>, name: &str, args: &[Type]) -> Option<String> {
    decl.solve_method(name, args, false)
        .unwrap()
        .into_declaration()
        .map(|m| m.signature().unwrap())
}

#[test]
fn exact_primitive_match_beats_widening() {
    let solver = jdk();
    let decl = class_with(&solver, vec![f(&["long"]), f(&["int"])]);
    assert_eq!(resolve(&decl, "f", &types(&solver, &["int"])).as_deref(), Some("f(int)"));
    assert_eq!(resolve(&decl, "f", &types(&solver, &["short"])).as_deref(), Some("f(int)"));
    assert_eq!(resolve(&decl, "f", &types(&solver, &["long"])).as_deref(), Some("f(long)"));
}

#[test]
fn most_specific_reference_wins() {
    let solver = jdk();
    let decl = class_with(&solver, vec![f(&["java.lang.Object"]), f(&["java.lang.String"])]);
    assert_eq!(
        resolve(&decl, "f", &types(&solver, &["java.lang.String"])).as_deref(),
        Some("f(java.lang.String)")
    );
    assert_eq!(
        resolve(&decl, "f", &types(&solver, &["java.lang.Integer"])).as_deref(),
        Some("f(java.lang.Object)")
    );
}

#[test]
fn variadic_accepts_zero_one_or_an_array() {
    let solver = jdk();
    let decl = class_with(
        &solver,
        vec![MethodBuilder::new("f").varargs("xs", "java.lang.String"), f(&["int"])],
    );
    let expected = Some("f(java.lang.String[])");
    assert_eq!(resolve(&decl, "f", &[]).as_deref(), expected);
    assert_eq!(resolve(&decl, "f", &types(&solver, &["java.lang.String"])).as_deref(), expected);
    assert_eq!(resolve(&decl, "f", &types(&solver, &["java.lang.String[]"])).as_deref(), expected);
    assert_eq!(
        resolve(&decl, "f", &types(&solver, &["java.lang.String", "java.lang.String"])).as_deref(),
        expected
    );
    assert_eq!(resolve(&decl, "f", &types(&solver, &["int[]"])), None);
}

#[test]
fn variadic_component_is_the_first_trailing_argument() {
    let solver = jdk();
    let decl = class_with(&solver, vec![MethodBuilder::new("f").varargs("xs", "java.lang.String")]);
    // The trailing arguments are grouped as `String[]` from the first one alone.
    assert_eq!(
        resolve(&decl, "f", &types(&solver, &["java.lang.String", "java.lang.Integer"])).as_deref(),
        Some("f(java.lang.String[])")
    );
    assert_eq!(resolve(&decl, "f", &types(&solver, &["java.lang.Integer", "java.lang.String"])), None);
}

#[test]
fn incomparable_overloads_are_ambiguous() {
    let solver = jdk();
    let decl = class_with(
        &solver,
        vec![
            f(&["java.lang.Integer", "java.lang.Object"]),
            f(&["java.lang.Object", "java.lang.Integer"]),
        ],
    );
    let err = decl
        .solve_method("f", &types(&solver, &["java.lang.Integer", "java.lang.Integer"]), false)
        .unwrap_err();
    assert_eq!(
        err,
        ResolveError::Ambiguity {
            first: "com.example.Calls.f(java.lang.Integer, java.lang.Object)".to_string(),
            second: "com.example.Calls.f(java.lang.Object, java.lang.Integer)".to_string(),
        }
    );
}

#[test]
fn exact_match_breaks_a_tie() {
    let solver = jdk();
    let decl = class_with(&solver, vec![f(&["int"]), f(&["java.lang.Integer"])]);
    assert_eq!(resolve(&decl, "f", &types(&solver, &["int"])).as_deref(), Some("f(int)"));
    assert_eq!(
        resolve(&decl, "f", &types(&solver, &["java.lang.Integer"])).as_deref(),
        Some("f(java.lang.Integer)")
    );
}

#[test]
fn null_prefers_the_non_array_overload() {
    let solver = jdk();
    let decl = class_with(&solver, vec![f(&["char[]"]), f(&["java.lang.String"])]);
    assert_eq!(resolve(&decl, "f", &[Type::Null]).as_deref(), Some("f(java.lang.String)"));
}

#[test]
fn array_argument_prefers_the_fixed_arity_signature() {
    let solver = jdk();
    let decl = class_with(
        &solver,
        vec![
            MethodBuilder::new("f").param("a", "int").varargs("rest", "java.lang.Integer"),
            f(&["java.lang.Integer", "int[]"]),
        ],
    );
    assert_eq!(
        resolve(&decl, "f", &types(&solver, &["int", "int[]"])).as_deref(),
        Some("f(java.lang.Integer, int[])")
    );
    assert_eq!(
        resolve(&decl, "f", &types(&solver, &["int", "null"])).as_deref(),
        Some("f(int, java.lang.Integer[])")
    );
}

#[test]
fn matcher_checks_every_type_argument() {
    let solver = jdk();
    let decl = class_with(&solver, vec![f(&["java.util.Map<java.lang.String, java.lang.Integer>"])]);
    let args = types(&solver, &["java.util.HashMap<java.lang.String, java.lang.String>"]);
    assert_eq!(resolve(&decl, "f", &args), None);
    let args = types(&solver, &["java.util.HashMap<java.lang.String, java.lang.Integer>"]);
    assert!(resolve(&decl, "f", &args).is_some());

    let expected = reference(&solver, "java.util.Map<java.lang.String, java.lang.Integer>");
    let mut matched = HashMap::new();
    let mismatch = reference(&solver, "java.util.HashMap<java.lang.String, java.lang.String>");
    assert!(!match_type_parameters(&expected, &mismatch, &mut matched).unwrap());
}

#[test]
fn matcher_binds_type_variables_by_name() {
    let solver = jdk();
    let map = solver.handle().solve_type("java.util.Map").unwrap();
    let expected = javasym_types::ReferenceType::undetermined(map);
    let actual = reference(&solver, "java.util.HashMap<java.lang.String, java.lang.Long>");
    let mut matched = HashMap::new();
    assert!(match_type_parameters(&expected, &actual, &mut matched).unwrap());
    assert_eq!(matched.get("K"), Some(&ty(&solver, "java.lang.String")));
    assert_eq!(matched.get("V"), Some(&ty(&solver, "java.lang.Long")));
}

#[test]
fn generic_method_parameters_are_inferred_not_checked() {
    let solver = jdk();
    let decl = class_with(
        &solver,
        vec![MethodBuilder::new("id").type_param("T", &[]).param("t", "T").returns("T")],
    );
    for arg in ["int", "java.lang.String", "java.util.List<java.lang.Long>", "null"] {
        assert_eq!(resolve(&decl, "id", &types(&solver, &[arg])).as_deref(), Some("id(T)"), "{arg}");
    }
}

#[test]
fn bounded_type_variables_are_checked_through_their_bound() {
    let solver = jdk();
    let decl = solver
        .define(
            TypeDeclarationBuilder::class("com.example.Numbers")
                .type_param("N", &["java.lang.Number"])
                .method(MethodBuilder::new("add").param("items", "java.util.List<N>")),
        )
        .unwrap();
    let ok = types(&solver, &["java.util.List<java.lang.Integer>"]);
    assert!(resolve(&decl, "add", &ok).is_some());
}

#[test]
fn wildcard_arguments_need_the_tolerant_pass() {
    let solver = jdk();
    let decl = class_with(&solver, vec![f(&["java.lang.String"]), f(&["int"])]);
    let method = decl
        .declared_methods()
        .into_iter()
        .find(|m| m.signature().unwrap() == "f(java.lang.String)")
        .unwrap();
    let wildcard = [Type::wildcard(Wildcard::Unbounded)];
    assert!(!is_applicable(method.as_ref(), "f", &wildcard, false).unwrap());
    assert!(is_applicable(method.as_ref(), "f", &wildcard, true).unwrap());
    // A candidate that applies without tolerance does not pass the tolerant filter.
    let plain = types(&solver, &["java.lang.String"]);
    assert!(!is_applicable(method.as_ref(), "f", &plain, true).unwrap());

    assert_eq!(resolve(&decl, "f", &wildcard).as_deref(), Some("f(java.lang.String)"));
}

#[test]
fn inherited_and_object_methods_are_found() {
    let solver = jdk();
    let list = solver.handle().solve_type("java.util.ArrayList").unwrap();
    let size = list.solve_method("size", &[], false).unwrap().into_declaration().unwrap();
    assert_eq!(size.declaring_type().qualified_name(), "java.util.Collection");

    let iface = solver.handle().solve_type("java.util.List").unwrap();
    let to_string = solve_method_in_type(iface.as_ref(), "toString", &[], false)
        .unwrap()
        .into_declaration()
        .unwrap();
    assert_eq!(to_string.qualified_signature().unwrap(), "java.lang.Object.toString()");

    assert!(!list.solve_method("size", &[], true).unwrap().is_solved());
    assert!(!list.solve_method("missing", &[], false).unwrap().is_solved());
}

#[test]
fn static_varargs_on_a_library_type() {
    let solver = jdk();
    let string = solver.handle().solve_type("java.lang.String").unwrap();
    let args = types(&solver, &["java.lang.String", "int", "java.lang.String"]);
    let format = string.solve_method("format", &args, true).unwrap().into_declaration().unwrap();
    assert!(format.is_static());
    assert!(format.is_variadic());
}

#[test]
fn constructors_resolve_like_methods() {
    let solver = jdk();
    let list = solver.handle().solve_type("java.util.ArrayList").unwrap();
    let by_capacity = solve_constructor(list.as_ref(), &types(&solver, &["int"])).unwrap();
    assert_eq!(by_capacity.into_declaration().unwrap().param_count(), 1);

    let copy = solve_constructor(list.as_ref(), &types(&solver, &["java.util.List<java.lang.String>"]))
        .unwrap()
        .into_declaration()
        .unwrap();
    assert_eq!(copy.signature().unwrap(), "ArrayList(java.util.Collection<? extends E>)");

    assert!(!solve_constructor(list.as_ref(), &types(&solver, &["java.lang.String"]))
        .unwrap()
        .is_solved());
}

#[test]
fn duplicate_signatures_are_considered_once() {
    let solver = jdk();
    let decl = class_with(&solver, vec![f(&["int"])]);
    let method: Arc<dyn MethodDeclaration> = decl.declared_methods().remove(0);
    let candidates = vec![method.clone(), method];
    let found = find_most_applicable_method(&candidates, "f", &types(&solver, &["int"])).unwrap();
    assert!(found.is_solved());
}

#[test]
fn cyclic_hierarchies_fail_resolution() {
    let solver = jdk();
    solver
        .define(TypeDeclarationBuilder::class("com.example.A").extends("com.example.B"))
        .unwrap();
    let b = solver
        .define(TypeDeclarationBuilder::class("com.example.B").extends("com.example.A"))
        .unwrap();
    let err = b.solve_method("f", &[], false).unwrap_err();
    assert!(matches!(err, ResolveError::AncestorCycle(_)), "{err}");
}

#[test]
fn multi_bound_type_parameters_fail_the_whole_overload_set() {
    let solver = jdk();
    let single = solver
        .define(
            TypeDeclarationBuilder::class("com.example.Single")
                .type_param("T", &["java.lang.Number"])
                .method(f(&["java.util.List<T>"]))
                .method(f(&["java.lang.String"])),
        )
        .unwrap();
    let args = types(&solver, &["java.lang.String"]);
    assert_eq!(resolve(&single, "f", &args).as_deref(), Some("f(java.lang.String)"));

    let multi = solver
        .define(
            TypeDeclarationBuilder::class("com.example.Multi")
                .type_param("T", &["java.lang.Number", "java.lang.Comparable<T>"])
                .method(f(&["java.util.List<T>"]))
                .method(f(&["java.lang.String"])),
        )
        .unwrap();
    assert_eq!(
        multi.solve_method("f", &args, false).unwrap_err(),
        ResolveError::Unsupported("type parameter `com.example.Multi.T` with 2 bounds".to_string())
    );
}
