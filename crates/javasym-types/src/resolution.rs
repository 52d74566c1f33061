//! Method and constructor overload resolution.
//!
//! Candidates are filtered in two passes: first without wildcard tolerance,
//! then, only if nothing applied, with it. Survivors are reduced pairwise by
//! specificity; an exact parameter match breaks a tie between two incomparable
//! candidates of the same declaring type.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::decl::{
    ConstructorDeclaration, MethodDeclaration, MethodLikeDeclaration, ReferenceTypeDeclaration,
    TypeParameterDeclaration,
};
use crate::error::{ResolveError, Result};
use crate::reference::ReferenceType;
use crate::solver::SolverHandle;
use crate::symbol::SymbolReference;
use crate::ty::{Type, Wildcard, JAVA_LANG_OBJECT};

/// Whether `method` can be invoked as `name(args)`.
///
/// With `wildcard_tolerance`, a candidate only passes if it actually needed to
/// accept a wildcard argument.
pub fn is_applicable(
    method: &dyn MethodDeclaration,
    name: &str,
    args: &[Type],
    wildcard_tolerance: bool,
) -> Result<bool> {
    if method.name() != name {
        return Ok(false);
    }
    applicable(method, args, wildcard_tolerance)
}

pub fn is_constructor_applicable(
    constructor: &dyn ConstructorDeclaration,
    args: &[Type],
    wildcard_tolerance: bool,
) -> Result<bool> {
    applicable(constructor, args, wildcard_tolerance)
}

fn applicable<D>(candidate: &D, args: &[Type], wildcard_tolerance: bool) -> Result<bool>
where
    D: MethodLikeDeclaration + ?Sized,
{
    let params = candidate.params();
    let declaring = candidate.declaring_type();
    let solver = declaring.solver();
    let method_type_params = candidate.type_parameters();
    let mut args = args.to_vec();

    if candidate.is_variadic() {
        let pos = params.len() - 1;
        let declared = params[pos].ty()?;
        if params.len() == args.len() {
            let actual = args[pos].clone();
            if !declared.is_assignable_by(&actual) {
                let mut expected = declared.clone();
                for tp in &method_type_params {
                    expected = replace_type_param(&expected, tp.as_ref(), solver)?;
                }
                if !expected.is_assignable_by(&actual) {
                    match actual.as_array_component() {
                        Some(component) if expected.is_assignable_by(component) => {
                            args[pos] = component.clone();
                        }
                        _ => args = group_variadic_args(args, pos, &declared),
                    }
                }
            }
        } else {
            if pos > args.len() {
                return Ok(false);
            }
            args = group_variadic_args(args, pos, &declared);
        }
    }

    if params.len() != args.len() {
        return Ok(false);
    }

    let mut matched = HashMap::new();
    let mut needs_tolerance = false;
    let last = params.len().saturating_sub(1);
    for (i, (param, actual)) in params.iter().zip(&args).enumerate() {
        let expected = param.ty()?;
        if let Type::TypeVariable(tp) = &expected {
            if tp.declared_on_method() || tp.declared_on_constructor() {
                matched.insert(tp.name().to_string(), actual.clone());
                continue;
            }
        }

        let mut assignable = expected.is_assignable_by(actual)
            || (param.is_variadic() && Type::array(expected.clone()).is_assignable_by(actual));
        if !assignable {
            if let (Type::Reference(e), Type::Reference(a)) = (&expected, actual) {
                assignable = match_type_parameters(e, a, &mut matched)?;
            }
        }
        if assignable {
            continue;
        }

        let mut substituted = expected;
        for tp in method_type_params.iter().chain(&declaring.type_parameters()) {
            substituted = replace_type_param(&substituted, tp.as_ref(), solver)?;
        }
        if substituted.is_assignable_by(actual) {
            continue;
        }
        if actual.is_wildcard() && wildcard_tolerance && !substituted.is_primitive() {
            needs_tolerance = true;
            continue;
        }
        if candidate.is_variadic() && i == last && Type::array(substituted).is_assignable_by(actual) {
            continue;
        }
        return Ok(false);
    }
    Ok(!wildcard_tolerance || needs_tolerance)
}

/// Packs `args[start..]` into one array argument.
///
/// The component type is the first trailing argument's type; with no
/// trailing arguments the declared variadic type is used.
fn group_variadic_args(mut args: Vec<Type>, start: usize, declared: &Type) -> Vec<Type> {
    let trailing = args.split_off(start);
    match trailing.into_iter().next() {
        Some(first) => args.push(Type::array(first)),
        None => args.push(declared.clone()),
    }
    args
}

/// Replaces the type variable `tp` in `ty` with its single bound, or with
/// `java.lang.Object` when it has none.
pub fn replace_type_param(ty: &Type, tp: &dyn TypeParameterDeclaration, solver: &SolverHandle) -> Result<Type> {
    match ty {
        Type::TypeVariable(var) if var.name() == tp.name() => {
            let bounds = tp.bounds()?;
            match bounds.as_slice() {
                [] => Ok(Type::reference(ReferenceType::raw(solver.solve_type(JAVA_LANG_OBJECT)?))),
                [bound] => Ok(bound.ty().clone()),
                _ => Err(ResolveError::Unsupported(format!(
                    "type parameter `{}` with {} bounds",
                    tp.qualified_name(),
                    bounds.len()
                ))),
            }
        }
        Type::TypeVariable(_) | Type::Primitive(_) | Type::Wildcard(_) => Ok(ty.clone()),
        Type::Array(array) => {
            let component = replace_type_param(array.component(), tp, solver)?;
            Ok(if component.same_instance(array.component()) {
                ty.clone()
            } else {
                Type::array(component)
            })
        }
        Type::Reference(reference) => {
            let replaced = reference.transform_type_arguments(|arg| replace_type_param(arg, tp, solver))?;
            Ok(if replaced == **reference {
                ty.clone()
            } else {
                Type::reference(replaced)
            })
        }
        Type::Null | Type::Void | Type::LambdaConstraint(_) => Err(ResolveError::Unsupported(format!(
            "replacing `{}` in {}",
            tp.name(),
            ty.describe()
        ))),
    }
}

/// Matches `actual`, or one of its ancestors, against `expected`, binding
/// the type variables of `expected` by name in `matched`.
pub fn match_type_parameters(
    expected: &ReferenceType,
    actual: &ReferenceType,
    matched: &mut HashMap<String, Type>,
) -> Result<bool> {
    if expected.qualified_name() == actual.qualified_name() {
        return match_same_name(expected, actual, matched);
    }
    for ancestor in actual.all_ancestors()? {
        if match_same_name(expected, &ancestor, matched)? {
            return Ok(true);
        }
    }
    Ok(false)
}

fn match_same_name(
    expected: &ReferenceType,
    actual: &ReferenceType,
    matched: &mut HashMap<String, Type>,
) -> Result<bool> {
    if expected.qualified_name() != actual.qualified_name() {
        return Ok(false);
    }
    let expected_args: Vec<&Type> = expected.type_arguments().collect();
    let actual_args: Vec<&Type> = actual.type_arguments().collect();
    if expected_args.is_empty() || actual_args.is_empty() {
        return Ok(true);
    }
    if expected_args.len() != actual_args.len() {
        return Err(ResolveError::Unsupported(format!(
            "matching {} against {}",
            expected.describe(),
            actual.describe()
        )));
    }
    for (expected_arg, actual_arg) in expected_args.into_iter().zip(actual_args) {
        let ok = match expected_arg {
            Type::Reference(e) => match actual_arg {
                Type::Reference(a) => match_same_name(e, a, matched)?,
                _ => false,
            },
            Type::TypeVariable(tp) => match_variable(tp.name(), actual_arg, matched),
            Type::Array(_) => expected_arg == actual_arg,
            Type::Wildcard(w) => match &**w {
                Wildcard::Extends(bound) => match_bound(bound, actual_arg, matched)?,
                Wildcard::Super(_) | Wildcard::Unbounded => true,
            },
            other => {
                return Err(ResolveError::Unsupported(format!(
                    "type argument {} in {}",
                    other.describe(),
                    expected.describe()
                )))
            }
        };
        if !ok {
            return Ok(false);
        }
    }
    Ok(true)
}

fn match_bound(bound: &Type, actual: &Type, matched: &mut HashMap<String, Type>) -> Result<bool> {
    match (bound, actual) {
        (Type::Reference(b), Type::Reference(a)) => match_type_parameters(b, a, matched),
        (Type::TypeVariable(tp), _) => Ok(match_variable(tp.name(), actual, matched)),
        _ => Ok(bound.is_assignable_by(actual)),
    }
}

fn match_variable(name: &str, actual: &Type, matched: &mut HashMap<String, Type>) -> bool {
    if let Type::TypeVariable(var) = actual {
        if var.name() == name {
            return true;
        }
    }
    match matched.get(name) {
        Some(previous) if previous.is_assignable_by(actual) => true,
        Some(previous) if actual.is_assignable_by(previous) => {
            matched.insert(name.to_string(), actual.clone());
            true
        }
        Some(_) => false,
        None => {
            matched.insert(name.to_string(), actual.clone());
            true
        }
    }
}

/// Whether `a` is more specific than `b` for a call with `args`.
pub fn is_more_specific<D>(a: &D, b: &D, args: &[Type]) -> Result<bool>
where
    D: MethodLikeDeclaration + ?Sized,
{
    let (count_a, count_b) = (a.param_count(), b.param_count());
    if count_a < count_b {
        return Ok(true);
    }
    if count_a > count_b {
        return Ok(false);
    }
    let mut one_more_specific = false;
    for i in 0..count_a {
        let ta = a.param_type(i)?;
        let tb = b.param_type(i)?;
        if tb.is_assignable_by(&ta) && !ta.is_assignable_by(&tb) {
            one_more_specific = true;
        }
        if ta.is_assignable_by(&tb) && !tb.is_assignable_by(&ta) {
            return Ok(false);
        }
    }
    if !one_more_specific {
        if let Some(last) = args.last() {
            // An array argument favours the fixed-arity signature.
            let last_is_array = last.is_array();
            if a.is_variadic() && !b.is_variadic() {
                return Ok(!last_is_array);
            }
            if !a.is_variadic() && b.is_variadic() {
                return Ok(last_is_array);
            }
        }
    }
    Ok(one_more_specific)
}

/// Every parameter type equals the corresponding argument type.
pub fn is_exact_match<D>(candidate: &D, args: &[Type]) -> Result<bool>
where
    D: MethodLikeDeclaration + ?Sized,
{
    if candidate.param_count() != args.len() {
        return Ok(false);
    }
    for (i, arg) in args.iter().enumerate() {
        if candidate.param_type(i)? != *arg {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Picks the most applicable method called `name` for `args`.
///
/// Candidates are expected in lookup order: own methods first, inherited
/// ones later.
pub fn find_most_applicable_method(
    candidates: &[Arc<dyn MethodDeclaration>],
    name: &str,
    args: &[Type],
) -> Result<SymbolReference<Arc<dyn MethodDeclaration>>> {
    most_applicable(candidates, args, |m, tolerance| {
        is_applicable(m.as_ref(), name, args, tolerance)
    })
}

pub fn find_most_applicable_constructor(
    candidates: &[Arc<dyn ConstructorDeclaration>],
    args: &[Type],
) -> Result<SymbolReference<Arc<dyn ConstructorDeclaration>>> {
    most_applicable(candidates, args, |c, tolerance| {
        is_constructor_applicable(c.as_ref(), args, tolerance)
    })
}

fn most_applicable<D>(
    candidates: &[Arc<D>],
    args: &[Type],
    applies: impl Fn(&Arc<D>, bool) -> Result<bool>,
) -> Result<SymbolReference<Arc<D>>>
where
    D: MethodLikeDeclaration + ?Sized,
{
    let candidates = without_duplicates(candidates)?;
    let mut applicable = Vec::new();
    for tolerance in [false, true] {
        for candidate in &candidates {
            if applies(candidate, tolerance)? {
                applicable.push(candidate.clone());
            }
        }
        if !applicable.is_empty() {
            break;
        }
    }
    if applicable.is_empty() {
        return Ok(SymbolReference::unsolved());
    }

    if applicable.len() > 1 {
        drop_array_overloads_for_null(&mut applicable, args)?;
    }

    let mut winner = applicable[0].clone();
    let mut other = None;
    let mut possible_ambiguity = false;
    for candidate in &applicable[1..] {
        other = Some(candidate.clone());
        if is_more_specific(winner.as_ref(), candidate.as_ref(), args)? {
            possible_ambiguity = false;
        } else if is_more_specific(candidate.as_ref(), winner.as_ref(), args)? {
            possible_ambiguity = false;
            winner = candidate.clone();
        } else if winner.declaring_type().qualified_name() == candidate.declaring_type().qualified_name() {
            possible_ambiguity = true;
        }
    }

    if possible_ambiguity && !is_exact_match(winner.as_ref(), args)? {
        if let Some(other) = other {
            if is_exact_match(other.as_ref(), args)? {
                return Ok(SymbolReference::solved(other));
            }
            return Err(ResolveError::Ambiguity {
                first: winner.qualified_signature()?,
                second: other.qualified_signature()?,
            });
        }
    }
    Ok(SymbolReference::solved(winner))
}

/// Keeps the first candidate per qualified signature.
fn without_duplicates<D>(candidates: &[Arc<D>]) -> Result<Vec<Arc<D>>>
where
    D: MethodLikeDeclaration + ?Sized,
{
    let mut seen = HashSet::new();
    let mut out = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        if seen.insert(candidate.qualified_signature()?) {
            out.push(candidate.clone());
        }
    }
    Ok(out)
}

/// For a `null` argument, prefers overloads whose parameter there is not an
/// array, as long as at least one such overload remains.
fn drop_array_overloads_for_null<D>(applicable: &mut Vec<Arc<D>>, args: &[Type]) -> Result<()>
where
    D: MethodLikeDeclaration + ?Sized,
{
    let null_indexes: Vec<usize> = args
        .iter()
        .enumerate()
        .filter(|(_, arg)| arg.is_null())
        .map(|(i, _)| i)
        .collect();
    if null_indexes.is_empty() {
        return Ok(());
    }
    let mut remove = vec![false; applicable.len()];
    for &index in &null_indexes {
        for (slot, candidate) in remove.iter_mut().zip(applicable.iter()) {
            if index < candidate.param_count() && candidate.param_type(index)?.is_array() {
                *slot = true;
            }
        }
    }
    let removed = remove.iter().filter(|r| **r).count();
    if removed > 0 && removed < applicable.len() {
        let mut flags = remove.into_iter();
        applicable.retain(|_| !flags.next().unwrap_or(false));
    }
    Ok(())
}

/// Resolves `name(args)` against the methods visible in `decl`.
///
/// Own methods come first, then the result of resolving against each direct
/// ancestor; interfaces also see the methods of `java.lang.Object`.
pub fn solve_method_in_type(
    decl: &dyn ReferenceTypeDeclaration,
    name: &str,
    args: &[Type],
    static_only: bool,
) -> Result<SymbolReference<Arc<dyn MethodDeclaration>>> {
    let visible = |m: &Arc<dyn MethodDeclaration>| m.name() == name && (!static_only || m.is_static());
    let mut candidates: Vec<Arc<dyn MethodDeclaration>> =
        decl.declared_methods().into_iter().filter(|m| visible(m)).collect();

    // Fails on cyclic hierarchies before recursing into them.
    decl.all_ancestors()?;
    for ancestor in decl.ancestors()? {
        if ancestor.qualified_name() == decl.qualified_name() {
            continue;
        }
        let inherited = ancestor.declaration().solve_method(name, args, static_only)?;
        if let Some(method) = inherited.into_declaration() {
            candidates.push(method);
        }
    }
    if decl.is_interface() {
        let object = decl.solver().solve_type(JAVA_LANG_OBJECT)?;
        candidates.extend(object.declared_methods().into_iter().filter(|m| visible(m)));
    }

    tracing::trace!(
        target: "javasym.resolution",
        ty = decl.qualified_name(),
        name,
        candidates = candidates.len(),
        "resolving method"
    );
    find_most_applicable_method(&candidates, name, args)
}

/// Resolves `new T(args)` against the constructors of `decl`.
pub fn solve_constructor(
    decl: &dyn ReferenceTypeDeclaration,
    args: &[Type],
) -> Result<SymbolReference<Arc<dyn ConstructorDeclaration>>> {
    find_most_applicable_constructor(&decl.constructors(), args)
}
