use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context as _, Result};
use clap::{Args, Parser, Subcommand};
use javasym_config::SolverConfig;
use javasym_types::{
    type_from_syntax, MethodDeclaration, ReferenceType, ReferenceTypeDeclaration, ResolveError, Type,
    TypeDeclaration, TypeSolver,
};
use serde::Serialize;

#[derive(Parser)]
#[command(name = "javasym", version, about = "Resolve Java types and method calls against jars and source trees")]
struct Cli {
    #[command(flatten)]
    session: SessionArgs,
    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct SessionArgs {
    /// TOML session config (jars, source roots, runtime, logging)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Class-file archive to resolve against; repeatable
    #[arg(long = "jar", global = true)]
    jars: Vec<PathBuf>,
    /// Root of a package-structured source tree; repeatable
    #[arg(long = "source", global = true)]
    sources: Vec<PathBuf>,
    /// Emit JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Print the declaration a qualified name resolves to
    SolveType {
        /// Qualified type name, nested types joined with `.`
        name: String,
    },
    /// Pick the overload of a method that a call with the given argument types selects
    SolveMethod {
        /// Qualified name of the receiver type
        type_name: String,
        /// Method name
        name: String,
        /// Argument types in source syntax (`int`, `java.lang.String`, `int[]`, `null`)
        arg_types: Vec<String>,
    },
    /// Print every supertype of a type, `java.lang.Object` last
    Ancestors {
        /// Qualified type name
        name: String,
    },
}

fn main() {
    let cli = Cli::parse();
    let exit_code = match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{:#}", err);
            2
        }
    };

    std::process::exit(exit_code);
}

fn run(cli: Cli) -> Result<i32> {
    let config = session_config(&cli.session)?;
    javasym_config::init_tracing(&config.logging);
    let solver = config.build_solver().context("failed to build the solver tree")?;
    let root: Arc<dyn TypeSolver> = solver;

    match query(cli.command, &root, cli.session.json) {
        Err(err) => match err.downcast_ref::<ResolveError>() {
            Some(failed @ (ResolveError::Unsolved { .. } | ResolveError::Ambiguity { .. })) => {
                eprintln!("{failed}");
                Ok(1)
            }
            _ => Err(err),
        },
        answered => answered,
    }
}

/// Answers one command. Unsolved names and ambiguous calls come back as
/// `ResolveError`s so `run` can report them as failed queries.
fn query(command: Command, root: &Arc<dyn TypeSolver>, json: bool) -> Result<i32> {
    match command {
        Command::SolveType { name } => {
            let Some(decl) = root.try_to_solve_type(&name).into_declaration() else {
                eprintln!("unsolved type `{name}`");
                return Ok(1);
            };
            print_output(&TypeReport::new(decl.as_ref())?, json)?;
            Ok(0)
        }
        Command::SolveMethod {
            type_name,
            name,
            arg_types,
        } => {
            let decl = root.solve_type(&type_name)?;
            let args = arg_types
                .iter()
                .map(|text| parse_arg_type(text, root))
                .collect::<Result<Vec<_>>>()?;
            match decl.solve_method(&name, &args, false)?.into_declaration() {
                Some(method) => {
                    print_output(&MethodReport::new(method.as_ref())?, json)?;
                    Ok(0)
                }
                None => {
                    let described: Vec<String> = args.iter().map(Type::describe).collect();
                    eprintln!("no method {type_name}.{name} accepts ({})", described.join(", "));
                    Ok(1)
                }
            }
        }
        Command::Ancestors { name } => {
            let decl = root.solve_type(&name)?;
            let ancestors: Vec<String> = ReferenceType::undetermined(decl)
                .all_ancestors()?
                .iter()
                .map(ReferenceType::describe)
                .collect();
            print_output(&ancestors, json)?;
            Ok(0)
        }
    }
}

/// The config file, if any, with the command-line archives and source roots
/// appended after its own.
fn session_config(args: &SessionArgs) -> Result<SolverConfig> {
    let mut config = match &args.config {
        Some(path) => SolverConfig::load(path).with_context(|| format!("failed to load {}", path.display()))?,
        None => SolverConfig::default(),
    };
    config.jars.extend(args.jars.iter().cloned());
    config.source_roots.extend(args.sources.iter().cloned());
    Ok(config)
}

/// Simple names not found as written are retried under `java.lang`.
fn parse_arg_type(text: &str, root: &Arc<dyn TypeSolver>) -> Result<Type> {
    if text.trim() == "null" {
        return Ok(Type::Null);
    }
    let syntax = javasym_syntax::parse_type_ref(text).with_context(|| format!("`{text}` is not a type"))?;
    let resolve = |name: &str| -> javasym_types::Result<TypeDeclaration> {
        let found = root
            .try_to_solve_type(name)
            .into_declaration()
            .or_else(|| root.try_to_solve_type(&format!("java.lang.{name}")).into_declaration())
            .ok_or_else(|| ResolveError::unsolved(name))?;
        Ok(TypeDeclaration::Reference(found))
    };
    Ok(type_from_syntax(&syntax, &resolve)?)
}

#[derive(Serialize)]
struct TypeReport {
    qualified_name: String,
    kind: &'static str,
    origin: &'static str,
    type_parameters: Vec<String>,
    ancestors: Vec<String>,
}

impl TypeReport {
    fn new(decl: &dyn ReferenceTypeDeclaration) -> Result<Self> {
        Ok(Self {
            qualified_name: decl.qualified_name().to_string(),
            kind: decl.kind().as_str(),
            origin: decl.origin().as_str(),
            type_parameters: decl.type_parameters().iter().map(|tp| tp.name().to_string()).collect(),
            ancestors: decl.ancestors()?.iter().map(ReferenceType::describe).collect(),
        })
    }
}

#[derive(Serialize)]
struct MethodReport {
    signature: String,
    declaring_type: String,
    return_type: String,
    is_static: bool,
    is_variadic: bool,
}

impl MethodReport {
    fn new(method: &dyn MethodDeclaration) -> Result<Self> {
        Ok(Self {
            signature: method.signature()?,
            declaring_type: method.declaring_type().qualified_name().to_string(),
            return_type: method.return_type()?.describe(),
            is_static: method.is_static(),
            is_variadic: method.is_variadic(),
        })
    }
}

fn print_output<T: Serialize + 'static>(value: &T, json: bool) -> Result<()> {
    if json {
        let out = serde_json::to_string_pretty(value)?;
        println!("{out}");
        return Ok(());
    }
    // Human output for the report types; anything else falls back to pretty JSON.
    let any = value as &dyn std::any::Any;
    if let Some(report) = any.downcast_ref::<TypeReport>() {
        let params = if report.type_parameters.is_empty() {
            String::new()
        } else {
            format!("<{}>", report.type_parameters.join(", "))
        };
        println!("{}{params} ({}, {})", report.qualified_name, report.kind, report.origin);
        for ancestor in &report.ancestors {
            println!("  extends {ancestor}");
        }
    } else if let Some(report) = any.downcast_ref::<MethodReport>() {
        let modifier = if report.is_static { "static " } else { "" };
        println!(
            "{modifier}{} {}.{}",
            report.return_type, report.declaring_type, report.signature
        );
    } else if let Some(lines) = any.downcast_ref::<Vec<String>>() {
        for line in lines {
            println!("{line}");
        }
    } else {
        println!("{}", serde_json::to_string_pretty(value)?);
    }
    Ok(())
}
