use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use typebind_config::{init_tracing, load_for_root, TypebindConfig};
use typebind_resolve::{GenericTypeResolver, ResolvedType};
use typebind_signature::{parse_type_ref, TypeStoreLoader, TypeTable};
use typebind_types::{
    format_type, simple_name, ClassId, ClassKind, Type, TypeEnv, TypeStore, TypeVarId,
};

#[derive(Parser)]
#[command(
    name = "typebind",
    version,
    about = "Resolve generic type parameters of fields and methods for a concrete type"
)]
struct Cli {
    #[command(flatten)]
    table: TableArgs,
    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct TableArgs {
    /// Config file (defaults to `typebind.toml` discovery in the current directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Additional type table to load (repeatable)
    #[arg(long = "table", global = true)]
    tables: Vec<PathBuf>,
    /// Do not pre-register the minimal JDK classes
    #[arg(long, global = true)]
    no_jdk: bool,
    /// Intern classes that tables reference but never declare
    #[arg(long, global = true)]
    allow_unknown: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Print the type variable bindings of a concrete type
    Map(TypeArgs),
    /// Resolve the declared type of a field
    Field(MemberArgs),
    /// Resolve the parameter and return types of a method
    Method(MemberArgs),
    /// List the classes in the loaded tables
    Classes(JsonArgs),
}

#[derive(Args)]
struct TypeArgs {
    /// Class or parameterized type, e.g. `StringIntegerType` or `Pair<String, Integer>`
    #[arg(value_name = "TYPE")]
    ty: String,
    /// Emit JSON suitable for CI
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct MemberArgs {
    /// Class or parameterized type, e.g. `StringIntegerType` or `Pair<String, Integer>`
    #[arg(value_name = "TYPE")]
    ty: String,
    /// Member name, searched on the type and its supertypes
    name: String,
    /// Emit JSON suitable for CI
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct JsonArgs {
    /// Emit JSON suitable for CI
    #[arg(long)]
    json: bool,
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
    let config = load_config(&cli.table)?;
    init_tracing(&config.logging);
    let store = load_store(&config, &cli.table)?;

    match cli.command {
        Command::Map(args) => {
            let ty = parse_handle(&store, &args.ty)?;
            let resolver = GenericTypeResolver::new(&store, &ty)?;
            let report = MapReport {
                ty: format_type(&store, &ty),
                bindings: resolver
                    .substitution()
                    .iter()
                    .map(|(var, bound)| BindingReport {
                        var: type_var_name(&store, var),
                        ty: format_type(&store, bound),
                    })
                    .collect(),
            };
            print_output(&report, args.json)?;
        }
        Command::Field(args) => {
            let ty = parse_handle(&store, &args.ty)?;
            let resolver = GenericTypeResolver::new(&store, &ty)?;
            let field = resolver.lookup_field(&store, &args.name)?;
            let resolved = resolver.resolve_field(&field.def.ty);
            let report = FieldReport {
                owner: class_name(&store, field.owner),
                field: args.name,
                ty: ResolvedReport::new(&store, &resolved),
            };
            print_output(&report, args.json)?;
        }
        Command::Method(args) => {
            let ty = parse_handle(&store, &args.ty)?;
            let resolver = GenericTypeResolver::new(&store, &ty)?;
            let method = resolver.lookup_method(&store, &args.name)?;
            let sig =
                resolver.resolve_method(&method.def.params, method.def.return_type.as_ref());
            let report = MethodReport {
                owner: class_name(&store, method.owner),
                method: args.name,
                params: sig
                    .params
                    .iter()
                    .map(|param| ResolvedReport::new(&store, param))
                    .collect(),
                return_type: sig
                    .return_type
                    .as_ref()
                    .map(|ret| ResolvedReport::new(&store, ret)),
            };
            print_output(&report, args.json)?;
        }
        Command::Classes(args) => {
            let mut classes: Vec<_> = store
                .classes()
                .filter(|(_, def)| def.kind != ClassKind::Primitive)
                .map(|(id, def)| ClassReport {
                    name: def.name.clone(),
                    kind: def.kind,
                    type_params: store
                        .type_params(id)
                        .iter()
                        .filter_map(|tv| store.type_param(*tv))
                        .map(|tp| tp.name.clone())
                        .collect(),
                })
                .collect();
            classes.sort_by(|a, b| a.name.cmp(&b.name));
            print_output(&ClassesReport { classes }, args.json)?;
        }
    }
    Ok(0)
}

fn load_config(args: &TableArgs) -> Result<TypebindConfig> {
    match &args.config {
        Some(path) => TypebindConfig::load_from_path(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => {
            let cwd = std::env::current_dir().context("failed to determine current directory")?;
            let (config, _path) = load_for_root(&cwd)?;
            Ok(config)
        }
    }
}

fn load_store(config: &TypebindConfig, args: &TableArgs) -> Result<TypeStore> {
    let mut store = if config.table.minimal_jdk && !args.no_jdk {
        TypeStore::with_minimal_jdk()
    } else {
        TypeStore::default()
    };
    let allow_unknown = config.table.allow_unknown || args.allow_unknown;

    let mut table = TypeTable::default();
    for path in config.table.paths.iter().chain(&args.tables) {
        let loaded = TypeTable::load_from_path(path)
            .with_context(|| format!("failed to load type table {}", path.display()))?;
        table.extend(loaded);
    }
    // One table so forward references may cross files.
    let ids = TypeStoreLoader::new(&mut store)
        .allow_unknown(allow_unknown)
        .load_table(&table)?;
    tracing::debug!(classes = ids.len(), "loaded type tables");
    Ok(store)
}

fn parse_handle(store: &TypeStore, text: &str) -> Result<Type> {
    parse_type_ref(store, text).with_context(|| format!("failed to parse type `{text}`"))
}

fn class_name(store: &TypeStore, id: ClassId) -> String {
    store
        .class_name(id)
        .map(|name| simple_name(name).replace('$', "."))
        .unwrap_or_else(|| format!("<class#{}>", id.to_raw()))
}

/// `Owner.Name`, e.g. `GenericType.L`.
fn type_var_name(store: &TypeStore, var: TypeVarId) -> String {
    match store.type_param(var) {
        Some(tp) => format!("{}.{}", class_name(store, tp.owner), tp.name),
        None => format!("<tv#{}>", var.to_raw()),
    }
}

#[derive(Serialize)]
struct MapReport {
    #[serde(rename = "type")]
    ty: String,
    bindings: Vec<BindingReport>,
}

#[derive(Serialize)]
struct BindingReport {
    var: String,
    #[serde(rename = "type")]
    ty: String,
}

#[derive(Serialize)]
struct ResolvedReport {
    declared: String,
    /// `None` for non-generic types.
    args: Option<Vec<String>>,
    display: String,
}

impl ResolvedReport {
    fn new(store: &TypeStore, resolved: &ResolvedType) -> Self {
        Self {
            declared: format_type(store, &resolved.ty),
            args: resolved
                .args
                .as_ref()
                .map(|args| args.iter().map(|arg| format_type(store, arg)).collect()),
            display: resolved.display(store).to_string(),
        }
    }
}

#[derive(Serialize)]
struct FieldReport {
    owner: String,
    field: String,
    #[serde(rename = "type")]
    ty: ResolvedReport,
}

#[derive(Serialize)]
struct MethodReport {
    owner: String,
    method: String,
    params: Vec<ResolvedReport>,
    /// `None` for `void`.
    return_type: Option<ResolvedReport>,
}

#[derive(Serialize)]
struct ClassReport {
    name: String,
    kind: ClassKind,
    type_params: Vec<String>,
}

#[derive(Serialize)]
struct ClassesReport {
    classes: Vec<ClassReport>,
}

fn print_output<T: Serialize + 'static>(value: &T, json: bool) -> Result<()> {
    if json {
        let out = serde_json::to_string_pretty(value)?;
        println!("{out}");
        return Ok(());
    }

    // Human output for report types. Everything else falls back to pretty JSON.
    let any = value as &dyn std::any::Any;
    if let Some(report) = any.downcast_ref::<MapReport>() {
        println!("{}:", report.ty);
        if report.bindings.is_empty() {
            println!("  (no bindings)");
        }
        for binding in &report.bindings {
            println!("  {} = {}", binding.var, binding.ty);
        }
    } else if let Some(report) = any.downcast_ref::<FieldReport>() {
        println!("{}.{}: {}", report.owner, report.field, report.ty.display);
    } else if let Some(report) = any.downcast_ref::<MethodReport>() {
        println!("{}.{}", report.owner, report.method);
        for (idx, param) in report.params.iter().enumerate() {
            println!("  param {idx}: {}", param.display);
        }
        match &report.return_type {
            Some(ret) => println!("  returns: {}", ret.display),
            None => println!("  returns: void"),
        }
    } else if let Some(report) = any.downcast_ref::<ClassesReport>() {
        for class in &report.classes {
            let kind = match class.kind {
                ClassKind::Class => "class",
                ClassKind::Interface => "interface",
                ClassKind::Primitive => "primitive",
            };
            if class.type_params.is_empty() {
                println!("{kind} {}", class.name);
            } else {
                println!("{kind} {}<{}>", class.name, class.type_params.join(", "));
            }
        }
    } else {
        let out = serde_json::to_string_pretty(value)?;
        println!("{out}");
    }
    Ok(())
}
