mod error;
mod logging;
mod render;

use std::path::{Path, PathBuf};

use bg_components::{ComponentRegistry, ParamPolicy};
use bg_compose::{ComposeOptions, Composer, IsolationPolicy};
use bg_graph::Composite;
use clap::{Args, Parser, Subcommand};

use crate::error::CliResult;
use crate::render::BuildReport;

#[derive(Parser)]
#[command(name = "bg-cli")]
#[command(about = "Bond-graph composer - build hierarchical models from JSON/YAML specs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check spec syntax and schema without building
    Validate {
        /// Path to the spec file (.json, .yaml, .yml)
        spec_path: PathBuf,
    },
    /// Build a spec and print a summary
    Build {
        #[command(flatten)]
        build: BuildArgs,
        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the built composite hierarchy
    Tree {
        #[command(flatten)]
        build: BuildArgs,
    },
    /// Print qualified leaves and bonds resolved down to leaf ports
    Flatten {
        #[command(flatten)]
        build: BuildArgs,
    },
    /// List registered component kinds
    Kinds,
}

#[derive(Args)]
struct BuildArgs {
    /// Path to the spec file (.json, .yaml, .yml)
    spec_path: PathBuf,
    /// Ignore unknown component parameters instead of rejecting them
    #[arg(long)]
    lenient_params: bool,
    /// Policy for components that are neither connected nor exposed (allow, warn, deny)
    #[arg(long, default_value = "warn")]
    isolated: IsolationPolicy,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run() -> CliResult<()> {
    logging::init()?;
    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { spec_path } => cmd_validate(&spec_path),
        Commands::Build { build, json } => cmd_build(&build, json),
        Commands::Tree { build } => cmd_tree(&build),
        Commands::Flatten { build } => cmd_flatten(&build),
        Commands::Kinds => cmd_kinds(),
    }
}

fn cmd_validate(spec_path: &Path) -> CliResult<()> {
    println!("Validating spec: {}", spec_path.display());
    let spec = bg_spec::load_path(spec_path)?;
    println!(
        "✓ Spec '{}' is valid ({} components, {} connections, {} exposed ports)",
        spec.name,
        spec.components.len(),
        spec.connections.len(),
        spec.exposed_ports.len()
    );
    Ok(())
}

fn cmd_build(args: &BuildArgs, json: bool) -> CliResult<()> {
    let composite = build(args)?;
    let report = BuildReport::new(&composite);
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("✓ {}", report.to_text());
    }
    Ok(())
}

fn cmd_tree(args: &BuildArgs) -> CliResult<()> {
    let composite = build(args)?;
    print!("{}", render::tree(&composite));
    Ok(())
}

fn cmd_flatten(args: &BuildArgs) -> CliResult<()> {
    let composite = build(args)?;
    let model = bg_graph::flatten(&composite)?;
    print!("{}", render::flat(&model));
    Ok(())
}

fn cmd_kinds() -> CliResult<()> {
    print!("{}", render::kinds(&ComponentRegistry::with_builtins()));
    Ok(())
}

fn build(args: &BuildArgs) -> CliResult<Composite> {
    let spec = bg_spec::load_path(&args.spec_path)?;
    let policy = if args.lenient_params {
        ParamPolicy::Lenient
    } else {
        ParamPolicy::Strict
    };
    let registry = ComponentRegistry::with_builtins().with_policy(policy);
    let options = ComposeOptions::default().with_isolation(args.isolated);
    tracing::info!(
        spec = %args.spec_path.display(),
        isolated = args.isolated.label(),
        "building"
    );
    Ok(Composer::new(&registry).with_options(options).build(&spec)?)
}
