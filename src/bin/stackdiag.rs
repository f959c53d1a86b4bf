use std::{
    io::Write as _,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "stackdiag", version)]
struct Cli {
    /// Log at debug level.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Lay out a diagram document and write the geometry as JSON.
    Build(BuildArgs),
    /// Validate and lay out a diagram document without writing output.
    Check(CheckArgs),
}

#[derive(Parser, Debug)]
struct BuildArgs {
    /// Input diagram JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output JSON path (stdout when omitted).
    #[arg(long)]
    out: Option<PathBuf>,

    /// Write compact JSON instead of pretty-printed.
    #[arg(long)]
    compact: bool,
}

#[derive(Parser, Debug)]
struct CheckArgs {
    /// Input diagram JSON.
    #[arg(long = "in")]
    in_path: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Build(args) => cmd_build(args),
        Command::Check(args) => cmd_check(args),
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn load_diagram(path: &Path) -> anyhow::Result<stackdiag::Diagram> {
    let doc = stackdiag::DiagramDoc::from_path(path)
        .with_context(|| format!("load diagram '{}'", path.display()))?;
    let diagram = doc
        .build()
        .with_context(|| format!("lay out diagram '{}'", path.display()))?;
    Ok(diagram)
}

fn cmd_build(args: BuildArgs) -> anyhow::Result<()> {
    let diagram = load_diagram(&args.in_path)?;
    let json = if args.compact {
        diagram.to_json()?
    } else {
        diagram.to_json_pretty()?
    };

    match &args.out {
        Some(out) => {
            if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("create output dir '{}'", parent.display()))?;
            }
            std::fs::write(out, json.as_bytes())
                .with_context(|| format!("write layout '{}'", out.display()))?;
            tracing::info!(elements = diagram.elements.len(), "wrote {}", out.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(json.as_bytes())?;
            stdout.write_all(b"\n")?;
        }
    }
    Ok(())
}

fn cmd_check(args: CheckArgs) -> anyhow::Result<()> {
    let diagram = load_diagram(&args.in_path)?;
    let b = diagram.bounds;
    println!(
        "{}: {} elements, bounds [{:.3}, {:.3}] - [{:.3}, {:.3}]",
        args.in_path.display(),
        diagram.elements.len(),
        b.x0,
        b.y0,
        b.x1,
        b.y1
    );
    Ok(())
}
