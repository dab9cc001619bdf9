//! Print the directory tree below a path
//!
//! Usage: `treewalk <dir> [--sequential] [--threads N]`
//!
//! Set `RUST_LOG=debug` to see each directory as it is expanded.

use std::env;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{anyhow, bail, Context, Result};
use labeled_tree::Tree;
use log::{error, info};
use tree_builder::{BuilderOptions, FsSource, TreeBuilder};

struct Args {
    root: PathBuf,
    options: BuilderOptions,
}

fn parse_args(args: &[String]) -> Result<Args> {
    let mut root = None;
    let mut options = BuilderOptions::new();

    let mut args = args.iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--sequential" => options = options.sequential(),
            "--threads" => {
                let value = args.next().ok_or_else(|| anyhow!("--threads needs a value"))?;
                let threads = value
                    .parse::<usize>()
                    .with_context(|| format!("Invalid thread count: {value}"))?;
                options = options.threads(threads);
            }
            flag if flag.starts_with("--") => bail!("Unknown option: {flag}"),
            path if root.is_none() => root = Some(PathBuf::from(path)),
            extra => bail!("Unexpected argument: {extra}"),
        }
    }

    let root = root.ok_or_else(|| anyhow!("usage: treewalk <dir> [--sequential] [--threads N]"))?;
    Ok(Args { root, options })
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

/// Outline by file name, then a one-line summary
fn format_tree(tree: &Tree<PathBuf>) -> String {
    let outline = tree.render_with(|path| display_name(path));
    format!("{outline}\n\n{} entries, height {}", tree.len(), tree.height())
}

fn run() -> Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    let Args { root, options } = parse_args(&args)?;

    let report = TreeBuilder::new(FsSource::new())
        .with_options(options)
        .build(root.clone());
    info!("Build finished after {} attempt(s)", report.attempts);

    let tree = report
        .into_result()
        .with_context(|| format!("Failed to build the tree for {}", root.display()))?;

    println!("{}", format_tree(&tree));
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{:#}", err);
            eprintln!("Error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}
