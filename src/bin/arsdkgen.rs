use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use arsdkgen::{generate_source, GenConfig, GenError, Target};

#[derive(Parser)]
#[command(name = "arsdkgen")]
#[command(about = "ARSDK schema compiler (schema -> Rust bindings).", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Feature modules, aggregate module and Uid table.
    Bindings(GenArgs),
    /// Expected-command matchers and event encoders for tests.
    Harness(GenArgs),
    /// Bindings and harness.
    All(GenArgs),
}

#[derive(Args)]
struct GenArgs {
    /// Schema source file.
    #[arg(long)]
    schema: PathBuf,
    /// Output directory; files owned by this run are replaced.
    #[arg(long)]
    out: PathBuf,
    /// Prefix of every generated type.
    #[arg(long, default_value = arsdkgen::naming::DEFAULT_PREFIX)]
    prefix: String,
    /// Path of the codec module used by generated code.
    #[arg(long, default_value = "arsdk")]
    codec_path: String,
    /// Path under which the harness reaches the bindings.
    #[arg(long, default_value = "crate::arsdk_features")]
    bindings_path: String,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    match try_main() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{err:#}");
            ExitCode::from(2)
        }
    }
}

fn try_main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let (target, args) = match cli.cmd {
        Cmd::Bindings(a) => (Target::Bindings, a),
        Cmd::Harness(a) => (Target::Harness, a),
        Cmd::All(a) => (Target::All, a),
    };

    let source = std::fs::read_to_string(&args.schema)
        .with_context(|| format!("read schema: {}", args.schema.display()))?;
    let config = GenConfig::default()
        .with_prefix(args.prefix)
        .with_codec_path(args.codec_path)
        .with_bindings_path(args.bindings_path);

    let set = match generate_source(&source, &config, target) {
        Ok(set) => set,
        Err(err @ (GenError::Schema(_) | GenError::Lint { .. })) => {
            eprintln!("{}: {}", args.schema.display(), err);
            return Ok(ExitCode::from(1));
        }
        Err(err) => return Err(err.into()),
    };
    let written = set
        .write_to(&args.out)
        .with_context(|| format!("write output: {}", args.out.display()))?;
    for path in written {
        println!("{}", path.display());
    }
    Ok(ExitCode::SUCCESS)
}
