//! pipewire-go starter kit generator

mod kit;

use anyhow::{Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use colored::Colorize;
use kit::PipewireGoConfig;
use packager_core::{ConsoleReporter, GenerateOptions, Generator, PackageConfig};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "pipewire-go-package")]
#[command(about = "Generate the pipewire-go starter kit archive")]
#[command(version)]
pub struct Args {
    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Stage the skeleton and write the tar.gz archive
    Generate(GenerateArgs),
    /// Print the manifest as YAML without touching the filesystem
    Manifest,
}

#[derive(ClapArgs, Debug, Default)]
pub struct GenerateArgs {
    /// Archive path (defaults to pipewire-go-<version>.tar.gz in the current directory)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Scratch directory to stage in; wiped at the start of every run
    #[arg(long = "staging-dir", env = "PIPEWIRE_GO_STAGING_DIR")]
    pub staging_dir: Option<PathBuf>,

    /// Skip reading the archive back after writing it
    #[arg(long = "no-verify")]
    pub no_verify: bool,
}

impl From<&GenerateArgs> for GenerateOptions {
    fn from(args: &GenerateArgs) -> Self {
        GenerateOptions {
            staging_dir: args.staging_dir.clone(),
            verify: !args.no_verify,
        }
    }
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run_generate(config: PipewireGoConfig, args: &GenerateArgs) -> Result<()> {
    let generator = Generator::new(config, args.into());
    let artifact = generator
        .generate(args.output.as_deref(), &mut ConsoleReporter)
        .await
        .with_context(|| {
            format!(
                "Failed to generate {} package",
                generator.config().display_name()
            )
        })?;

    println!();
    println!(
        "{} {}",
        "Ready to download:".green().bold(),
        artifact.path.display()
    );
    println!();
    println!("To extract:");
    for step in generator.config().next_steps(&artifact.path) {
        println!("  {}", step);
    }

    Ok(())
}

fn print_manifest(config: &PipewireGoConfig) -> Result<()> {
    let yaml =
        serde_yaml::to_string(&config.manifest()).context("Failed to serialize manifest")?;
    print!("{}", yaml);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);
    let config = PipewireGoConfig;

    match args.command {
        Some(Command::Generate(generate_args)) => run_generate(config, &generate_args).await,
        Some(Command::Manifest) => print_manifest(&config),
        // No subcommand provided, generate with defaults
        None => run_generate(config, &GenerateArgs::default()).await,
    }
}
