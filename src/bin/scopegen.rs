//! Scopegen CLI - Scope-Aware Random Program Generator
//!
//! Print randomly generated, lexically consistent programs.

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use scopegen::generator::{GenerationStats, Generator};
use scopegen::{GeneratorConfig, Result};
use tracing_subscriber::EnvFilter;

/// Scopegen - random programs with well-formed scopes
#[derive(Parser)]
#[command(name = "scopegen")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate programs
    Generate {
        /// Size budget per program, in bytes of output
        #[arg(short, long)]
        size: Option<usize>,

        /// Number of programs to generate
        #[arg(short, long, default_value = "1")]
        count: usize,

        /// Random seed for reproducible generation
        #[arg(long)]
        seed: Option<u64>,

        /// Maximum scope nesting depth
        #[arg(short = 'd', long)]
        max_depth: Option<usize>,

        /// Size budget of each conditional branch body
        #[arg(short, long)]
        block_size: Option<usize>,

        /// JSON config file; flags override its values
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        output: String,
    },

    /// Show aggregate generation statistics
    Stats {
        /// Number of programs to generate
        #[arg(short, long, default_value = "100")]
        count: usize,

        /// Size budget per program
        #[arg(short, long)]
        size: Option<usize>,

        /// Random seed
        #[arg(long, default_value = "42")]
        seed: u64,
    },
}

fn main() -> ExitCode {
    // Logging is opt-in through SCOPEGEN_LOG so stdout stays clean program text
    if let Ok(filter) = EnvFilter::try_from_env("SCOPEGEN_LOG") {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
        tracing::debug!("tracing initialized");
    }

    let cli = Cli::parse();
    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("scopegen: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Generate {
            size,
            count,
            seed,
            max_depth,
            block_size,
            config,
            output,
        } => {
            let mut gen_config = match config {
                Some(path) => GeneratorConfig::from_file(&path)?,
                None => GeneratorConfig::default(),
            };
            if let Some(seed) = seed {
                gen_config = gen_config.with_seed(seed);
            }
            if let Some(max_depth) = max_depth {
                gen_config = gen_config.with_max_indent_level(max_depth);
            }
            if let Some(block_size) = block_size {
                gen_config = gen_config.with_block_size_budget(block_size);
            }

            let mut generator = Generator::new(gen_config)?;
            let programs = generator.generate_batch(count, size)?;

            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            match output.as_str() {
                "json" => {
                    let json = serde_json::to_string_pretty(&programs)?;
                    writeln!(out, "{json}")?;
                }
                "text" => {
                    for (i, program) in programs.iter().enumerate() {
                        if count > 1 {
                            writeln!(out, "// --- Program {} (seed: {}) ---", i + 1, program.seed)?;
                        }
                        write!(out, "{}", program.code)?;
                    }
                }
                other => {
                    return Err(scopegen::Error::Configuration(format!(
                        "unknown output format '{other}' (expected text or json)"
                    )));
                }
            }
        }

        Commands::Stats { count, size, seed } => {
            let mut generator = Generator::new(GeneratorConfig::default().with_seed(seed))?;
            let mut total = GenerationStats::default();
            let mut bytes = 0usize;
            for program in generator.generate_batch(count, size)? {
                bytes += program.code.len();
                total.merge(&program.stats);
            }

            println!("Generation Statistics ({count} programs, seed {seed}):");
            println!("  Bytes generated:         {bytes}");
            println!("  Declarations:            {}", total.declarations);
            println!("  Assignments:             {}", total.assignments);
            println!("  If statements:           {}", total.if_statements);
            println!("  If/else statements:      {}", total.if_else_statements);
            println!("  Suppressed conditionals: {}", total.suppressed_conditionals);
            println!("  Scope pushes / pops:     {} / {}", total.scope_pushes, total.scope_pops);
            println!("  Identifier retries:      {}", total.identifier_retries);
            println!("  Max scope depth:         {}", total.max_depth);
        }
    }

    Ok(())
}
