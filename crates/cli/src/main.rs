//! AlmaCut report CLI
//!
//! Renders saved optimizer responses as text: the full report, just the
//! cutting program, or just the statistics. The JSON body is whatever
//! the service returned from any of its optimize operations.

use almacut_core::{BlockDims, OptimizeResponse, RenderSession};
use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "almacut")]
#[command(about = "Render 3D guillotine cutting results")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the full report: cutting program, item table, fill summary
    Report(ResultArgs),

    /// Render only the cutting program
    Sequence {
        /// Path to a saved optimizer response (JSON)
        response: PathBuf,
    },

    /// Render only the fill/waste statistics
    Stats(ResultArgs),
}

#[derive(Args)]
struct ResultArgs {
    /// Path to a saved optimizer response (JSON)
    response: PathBuf,

    /// Item catalog file, one `id,l,w,h[,qty]` line per item
    #[arg(short, long)]
    catalog: Option<PathBuf>,

    /// Saw kerf in mm
    #[arg(short, long, default_value = "4.0")]
    kerf: f64,

    /// Block extents, `LxWxH` or `L,W,H`, overriding the response's
    #[arg(short, long, value_parser = parse_block)]
    block: Option<BlockDims>,
}

fn parse_block(raw: &str) -> Result<BlockDims, String> {
    let sep = if raw.contains('x') { 'x' } else { ',' };
    let parts: Vec<&str> = raw.split(sep).map(str::trim).collect();
    if parts.len() != 3 {
        return Err(format!("expected L{}W{}H, found {:?}", sep, sep, raw));
    }
    let dim = |idx: usize| {
        parts[idx]
            .parse::<f64>()
            .map_err(|_| format!("not a number: {:?}", parts[idx]))
    };
    Ok(BlockDims::new(dim(0)?, dim(1)?, dim(2)?))
}

fn load_response(path: &Path) -> anyhow::Result<OptimizeResponse> {
    let body = std::fs::read_to_string(path)
        .with_context(|| format!("reading response {}", path.display()))?;
    log::debug!("loaded {} bytes from {}", body.len(), path.display());
    serde_json::from_str(&body).with_context(|| format!("parsing response {}", path.display()))
}

fn load_session(args: &ResultArgs) -> anyhow::Result<RenderSession> {
    let response = load_response(&args.response)?;
    let catalog = match &args.catalog {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading catalog {}", path.display()))?;
            almacut_core::parse_catalog(&text)?
        }
        None => Vec::new(),
    };
    Ok(RenderSession::build(&response, args.block, args.kerf, &catalog))
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Report(args) => {
            let session = load_session(&args)?;
            print!("{}", session.report());
        }

        Commands::Sequence { response } => {
            let response = load_response(&response)?;
            match response.cutting_tree.as_ref() {
                Some(raw) => {
                    let program = almacut_core::CuttingProgram::from_value(raw);
                    print!("{}", almacut_core::format_program(&program));
                }
                None => println!("response carries no cutting program"),
            }
        }

        Commands::Stats(args) => {
            let session = load_session(&args)?;
            let stats = &session.stats;
            println!(
                "block volume {:.0} mm3, filled {:.0} mm3, waste {:.0} mm3",
                stats.total_volume, stats.total_filled, stats.total_waste
            );
            println!(
                "fill {:.1}%, waste {:.1}%, {} pieces placed",
                stats.fill_percent,
                stats.waste_percent,
                stats.placed_count()
            );
            for (id, usage) in &stats.per_item {
                println!("  item {}: {} pcs, {:.0} mm3", id, usage.count, usage.volume);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_block_both_separators() {
        assert_eq!(
            parse_block("200x100x60").unwrap(),
            BlockDims::new(200.0, 100.0, 60.0)
        );
        assert_eq!(
            parse_block("200, 100, 60").unwrap(),
            BlockDims::new(200.0, 100.0, 60.0)
        );
    }

    #[test]
    fn test_parse_block_rejects_garbage() {
        assert!(parse_block("200x100").is_err());
        assert!(parse_block("axbxc").is_err());
    }
}
