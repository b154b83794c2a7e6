use std::io::Write;
use std::path::PathBuf;

use clap::Parser;
use crush_decompiler::{render, CrushMap};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "crush-decompile")]
#[command(about = "Decompile a binary CRUSH map into its text form")]
struct Args {
    /// Binary map to decompile
    #[arg(short = 'd', long = "decompile", value_name = "FILE")]
    decompile: Option<PathBuf>,

    /// Print the decoded map as JSON instead of the text listing
    #[arg(long)]
    json: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(format!("crush_decompiler={level}")))
        .with_writer(std::io::stderr)
        .init();
}

/// Decode fully before writing, so a failed decode leaves `out` untouched.
fn run(args: &Args, out: &mut impl Write) -> Result<(), Box<dyn std::error::Error>> {
    let Some(path) = &args.decompile else {
        return Ok(());
    };
    let map = CrushMap::decode_file(path)?;

    if args.json {
        serde_json::to_writer_pretty(&mut *out, &map)?;
        writeln!(out)?;
    } else {
        write!(out, "{}", render(&map))?;
    }
    out.flush()?;
    Ok(())
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    if let Err(err) = run(&args, &mut std::io::stdout().lock()) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
