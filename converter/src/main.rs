//! Caris converter CLI
//!
//! ```bash
//! caris-converter convert lines.txt             # Write lines.csv next to the source
//! caris-converter convert lines.txt -o out.csv  # Choose the destination
//! caris-converter preview lines.txt             # Print the converted records
//! caris-converter serve                         # Start HTTP preview server (port 3000)
//! caris-converter about
//! ```

use clap::{Parser, Subcommand};
use caris_converter::config::{ABOUT_TEXT, MAINTAINER};
use caris_converter::{destination_for, AppConfig, Session};
use std::path::{Path, PathBuf};
use std::process::Command;

#[derive(Parser)]
#[command(name = "caris-converter", version)]
#[command(about = "Convert Caris line exports into semicolon-delimited CSV records", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a source file and save the result
    Convert {
        /// Source file (.txt by convention)
        input: PathBuf,

        /// Output file or directory (default: <input>.csv, never the input itself)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Force the source encoding (auto-detect if not specified)
        #[arg(short, long)]
        encoding: Option<String>,

        /// Open the saved file with the default application
        #[arg(long)]
        open: bool,
    },

    /// Print the converted records without saving
    Preview {
        /// Source file
        input: PathBuf,

        /// Force the source encoding (auto-detect if not specified)
        #[arg(short, long)]
        encoding: Option<String>,
    },

    /// Start HTTP preview server
    Serve {
        /// Port to listen on (default: $CARIS_PORT or 3000)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Show information about this tool
    About,
}

#[tokio::main]
async fn main() {
    let config = AppConfig::from_env();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Convert {
            input,
            output,
            encoding,
            open,
        } => cmd_convert(&config, &input, output.as_deref(), encoding.as_deref(), open),

        Commands::Preview { input, encoding } => cmd_preview(&input, encoding.as_deref()),

        Commands::Serve { port } => cmd_serve(port.unwrap_or(config.port)).await,

        Commands::About => cmd_about(),
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn cmd_convert(
    config: &AppConfig,
    input: &Path,
    output: Option<&Path>,
    encoding: Option<&str>,
    open: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = Session::with_output_name(config.output_name.clone());
    session.open_path(input, encoding)?;

    let destination = destination_for(input, output, config);
    let saved = session.save(&destination)?;

    if open {
        open_saved(&saved.path)?;
    }

    eprintln!("\n✨ Done!");
    Ok(())
}

fn cmd_preview(input: &Path, encoding: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = Session::new();
    let conversion = session.open_path(input, encoding)?;
    print!("{}", conversion.preview());
    Ok(())
}

async fn cmd_serve(port: u16) -> Result<(), Box<dyn std::error::Error>> {
    caris_converter::server::start_server(port).await?;
    Ok(())
}

fn cmd_about() -> Result<(), Box<dyn std::error::Error>> {
    println!("Caris lines converter {}\n", env!("CARGO_PKG_VERSION"));
    println!("{}\n", ABOUT_TEXT);
    println!("{}", MAINTAINER);
    Ok(())
}

/// Hand the saved file to the platform's default application.
fn open_saved(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let mut command = if cfg!(target_os = "windows") {
        let mut c = Command::new("cmd");
        c.args(["/C", "start", ""]);
        c
    } else if cfg!(target_os = "macos") {
        Command::new("open")
    } else {
        Command::new("xdg-open")
    };

    command.arg(path).spawn()?;
    Ok(())
}
