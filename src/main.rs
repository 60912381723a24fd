use std::fs::File;
use std::path::PathBuf;

use clap::Parser;
use polyglot::core::config::{load_config, resolve};
use polyglot::core::mode::Mode;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

#[derive(Parser)]
#[command(name = "polyglot", about = "Multi-language code console")]
struct Args {
    /// Mode to start in (overrides config)
    #[arg(short, long, value_enum)]
    mode: Option<Mode>,

    /// Directory saved files are written to (overrides config)
    #[arg(long)]
    save_dir: Option<PathBuf>,

    /// Run the files once and print the result instead of starting the UI
    #[arg(long, requires = "files")]
    run: bool,

    /// Files to open at start-up
    files: Vec<PathBuf>,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to polyglot.log in current directory
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    if let Ok(log_file) = File::create("polyglot.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };
    let resolved = resolve(&config, args.mode, args.save_dir.as_deref());

    log::info!(
        "Polyglot starting up in {} mode (save dir: {})",
        resolved.default_mode,
        resolved.save_dir.display()
    );

    if args.run {
        let succeeded = polyglot::batch::run(&resolved, args.files).await?;
        std::process::exit(if succeeded { 0 } else { 1 });
    }

    polyglot::tui::run(resolved, args.files)
}
