use clap::{Parser, Subcommand};
use imgsqueeze::batch::Batch;
use imgsqueeze::config::{self, Overrides};
use imgsqueeze::imaging::{OutputFormat, ResampleFilter, RustBackend, plan_source};
use imgsqueeze::{export, inputs, output};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{Level, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(name = "imgsqueeze")]
#[command(about = "Batch image resizer and re-encoder")]
#[command(long_about = "\
Batch image resizer and re-encoder

Every input image is shrunk to fit a bounding box (never enlarged) and
re-encoded as JPEG, PNG or WebP. Results are written next to each other as
compressed_<name>.<format> in the output directory. One bad image never
stops the rest of the batch.

Settings are layered: built-in defaults, then ./imgsqueeze.toml (or
--config FILE), then command-line flags.

Run 'imgsqueeze gen-config' to generate a documented imgsqueeze.toml.")]
#[command(version)]
struct Cli {
    /// Log per-image details (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resize and re-encode images
    Compress(CompressArgs),
    /// Print a stock imgsqueeze.toml with all options documented
    GenConfig,
}

#[derive(clap::Args)]
struct CompressArgs {
    /// Image files or directories
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// Encoder quality, 10-100 (ignored for PNG)
    #[arg(short, long)]
    quality: Option<u32>,

    /// Output format
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Bounding box width in pixels
    #[arg(long)]
    max_width: Option<u32>,

    /// Bounding box height in pixels
    #[arg(long)]
    max_height: Option<u32>,

    /// Stretch to exactly max-width x max-height instead of fitting inside
    #[arg(long)]
    no_aspect: bool,

    /// Resampling filter
    #[arg(long, value_enum)]
    filter: Option<ResampleFilter>,

    /// Output directory
    #[arg(short, long)]
    out_dir: Option<PathBuf>,

    /// Max parallel workers (clamped to the number of CPU cores)
    #[arg(short = 'j', long)]
    max_processes: Option<usize>,

    /// Descend into subdirectories
    #[arg(short, long)]
    recursive: bool,

    /// Show planned dimensions without encoding or writing anything
    #[arg(long)]
    dry_run: bool,

    /// Print a JSON report instead of progress lines
    #[arg(long)]
    json: bool,

    /// Config file (default: ./imgsqueeze.toml if present)
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Compress(args) => compress(args),
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Logs go to stderr so stdout stays clean for results and `--json`.
fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("imgsqueeze={level}")));
    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn compress(args: CompressArgs) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let base = match &args.config {
        Some(path) => config::load_config_file(path)?,
        None => config::load_config(Path::new("."))?,
    };
    let overrides = Overrides {
        quality: args.quality,
        format: args.format,
        max_width: args.max_width,
        max_height: args.max_height,
        maintain_aspect_ratio: args.no_aspect.then_some(false),
        filter: args.filter,
        output_dir: args.out_dir,
        max_processes: args.max_processes,
    };
    let config = overrides.apply(base)?;
    let settings = config.transform.to_settings();
    init_thread_pool(&config.processing);

    let found = inputs::discover(&args.paths, args.recursive);
    let (sources, read_failures) = inputs::read_sources(&found.files);
    let mut unreadable = found.unreadable;
    unreadable.extend(read_failures);
    info!(images = sources.len(), unreadable = unreadable.len(), "compressing");

    if !args.json {
        for input in &unreadable {
            output::print_unreadable(input);
        }
    }

    let mut batch = Batch::new();
    for source in sources {
        batch.add(source);
    }

    let backend = RustBackend::new();

    if args.dry_run {
        let plans: Vec<_> = batch
            .items()
            .map(|item| {
                let plan = plan_source(&backend, &item.source, &settings);
                (item.source.name().to_string(), plan)
            })
            .collect();
        if args.json {
            println!("{}", output::format_json_plan(&plans, &unreadable)?);
        } else {
            for (name, plan) in &plans {
                output::print_plan_line(name, plan);
            }
        }
        let failed = plans.iter().filter(|(_, plan)| plan.is_err()).count();
        return Ok(exit_code(failed + unreadable.len()));
    }

    let summary = if args.json {
        batch.process(&backend, &settings, None)
    } else {
        let (tx, rx) = std::sync::mpsc::channel();
        let printer = std::thread::spawn(move || {
            for event in rx {
                output::print_batch_event(&event);
            }
        });
        let summary = batch.process(&backend, &settings, Some(tx));
        printer
            .join()
            .map_err(|_| "progress printer thread panicked")?;
        summary
    };

    let written = export::export_all(&batch, &config.output.dir)?;

    if args.json {
        println!("{}", output::format_json_report(&batch, &unreadable)?);
    } else {
        output::print_summary(&summary, &written);
    }

    Ok(exit_code(summary.failed + unreadable.len()))
}

fn exit_code(failed: usize) -> ExitCode {
    if failed == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores. Users can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
