use carousel_cut::imaging::FocalPoint;
use carousel_cut::process::{PeekOptions, ProcessError, ProcessEvent, SplitOptions};
use carousel_cut::{config, output, process};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::mpsc::Sender;
use tracing_subscriber::EnvFilter;

fn version_string() -> &'static str {
    let on_tag = env!("CAROUSEL_ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("CAROUSEL_GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "carousel-cut")]
#[command(about = "Cut photos into square tiles for swipeable carousels")]
#[command(long_about = "\
Cut photos into square tiles for swipeable carousels

Two modes:

  split   One wide image → 2-10 equal squares that read as a continuous
          panorama when swiped.
  peek    Several images → one square each, every tile (but the last)
          showing a strip of the next image on its right edge.

Peek inputs can be files or directories. Directory contents are ordered by
numeric prefix (001-dawn.jpg, 002-noon.jpg, ...), then by name.

Settings come from config.toml in --config-dir (default: current directory),
and flags override them. Run 'carousel-cut gen-config' for a documented file.

Set RUST_LOG=carousel_cut=debug to see computed geometry.")]
#[command(version = version_string())]
struct Cli {
    /// Directory containing config.toml
    #[arg(long, default_value = ".", global = true)]
    config_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

/// Shared flags for commands that write tiles.
#[derive(clap::Args, Clone)]
struct OutputArgs {
    /// Directory to write tiles and manifest.json into
    #[arg(short, long, default_value = "carousel")]
    output: PathBuf,

    /// JPEG quality 1-100
    #[arg(long)]
    quality: Option<u32>,

    /// Tile format: jpg or png
    #[arg(long)]
    format: Option<String>,
}

#[derive(Subcommand)]
enum Command {
    /// Split one wide image into equal square segments
    Split {
        /// Source image
        input: PathBuf,

        /// Number of segments (2-10); omit for automatic
        #[arg(short = 'n', long)]
        segments: Option<u32>,

        /// Vertical window position: 0 = top, 1 = bottom
        #[arg(long)]
        align: Option<f64>,

        #[command(flatten)]
        out: OutputArgs,
    },
    /// Build a peek carousel from a sequence of images
    Peek {
        /// Source images and/or directories, in sequence order
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Peek strip width as a percentage of the tile (0-20)
        #[arg(long)]
        percent: Option<u32>,

        /// Blur the peek strip; --blur=false overrides a config that enables it
        #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
        blur: Option<bool>,

        /// Focal point "x,y" per image, in order; missing ones are centered
        #[arg(long = "focal", value_name = "X,Y")]
        focal: Vec<FocalPoint>,

        #[command(flatten)]
        out: OutputArgs,
    },
    /// Show split geometry for an image without rendering
    Plan {
        /// Source image
        input: PathBuf,

        /// Number of segments (2-10); omit for automatic
        #[arg(short = 'n', long)]
        segments: Option<u32>,

        /// Vertical window position: 0 = top, 1 = bottom
        #[arg(long)]
        align: Option<f64>,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing();

    match cli.command {
        Command::Split {
            input,
            segments,
            align,
            out,
        } => {
            let mut config = config::load_config(&cli.config_dir)?;
            if segments.is_some() {
                config.split.segments = segments;
            }
            if let Some(a) = align {
                config.split.vertical_align = a;
            }
            apply_output_args(&mut config, &out);
            config.validate()?;
            init_thread_pool(&config.processing);

            let options = SplitOptions::from_config(&config);
            let manifest = run_with_progress(|tx| {
                process::split(&input, &out.output, &options, Some(tx))
            })?;
            output::print_manifest_summary(&manifest, &out.output);
        }
        Command::Peek {
            inputs,
            percent,
            blur,
            focal,
            out,
        } => {
            let mut config = config::load_config(&cli.config_dir)?;
            apply_peek_args(&mut config, percent, blur);
            apply_output_args(&mut config, &out);
            config.validate()?;
            init_thread_pool(&config.processing);

            let sources = process::collect_sources(&inputs)?;
            let options = PeekOptions {
                focal_points: focal,
                ..PeekOptions::from_config(&config)
            };
            let manifest = run_with_progress(|tx| {
                process::peek(&sources, &out.output, &options, Some(tx))
            })?;
            output::print_manifest_summary(&manifest, &out.output);
        }
        Command::Plan {
            input,
            segments,
            align,
        } => {
            let config = config::load_config(&cli.config_dir)?;
            let plan = process::plan(
                &input,
                segments.or(config.split.segments),
                align.unwrap_or(config.split.vertical_align),
            )?;
            output::print_plan(&plan);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Install the diagnostics subscriber. Quiet unless `RUST_LOG` asks for more.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn apply_peek_args(config: &mut config::CarouselConfig, percent: Option<u32>, blur: Option<bool>) {
    if let Some(p) = percent {
        config.peek.percent = p;
    }
    if let Some(b) = blur {
        config.peek.blur = b;
    }
}

fn apply_output_args(config: &mut config::CarouselConfig, args: &OutputArgs) {
    if let Some(q) = args.quality {
        config.output.quality = q;
    }
    if let Some(f) = &args.format {
        config.output.format = f.clone();
    }
}

/// Run `work` while a printer thread displays its progress events.
fn run_with_progress<T>(
    work: impl FnOnce(Sender<ProcessEvent>) -> Result<T, ProcessError>,
) -> Result<T, ProcessError> {
    let (tx, rx) = std::sync::mpsc::channel();
    let printer = std::thread::spawn(move || {
        for event in rx {
            for line in output::format_process_event(&event) {
                println!("{}", line);
            }
        }
    });
    let result = work(tx);
    printer.join().ok();
    result
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores. The user can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    tracing::debug!(threads, "rayon pool");
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
