use clap::{Parser, Subcommand, ValueEnum};
use resizer::config::{self, ScaleConfigUpdate};
use resizer::imaging::Quality;
use resizer::output;
use resizer::process::{self, Destination, Job, ProcessConfig};
use std::path::PathBuf;

/// Output encoding.
#[derive(ValueEnum, Clone, Copy, Debug)]
enum Format {
    Jpeg,
    Png,
    Webp,
}

impl Format {
    fn mime(self) -> &'static str {
        match self {
            Format::Jpeg => "image/jpeg",
            Format::Png => "image/png",
            Format::Webp => "image/webp",
        }
    }
}

/// Shared flags for commands that process images.
#[derive(clap::Args, Clone)]
struct BatchArgs {
    /// Images to process
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Print data: URIs instead of writing files
    #[arg(long)]
    data_uri: bool,
}

#[derive(Parser)]
#[command(name = "resizer")]
#[command(about = "Downscale images to fit a box, or cut square thumbnails")]
#[command(long_about = "\
Downscale images to fit a box, or cut square thumbnails

Large reductions are done by repeated 2:1 box averaging followed by a single
bilinear pass, which keeps fine detail from aliasing. Images are never scaled up
by 'fit'.

Outputs:

  resized/
  ├── manifest.json        # Every output and every failure
  ├── dawn-fit.jpg         # resizer fit dawn.jpg
  └── dawn-thumb.jpg       # resizer thumb dawn.jpg

Settings are layered: stock defaults, then the --config file, then flags.
Run 'resizer gen-config' to generate a documented config file.")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Config file (missing file = stock defaults)
    #[arg(long, default_value = "resizer.toml", global = true)]
    config: PathBuf,

    /// Output directory
    #[arg(long, default_value = "resized", global = true)]
    output: PathBuf,

    /// Worker threads (capped at available cores)
    #[arg(long, global = true)]
    jobs: Option<usize>,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Jpeg, global = true)]
    format: Format,

    /// Lossy encoding quality, 0.0 - 1.0
    #[arg(long, global = true)]
    quality: Option<f64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scale images down to fit the configured bounds
    Fit {
        #[command(flatten)]
        batch: BatchArgs,
        /// Fit bound on width (0 = unset)
        #[arg(long)]
        max_width: Option<u32>,
        /// Fit bound on height (0 = unset)
        #[arg(long)]
        max_height: Option<u32>,
    },
    /// Center-crop images to squares of a fixed size
    Thumb {
        #[command(flatten)]
        batch: BatchArgs,
        /// Thumbnail edge in pixels
        #[arg(long)]
        size: Option<u32>,
    },
    /// Print a stock config file with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr so stdout stays clean for progress and data URIs.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    let (job, batch, update) = match cli.command {
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
            return Ok(());
        }
        Command::Fit {
            batch,
            max_width,
            max_height,
        } => (
            Job::Fit,
            batch,
            ScaleConfigUpdate {
                max_width,
                max_height,
                ..ScaleConfigUpdate::default()
            },
        ),
        Command::Thumb { batch, size } => (
            Job::Thumbnail,
            batch,
            ScaleConfigUpdate {
                thumb_size: size,
                ..ScaleConfigUpdate::default()
            },
        ),
    };

    let update = ScaleConfigUpdate {
        quality: cli.quality.map(Quality),
        ..update
    };
    // Bad flags fail here, before any worker or printer thread starts.
    let scale = config::load_config(&cli.config)?.try_merged(&update)?;

    init_thread_pool(cli.jobs);

    let destination = if batch.data_uri {
        Destination::DataUri
    } else {
        Destination::Directory(cli.output.clone())
    };
    let process_config = ProcessConfig {
        job,
        scale,
        mime: cli.format.mime().to_string(),
        destination,
    };

    // Progress goes to stderr when stdout carries the data URIs.
    let to_stderr = batch.data_uri;
    let (tx, rx) = std::sync::mpsc::channel();
    let printer = std::thread::spawn(move || {
        for event in rx {
            for line in output::format_process_event(&event) {
                if to_stderr {
                    eprintln!("{}", line);
                } else {
                    println!("{}", line);
                }
            }
        }
    });
    let manifest = process::process(&batch.inputs, &process_config, Some(tx))?;
    printer.join().ok();

    if batch.data_uri {
        output::print_data_uris(&manifest);
    } else {
        let manifest_path = cli.output.join("manifest.json");
        let json = serde_json::to_string_pretty(&manifest)?;
        std::fs::write(&manifest_path, json)?;
        output::print_summary(&manifest, Some(&manifest_path));
    }

    if !manifest.failures.is_empty() {
        return Err(format!(
            "{} of {} images failed",
            manifest.failures.len(),
            batch.inputs.len()
        )
        .into());
    }
    Ok(())
}

/// Initialize the rayon thread pool.
///
/// Caps at the number of available CPU cores: user can constrain down, not up.
fn init_thread_pool(jobs: Option<usize>) {
    rayon::ThreadPoolBuilder::new()
        .num_threads(config::effective_threads(jobs))
        .build_global()
        .ok();
}
