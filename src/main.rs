use appicon::config::{self, IconConfig};
use appicon::imaging::{DensityFactor, SourceImage};
use appicon::pipeline::{Completion, GenerateOptions};
use appicon::worker::{GenerationRequest, Worker};
use appicon::{manifest, output};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once; only called at startup
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "appicon")]
#[command(about = "Generate an app icon set from one square image")]
#[command(long_about = "\
Generate an app icon set from one square image

Writes every size of the standard catalog into an asset-catalog folder,
together with the Contents.json manifest that describes it:

  <output>/
  └── AppIcon.appiconset/
      ├── Contents.json
      ├── 16.png        # stored at 16 / density pixels
      ├── 20.png
      ├── ...
      └── 1024.png

A size that fails is reported and does not stop the others.

Settings are read from ./appicon.toml when present.
Run 'appicon gen-config' to generate a documented appicon.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Config file (default: ./appicon.toml if it exists)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Args)]
struct GenerateArgs {
    /// Square source image (PNG, JPEG, TIFF or WebP)
    image: PathBuf,

    /// Directory the icon-set folder is created in
    #[arg(long, short)]
    output: PathBuf,

    /// Nominal edge / stored pixel edge (overrides config)
    #[arg(long)]
    density: Option<f32>,

    /// Parallel icon workers, 0 = one per core (overrides config)
    #[arg(long, short)]
    jobs: Option<usize>,

    /// Only render these sizes, e.g. 16,32,1024 (overrides config)
    #[arg(long, value_delimiter = ',')]
    sizes: Option<Vec<u32>>,
}

#[derive(Subcommand)]
enum Command {
    /// Render the icon set and its manifest
    Generate(GenerateArgs),
    /// List the catalog sizes and the slots each one fills
    Sizes,
    /// Print the Contents.json that would be written
    Manifest,
    /// Print a stock appicon.toml with all options documented
    GenConfig,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

/// Execute a command. `Ok(false)` means it ran but did not fully succeed.
fn run(cli: Cli) -> Result<bool, Box<dyn std::error::Error>> {
    let mut config = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Generate(args) => {
            apply_overrides(&mut config, &args)?;
            generate(&config, &args)
        }
        Command::Sizes => {
            output::print_catalog(&config.catalog()?, config.rendering.density_factor);
            Ok(true)
        }
        Command::Manifest => {
            print!("{}", manifest::render(&config.catalog()?)?);
            Ok(true)
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
            Ok(true)
        }
    }
}

fn load_config(explicit: Option<&Path>) -> Result<IconConfig, config::ConfigError> {
    match explicit {
        Some(path) => config::load_config(path),
        None => config::load_config_in(&std::env::current_dir()?),
    }
}

/// Fold command-line flags into the loaded config, then re-validate.
fn apply_overrides(
    config: &mut IconConfig,
    args: &GenerateArgs,
) -> Result<(), config::ConfigError> {
    if let Some(density) = args.density {
        config.rendering.density_factor = DensityFactor::new(density).ok_or_else(|| {
            config::ConfigError::Validation(format!(
                "--density must be at least {}, got {density}",
                DensityFactor::MIN
            ))
        })?;
    }
    if let Some(jobs) = args.jobs {
        config.processing.max_processes = jobs;
    }
    if let Some(sizes) = &args.sizes {
        config.sizes = Some(sizes.clone());
    }
    config.validate()
}

fn generate(config: &IconConfig, args: &GenerateArgs) -> Result<bool, Box<dyn std::error::Error>> {
    let options = GenerateOptions::from_config(config)?;
    log::debug!(
        "Rendering {} sizes with {} worker(s)",
        options.catalog.len(),
        options.threads
    );
    let source = SourceImage::open(&args.image)?;

    let (tx, rx) = std::sync::mpsc::channel();
    let printer = std::thread::spawn(move || {
        for event in rx {
            for line in output::format_generate_event(&event) {
                println!("{}", line);
            }
        }
    });

    let worker = Worker::new();
    let request = GenerationRequest::new(Some(source), Some(args.output.clone()), options);
    let result = match worker.start(request, Some(tx)) {
        Ok(handle) => handle.wait(),
        Err(err) => Err(err),
    };
    if printer.join().is_err() {
        log::warn!("Progress printer stopped early");
    }

    let completion = Completion::from_result(&result);
    for line in output::format_completion(&completion) {
        println!("{}", line);
    }
    Ok(completion.success)
}
