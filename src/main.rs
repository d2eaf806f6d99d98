use clap::{Parser, Subcommand};
use slide_grade::batch::{self, FileScore};
use slide_grade::catalog::CatalogDir;
use slide_grade::config::{self, GraderConfig};
use slide_grade::slide::CommitPolicy;
use slide_grade::{dataset, evaluate, output};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "slide-grade")]
#[command(about = "Grade photo slideshow submissions")]
#[command(long_about = "\
Grade photo slideshow submissions

A submission names its dataset on the first line, the number of slides on
the second, then one slide per line: a single photo id, or two vertical
photo ids separated by a space.

  a_example
  3
  0
  3
  1 2

Any illegal slide scores the whole file 0. Otherwise the score is the sum,
over neighbouring slides, of min(common tags, tags only in the first, tags
only in the second).

Run 'slide-grade catalog' once to build the photo catalogs from the raw
dataset files, then 'slide-grade batch' to grade a results directory.")]
#[command(version)]
struct Cli {
    /// Config file
    #[arg(long, default_value = config::CONFIG_FILENAME, global = true)]
    config: PathBuf,

    /// Photo catalog directory (overrides config)
    #[arg(long, global = true)]
    catalogs: Option<PathBuf>,

    /// Record a slide's photos as used only once the whole slide is legal
    #[arg(long, global = true)]
    staged: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Grade every submission in a results directory
    Batch {
        /// Results directory (overrides config)
        #[arg(long)]
        results: Option<PathBuf>,
    },
    /// Grade a single submission
    Evaluate {
        /// Submission file
        file: PathBuf,
    },
    /// Build photo catalogs from raw dataset descriptions
    Catalog {
        /// Raw dataset directory (overrides config)
        #[arg(long)]
        datasets: Option<PathBuf>,
    },
    /// Print a stock grader.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let Cli {
        config: config_path,
        catalogs,
        staged,
        command,
    } = Cli::parse();

    match command.unwrap_or(Command::Batch { results: None }) {
        Command::Batch { results } => {
            let settings = Settings::resolve(&config_path, catalogs, staged)?;
            let results = results.unwrap_or_else(|| PathBuf::from(&settings.config.results_dir));
            init_thread_pool(&settings.config);
            let catalogs = CatalogDir::new(settings.catalog_dir);
            let report = batch::grade_directory(&results, &catalogs, settings.policy)?;
            output::print_batch_report(&report);
        }
        Command::Evaluate { file } => {
            let settings = Settings::resolve(&config_path, catalogs, staged)?;
            let catalogs = CatalogDir::new(settings.catalog_dir);
            let outcome = evaluate::evaluate_file(&file, &catalogs, settings.policy);
            output::print_file_score(&FileScore {
                path: file,
                outcome,
            });
        }
        Command::Catalog { datasets } => {
            let settings = Settings::resolve(&config_path, catalogs, staged)?;
            let datasets =
                datasets.unwrap_or_else(|| PathBuf::from(&settings.config.datasets_dir));
            let written = dataset::generate_catalogs(&datasets, &settings.catalog_dir)?;
            output::print_catalog_output(&written);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Config file values with command-line overrides applied.
struct Settings {
    config: GraderConfig,
    catalog_dir: PathBuf,
    policy: CommitPolicy,
}

impl Settings {
    fn resolve(
        config_path: &Path,
        catalogs: Option<PathBuf>,
        staged: bool,
    ) -> Result<Self, config::ConfigError> {
        let config = config::load_config(config_path)?;
        let catalog_dir = catalogs.unwrap_or_else(|| PathBuf::from(&config.catalog_dir));
        let policy = if staged {
            CommitPolicy::Staged
        } else {
            config.commit_policy
        };
        Ok(Self {
            config,
            catalog_dir,
            policy,
        })
    }
}

/// Initialize the rayon thread pool based on processing config.
///
/// The pool never exceeds the number of available CPU cores.
fn init_thread_pool(config: &GraderConfig) {
    let threads = config::effective_threads(&config.processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
