//! quizplane CLI: collects quiz episodes, generates pages, scores answers
//! and draws the personality plane.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;
mod config;

#[derive(Parser)]
#[command(
    name = "quizplane",
    version,
    about = "Static quiz site generator, scorer and personality-plane renderer"
)]
struct Cli {
    /// Config file path (default: ./quizplane.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Discover episodes and write the quiz list data module
    Collect {
        /// Directory holding the episode folders
        quizzes_dir: Option<PathBuf>,

        /// Output file (.js/.ts/.mjs for a module, anything else for JSON)
        output_file: Option<PathBuf>,

        /// Also write the page-name to template-path map as JSON
        #[arg(long)]
        inputs: Option<PathBuf>,
    },

    /// Render index.html for every episode from the shared template
    Generate {
        /// Page template
        template: Option<PathBuf>,

        /// Directory holding the episode folders
        quizzes_dir: Option<PathBuf>,
    },

    /// Check episode metadata and quiz definitions
    Validate {
        /// Directory holding the episode folders
        quizzes_dir: Option<PathBuf>,
    },

    /// Score an answer set against a quiz
    Score {
        /// Quiz definition file
        #[arg(long)]
        quiz: PathBuf,

        /// Answers as a JSON object, `name=value&...` pairs, or a file holding either
        #[arg(long, required_unless_present = "autofill", conflicts_with = "autofill")]
        answers: Option<String>,

        /// Pick a random option for every question
        #[arg(long)]
        autofill: bool,

        /// Seed for --autofill
        #[arg(long, requires = "autofill")]
        seed: Option<u64>,

        /// Also draw the result point to this SVG file
        #[arg(long)]
        plane: Option<PathBuf>,
    },

    /// Draw points from a JSON file onto the personality plane
    Plane {
        /// JSON array of points ({"x", "y", "label"?, "fill"?, "size"?})
        #[arg(long)]
        points: PathBuf,

        /// Output SVG file
        #[arg(long)]
        output: PathBuf,

        /// Omit the integer grid
        #[arg(long)]
        no_grid: bool,

        #[arg(long)]
        width: Option<f64>,

        #[arg(long)]
        height: Option<f64>,

        #[arg(long)]
        padding: Option<f64>,
    },

    /// Create starter config, template and an example episode
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("quizplane=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init => commands::init::execute(),
        command => match config::load_config_from(cli.config.as_deref()) {
            Ok(config) => run(command, config).await,
            Err(e) => Err(e),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

async fn run(command: Commands, config: config::QuizplaneConfig) -> anyhow::Result<()> {
    match command {
        Commands::Collect {
            quizzes_dir,
            output_file,
            inputs,
        } => commands::collect::execute(quizzes_dir, output_file, inputs, &config).await,
        Commands::Generate {
            template,
            quizzes_dir,
        } => commands::generate::execute(template, quizzes_dir, &config).await,
        Commands::Validate { quizzes_dir } => commands::validate::execute(quizzes_dir, &config),
        Commands::Score {
            quiz,
            answers,
            autofill,
            seed,
            plane,
        } => commands::score::execute(quiz, answers, autofill, seed, plane, &config),
        Commands::Plane {
            points,
            output,
            no_grid,
            width,
            height,
            padding,
        } => commands::plane::execute(points, output, no_grid, width, height, padding, &config),
        Commands::Init => commands::init::execute(),
    }
}
