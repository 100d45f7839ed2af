mod commands;

use clap::{CommandFactory, Parser};
use clap_complete::{Shell, generate};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "blog-kit")]
#[command(version, about = "Static site generator for multilingual blogs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Initialize new site directory
    Init {
        /// Path to create site directory
        path: PathBuf,

        /// Site title
        #[arg(long, default_value = "My Blog")]
        title: String,

        /// Locales to create (first one is the default)
        #[arg(long = "locale", default_value = "en")]
        locales: Vec<String>,
    },

    /// Validate site configuration and content
    Validate {
        /// Path to site directory
        path: PathBuf,
    },

    /// Preview site locally with hot reload and an in-memory view counter
    Preview {
        /// Path to site directory
        path: PathBuf,

        /// Port to serve on
        #[arg(short, long, default_value = "8080")]
        port: u16,
    },

    /// Build the static site
    Build {
        /// Path to site directory
        path: PathBuf,

        /// Output directory for generated site
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Read or record article views against a view-count store
    Views {
        #[command(subcommand)]
        command: ViewsCommand,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser)]
enum ViewsCommand {
    /// Show the current view count of an article
    Show {
        /// Article slug
        slug: String,

        /// View store base URL
        #[arg(long, env = "BLOG_KIT_VIEWS_ENDPOINT")]
        endpoint: String,
    },

    /// Record one view of an article and show the new count
    Hit {
        /// Article slug
        slug: String,

        /// View store base URL
        #[arg(long, env = "BLOG_KIT_VIEWS_ENDPOINT")]
        endpoint: String,
    },
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_env("BLOG_KIT_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Init {
            path,
            title,
            locales,
        } => commands::init::run(path, title, locales).await,
        Command::Validate { path } => commands::validate::run(path).await,
        Command::Preview { path, port } => commands::preview::run(path, port).await,
        Command::Build { path, output } => commands::build::run(path, output).await,
        Command::Views { command } => match command {
            ViewsCommand::Show { slug, endpoint } => {
                commands::views::run(slug, endpoint, false).await
            }
            ViewsCommand::Hit { slug, endpoint } => {
                commands::views::run(slug, endpoint, true).await
            }
        },
        Command::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "blog-kit", &mut io::stdout());
            Ok(())
        }
    }
}
