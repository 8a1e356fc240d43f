//! CLI entry point for course-catalog

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use course_catalog::config::ApiConfig;
use course_catalog::Site;

#[derive(Parser)]
#[command(name = "course-catalog")]
#[command(version)]
#[command(about = "Generate a static course catalog from a headless CMS", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Content API connection, read from the environment or a .env file
#[derive(Args)]
struct ApiArgs {
    /// Base URL of the content API
    #[arg(long, env = "STRAPI_API_URL")]
    api_url: Option<String>,

    /// Bearer token for server-side requests
    #[arg(long, env = "SSR_TOKEN", hide_env_values = true)]
    token: Option<String>,
}

impl ApiArgs {
    fn validate(&self) -> Result<ApiConfig> {
        Ok(ApiConfig::new(self.api_url.as_deref(), self.token.as_deref())?)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new catalog site
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        folder: PathBuf,
    },

    /// Fetch courses and generate static files
    #[command(alias = "g")]
    Generate {
        #[command(flatten)]
        api: ApiArgs,

        /// Watch for file changes
        #[arg(short, long)]
        watch: bool,
    },

    /// Generate, then serve the public folder locally
    #[command(alias = "s")]
    Server {
        #[command(flatten)]
        api: ApiArgs,

        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,

        /// Enable static mode (no file watching)
        #[arg(long)]
        r#static: bool,
    },

    /// Clean the public folder
    Clean,

    /// List the courses returned by the content API
    List {
        #[command(flatten)]
        api: ApiArgs,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (before clap parses env vars)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "course_catalog=debug,info"
    } else {
        "course_catalog=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::Init { folder } => {
            let target_dir = if folder.is_absolute() {
                folder
            } else {
                base_dir.join(folder)
            };
            course_catalog::commands::init::init_site(&target_dir)?;
            println!("Initialized course catalog in {:?}", target_dir);
        }

        Commands::Generate { api, watch } => {
            let api = api.validate()?;
            let site = Site::new(&base_dir)?;
            tracing::info!("Generating static files...");

            let report = site.generate(&api).await?;
            println!("Generated {} courses successfully!", report.courses);

            if watch {
                course_catalog::commands::generate::watch(base_dir, api, |report| {
                    println!("Regenerated {} courses", report.courses);
                })
                .await?;
            }
        }

        Commands::Server {
            api,
            port,
            ip,
            r#static,
        } => {
            let api = api.validate()?;
            let site = Site::new(&base_dir)?;

            // Generate first
            tracing::info!("Generating static files...");
            site.generate(&api).await?;

            tracing::info!("Starting server at http://{}:{}", ip, port);
            course_catalog::server::start(&site, &api, &ip, port, !r#static).await?;
        }

        Commands::Clean => {
            let site = Site::new(&base_dir)?;
            tracing::info!("Cleaning public folder...");
            site.clean()?;
            println!("Cleaned successfully!");
        }

        Commands::List { api } => {
            let api = api.validate()?;
            let site = Site::new(&base_dir)?;
            course_catalog::commands::list::run(&site, &api).await?;
        }

        Commands::Version => {
            println!("course-catalog version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
