//! CLI entry point for minhified

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "minhified")]
#[command(author = "Minh Ha")]
#[command(version = "0.2.0")]
#[command(about = "A self-hosted blog engine that serves markdown articles", long_about = None)]
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

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new blog
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        folder: PathBuf,
    },

    /// Create a new article
    New {
        /// Title of the new article
        title: String,
    },

    /// Generate static files
    #[command(alias = "g")]
    Generate {
        /// Watch for file changes
        #[arg(short, long)]
        watch: bool,
    },

    /// Start a local server
    #[command(alias = "s")]
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,

        /// Open browser automatically
        #[arg(short, long)]
        open: bool,

        /// Enable static mode (no file watching)
        #[arg(long)]
        r#static: bool,
    },

    /// Clean the public folder
    Clean,

    /// List blog content
    List {
        /// Type of content to list (article, tag)
        #[arg(default_value = "article")]
        r#type: String,
    },

    /// Verify that every article resolves to metadata and a body
    Check,

    /// Display version information
    Version,
}

/// Initialize tracing with an env-filter; RUST_LOG wins when set
fn init_logging(debug: bool) {
    let default_filter = if debug {
        "minhified=debug,info"
    } else {
        "minhified=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.debug);

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
            tracing::info!("Initializing blog in {:?}", target_dir);
            minhified::commands::init::init_site(&target_dir)?;
            println!("Initialized empty blog in {:?}", target_dir);
        }

        Commands::New { title } => {
            let blog = minhified::Blog::new(&base_dir)?;
            tracing::info!("Creating new article: {}", title);
            minhified::commands::new::run(&blog, &title)?;
        }

        Commands::Generate { watch } => {
            let blog = minhified::Blog::new(&base_dir)?;
            tracing::info!("Generating static files...");

            minhified::commands::generate::run(&blog)?;
            println!("Generated successfully!");

            if watch {
                tracing::info!("Watching for file changes...");
                minhified::commands::generate::watch(&blog).await?;
            }
        }

        Commands::Serve {
            port,
            ip,
            open,
            r#static,
        } => {
            let blog = minhified::Blog::new(&base_dir)?;

            tracing::info!("Starting server at http://{}:{}", ip, port);
            minhified::server::start(&blog, &ip, port, !r#static, open).await?;
        }

        Commands::Clean => {
            let blog = minhified::Blog::new(&base_dir)?;
            tracing::info!("Cleaning public folder...");
            blog.clean()?;
            println!("Cleaned successfully!");
        }

        Commands::List { r#type } => {
            let blog = minhified::Blog::new(&base_dir)?;
            minhified::commands::list::run(&blog, &r#type)?;
        }

        Commands::Check => {
            let blog = minhified::Blog::new(&base_dir)?;
            minhified::commands::check::run(&blog)?;
        }

        Commands::Version => {
            println!("minhified version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
