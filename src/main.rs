//! CLI entry point for blogsmith

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use blogsmith::content::PostFilter;
use blogsmith::llm::{DraftRequest, Length};

#[derive(Parser)]
#[command(name = "blogsmith")]
#[command(version)]
#[command(about = "A static blog toolkit: render, generate, draft and publish markdown posts", long_about = None)]
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
    /// Initialize a new blog site
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        folder: PathBuf,
    },

    /// Render a markdown file to HTML
    Render {
        /// Markdown file to render
        file: PathBuf,

        /// Print the metadata and HTML as JSON
        #[arg(long)]
        json: bool,
    },

    /// List posts, newest first
    List {
        /// Case-insensitive text to find in titles, excerpts and tags
        #[arg(short, long)]
        search: Option<String>,

        /// Only posts in this category
        #[arg(long)]
        category: Option<String>,

        /// Only posts with this tag
        #[arg(short, long)]
        tag: Option<String>,

        /// Only the featured (most recent) posts
        #[arg(short, long)]
        featured: bool,
    },

    /// Print the rendered HTML of one post
    Show {
        /// Post id from the index
        id: String,
    },

    /// Generate static files
    #[command(alias = "g")]
    Generate,

    /// Generate, then start a local server
    #[command(alias = "s")]
    Server {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,
    },

    /// Clean the public folder
    Clean,

    /// Ask a language model for a post draft
    Draft {
        /// What the post is about
        #[arg(long)]
        topic: String,

        /// Writing tone
        #[arg(long, default_value = "professional")]
        tone: String,

        /// short, medium or long
        #[arg(long, default_value = "medium")]
        length: String,

        /// Save the draft into this directory instead of printing it
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Chat-completion API key
        #[arg(long, env = "LLM_API_KEY", hide_env_values = true)]
        api_key: Option<String>,
    },

    /// Publish a markdown draft to the GitHub repository
    Publish {
        /// Markdown file with front matter
        file: PathBuf,

        /// GitHub token with contents write access
        #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
        token: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "blogsmith=debug,info"
    } else {
        "blogsmith=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
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
            tracing::info!("Initializing blog in {:?}", target_dir);
            blogsmith::commands::init::init_site(&target_dir)?;
            println!("Initialized blog in {:?}", target_dir);
        }

        Commands::Render { file, json } => {
            blogsmith::commands::render::run(&base_dir.join(file), json)?;
        }

        Commands::List {
            search,
            category,
            tag,
            featured,
        } => {
            let blog = blogsmith::Blog::new(&base_dir)?;
            let filter = PostFilter {
                search,
                category,
                tag,
            };
            blogsmith::commands::list::run(&blog, &filter, featured)?;
        }

        Commands::Show { id } => {
            let blog = blogsmith::Blog::new(&base_dir)?;
            blogsmith::commands::show::run(&blog, &id)?;
        }

        Commands::Generate => {
            let blog = blogsmith::Blog::new(&base_dir)?;
            tracing::info!("Generating static files...");
            blog.generate()?;
            println!("Generated successfully!");
        }

        Commands::Server { port, ip } => {
            let blog = blogsmith::Blog::new(&base_dir)?;

            // Generate first
            tracing::info!("Generating static files...");
            blog.generate()?;

            tracing::info!("Starting server at http://{}:{}", ip, port);
            blogsmith::server::start(&blog, &ip, port).await?;
        }

        Commands::Clean => {
            let blog = blogsmith::Blog::new(&base_dir)?;
            tracing::info!("Cleaning public folder...");
            blog.clean()?;
            println!("Cleaned successfully!");
        }

        Commands::Draft {
            topic,
            tone,
            length,
            output,
            api_key,
        } => {
            let blog = blogsmith::Blog::new(&base_dir)?;
            let request = DraftRequest {
                topic,
                tone,
                length: Length::parse(&length),
            };
            let output = output.map(|dir| base_dir.join(dir));
            blogsmith::commands::draft::run(&blog, &request, api_key, output.as_deref()).await?;
        }

        Commands::Publish { file, token } => {
            let blog = blogsmith::Blog::new(&base_dir)?;
            tracing::info!("Publishing {:?}", file);
            blogsmith::commands::publish::run(&blog, &base_dir.join(file), token).await?;
            println!("Published successfully!");
        }
    }

    Ok(())
}
