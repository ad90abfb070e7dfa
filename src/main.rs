use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use docbranch::config::Config;
use docbranch::extract::{ExtractedText, PlainTextExtractor, TextExtractor};
use docbranch::generator::GeminiClient;
use docbranch::models::CreateDocumentInput;
use docbranch::orchestrator::Orchestrator;
use docbranch::summary::{self, SummaryOptions};
use docbranch::text::sections::{structure_sections, HeuristicClassifier};
use docbranch::text::{chunk, select_context};
use docbranch::text::prepare::truncate_text;
use docbranch::{api, db};

#[derive(Parser)]
#[command(name = "docbranch")]
#[command(about = "Ask questions about documents and explore the answers as a branching tree")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API server
    Serve {
        /// Port for HTTP API
        #[arg(short, long, default_value = "3000")]
        port: u16,
    },
    /// Store a text document (pages separated by form feeds)
    Ingest {
        file: PathBuf,

        /// Document title (defaults to the file name)
        #[arg(short, long)]
        title: Option<String>,
    },
    /// Ask a question about a stored document
    Ask {
        document_id: Uuid,
        question: String,

        /// Branch to continue from; omit to start a new root
        #[arg(short, long)]
        parent: Option<Uuid>,

        /// Context budget in characters
        #[arg(long)]
        max_context: Option<usize>,
    },
    /// Print the conversation tree of a stored document
    Tree {
        document_id: Uuid,

        /// Branch to mark as current
        #[arg(short, long)]
        current: Option<Uuid>,
    },
    /// Summarize a stored document, or one conversation path with --branch
    Summarize {
        document_id: Uuid,

        #[arg(short, long)]
        branch: Option<Uuid>,
    },
    /// Split a text file into overlapping chunks and print their offsets
    Chunk {
        file: PathBuf,

        #[arg(long)]
        chunk_size: Option<usize>,

        #[arg(long)]
        overlap: Option<usize>,
    },
    /// Print the context that would be sent with a question
    Context {
        file: PathBuf,
        question: String,

        #[arg(long)]
        max_context: Option<usize>,
    },
    /// Print the heading outline of a text file
    Sections { file: PathBuf },
}

/// Initialize tracing with output to stderr (for one-shot commands) or stdout
fn init_tracing(use_stderr: bool) {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "docbranch=debug,tower_http=debug".into()),
    );

    if use_stderr {
        // One-shot commands print results on stdout
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

fn open_database(config: &Config) -> anyhow::Result<db::Database> {
    let db = match &config.database_path {
        Some(path) => db::Database::open(path.clone())?,
        None => db::Database::open_default()?,
    };
    db.migrate()?;
    Ok(db)
}

fn read_text_file(path: &Path) -> anyhow::Result<ExtractedText> {
    let bytes = std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    PlainTextExtractor
        .extract(&bytes)
        .with_context(|| format!("Failed to extract text from {}", path.display()))
}

fn orchestrator(config: &Config) -> Orchestrator {
    Orchestrator::new(
        Arc::new(GeminiClient::new(config.gemini.clone())),
        config.retrieval,
    )
}

async fn serve(config: Config, port: u16) -> anyhow::Result<()> {
    tracing::info!("Starting docbranch server on port {}", port);

    let db = open_database(&config)?;
    let state = api::AppState::new(db, orchestrator(&config));
    let app = api::create_router(state);

    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port)).await?;
    tracing::info!("docbranch server listening on http://127.0.0.1:{}", port);

    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let use_stderr = !matches!(cli.command, None | Some(Commands::Serve { .. }));
    init_tracing(use_stderr);

    let mut config = Config::from_env();

    match cli.command {
        Some(Commands::Serve { port }) => serve(config, port).await?,
        None => serve(config, 3000).await?,
        Some(Commands::Ingest { file, title }) => {
            let extracted = read_text_file(&file)?;
            let title = title.unwrap_or_else(|| {
                file.file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "Untitled".to_string())
            });

            let db = open_database(&config)?;
            let document = db.create_document(CreateDocumentInput {
                title,
                text: extracted.full_text,
                pages: extracted.pages,
            })?;
            println!("{}", document.id);
        }
        Some(Commands::Ask {
            document_id,
            question,
            parent,
            max_context,
        }) => {
            if let Some(max) = max_context {
                config.retrieval.max_context_length = max;
            }
            let db = open_database(&config)?;
            let document = db
                .get_document(document_id)?
                .ok_or_else(|| anyhow::anyhow!("Document not found: {}", document_id))?;
            let mut tree = db.load_branch_tree(document_id)?;

            let exchange = orchestrator(&config)
                .ask(&mut tree, &document.full_text, &question, parent)
                .await?;
            if let Some(branch) = tree.get(exchange.id) {
                db.insert_branch(document_id, branch)?;
            }

            println!("{}\n\n[branch {}]", exchange.answer, exchange.id);
        }
        Some(Commands::Tree {
            document_id,
            current,
        }) => {
            let db = open_database(&config)?;
            let mut tree = db.load_branch_tree(document_id)?;
            if let Some(id) = current {
                if !tree.contains(id) {
                    anyhow::bail!("Branch not found: {}", id);
                }
                tree.select_branch(id);
            }
            if tree.is_empty() {
                println!("No questions asked yet.");
            } else {
                print!("{}", tree.render());
            }
        }
        Some(Commands::Summarize {
            document_id,
            branch,
        }) => {
            let db = open_database(&config)?;
            let orchestrator = orchestrator(&config);
            let document = db
                .get_document(document_id)?
                .ok_or_else(|| anyhow::anyhow!("Document not found: {}", document_id))?;
            let (title, content) = match branch {
                Some(branch_id) => {
                    let tree = db.load_branch_tree(document_id)?;
                    let content = orchestrator
                        .summarize_path(&tree, branch_id, &SummaryOptions::default())
                        .await?;
                    let title = tree
                        .get(branch_id)
                        .map(|b| truncate_text(&b.question, summary::TITLE_CHARS))
                        .unwrap_or_default();
                    (title, content)
                }
                None => (
                    document.title.clone(),
                    orchestrator.summarize_document(&document.full_text).await?,
                ),
            };
            let saved = db.save_summary(document_id, branch, &title, &content)?;
            println!("{}\n\n[summary {}]", saved.content, saved.id);
        }
        Some(Commands::Chunk {
            file,
            chunk_size,
            overlap,
        }) => {
            let text = read_text_file(&file)?.full_text;
            let mut options = config.retrieval.chunk_options();
            options.chunk_size = chunk_size.unwrap_or(options.chunk_size);
            options.overlap = overlap.unwrap_or(options.overlap);

            for (i, c) in chunk(&text, options).iter().enumerate() {
                println!("{:>4}  {:>8}..{:<8}  {} chars", i, c.start_offset, c.end_offset, c.len());
            }
        }
        Some(Commands::Context {
            file,
            question,
            max_context,
        }) => {
            let text = read_text_file(&file)?.full_text;
            let max = max_context.unwrap_or(config.retrieval.max_context_length);
            let context = select_context(&text, &question, max);
            if context.is_empty() {
                eprintln!("No passage mentions any of the question's words.");
            } else {
                println!("{}", context);
            }
        }
        Some(Commands::Sections { file }) => {
            let text = read_text_file(&file)?.full_text;
            for section in structure_sections(&text, &HeuristicClassifier) {
                let indent = "  ".repeat(section.level.saturating_sub(1) as usize);
                println!("{}{}", indent, section.title);
            }
        }
    }

    Ok(())
}
