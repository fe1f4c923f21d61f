//! CLI binary for docchat.
//!
//! A thin shim over the library crate: load one document, then run a
//! read-question/print-answer loop on the terminal until EOF or `exit`.

use anyhow::{Context, Result};
use clap::Parser;
use docchat::{DocChatConfig, Session};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────

fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}

/// Chat with a PDF or Word document through a local vision LLM.
#[derive(Parser, Debug)]
#[command(name = "docchat", version, about, long_about = None)]
struct Cli {
    /// Document to load (.pdf or .docx)
    file: PathBuf,

    /// Chat model identifier
    #[arg(short, long, default_value = "llava:7b", env = "DOCCHAT_MODEL")]
    model: String,

    /// Base URL of the Ollama-compatible endpoint
    #[arg(
        long,
        default_value = "http://localhost:11434",
        env = "DOCCHAT_BASE_URL"
    )]
    base_url: String,

    /// Tesseract language code for OCR
    #[arg(long, default_value = "eng")]
    ocr_lang: String,

    /// Concurrent OCR invocations during normalization
    #[arg(long, default_value_t = 4)]
    ocr_concurrency: usize,

    /// Password for encrypted PDFs
    #[arg(long)]
    password: Option<String>,

    /// Per-question timeout in seconds
    #[arg(long, default_value_t = 120)]
    timeout: u64,

    /// Verbose logging (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let extension = cli
        .file
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_string();
    let bytes = std::fs::read(&cli.file)
        .with_context(|| format!("reading {}", cli.file.display()))?;

    let mut builder = DocChatConfig::builder()
        .model(&cli.model)
        .base_url(&cli.base_url)
        .ocr_language(&cli.ocr_lang)
        .ocr_concurrency(cli.ocr_concurrency)
        .api_timeout_secs(cli.timeout);
    if let Some(ref pwd) = cli.password {
        builder = builder.password(pwd);
    }
    let config = builder.build()?;

    let mut session = Session::new(config);

    eprintln!(
        "{} Extracting document data from {}…",
        cyan("◆"),
        bold(&cli.file.display().to_string())
    );
    session.load_document(&bytes, &extension).await?;

    let doc = session.document().expect("document bound after load");
    eprintln!(
        "{} Document processed ({} bytes text, {} bytes image text). Start chatting!",
        cyan("◆"),
        doc.raw_text.len(),
        doc.image_derived_text.len()
    );
    eprintln!(
        "{}",
        dim("Type a question, /history to replay the conversation, exit to quit.")
    );

    repl(&mut session, &cli.model).await
}

/// Blocking question loop: one question in flight at a time, answers and
/// dispatch errors both printed as ordinary replies.
async fn repl(session: &mut Session, model: &str) -> Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("{} ", bold(">"));
        io::stdout().flush().ok();

        let Some(line) = lines.next() else {
            break; // EOF
        };
        let question = line.context("reading stdin")?;
        let question = question.trim();

        match question {
            "" => continue,
            "exit" | "quit" => break,
            "/history" => {
                for turn in session.history() {
                    println!("{} {}", bold("You:"), turn.question);
                    println!("{} {}\n", bold(&format!("{model}:")), turn.answer);
                }
                continue;
            }
            _ => {}
        }

        eprintln!("{}", dim("thinking…"));
        if let Some(answer) = session.ask(question).await {
            println!("{} {}\n", bold(&format!("{model}:")), answer);
        }
    }

    Ok(())
}

fn init_tracing(verbosity: u8) {
    let default = match verbosity {
        0 => "warn",
        1 => "docchat=info",
        _ => "docchat=debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}
