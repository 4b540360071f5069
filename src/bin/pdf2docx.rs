//! CLI binary for edgequake-pdf2docx.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `ConversionConfig` / `ServerConfig`, then either converts a batch once or
//! runs the HTTP upload service.

use anyhow::{Context, Result};
use clap::Parser;
use edgequake_pdf2docx::server::{serve, AppState};
use edgequake_pdf2docx::{
    convert_to_file, ConversionConfig, ConversionProgressCallback, ProgressCallback, ServerConfig,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashMap;
use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"];

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: a live bar plus one log line per document.
/// Documents finish in any order and names may repeat, so timings are
/// keyed by batch index.
struct CliProgressCallback {
    bar: ProgressBar,
    start_times: Mutex<HashMap<usize, Instant>>,
    errors: AtomicUsize,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} files  \
             ⏱ {elapsed_precise}  ETA {eta_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(TICKS);

        bar.set_style(style);
        bar.set_prefix("Converting");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            start_times: Mutex::new(HashMap::new()),
            errors: AtomicUsize::new(0),
        })
    }

    fn elapsed_secs(&self, index: usize) -> f64 {
        self.start_times
            .lock()
            .ok()
            .and_then(|mut m| m.remove(&index))
            .map(|t| t.elapsed().as_secs_f64())
            .unwrap_or(0.0)
    }
}

impl ConversionProgressCallback for CliProgressCallback {
    fn on_batch_start(&self, total_documents: usize) {
        self.bar.set_length(total_documents as u64);
        self.bar.reset_eta();
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Converting {total_documents} files…"))
        ));
    }

    fn on_document_start(&self, index: usize, name: &str, _total: usize) {
        if let Ok(mut m) = self.start_times.lock() {
            m.insert(index, Instant::now());
        }
        self.bar.set_message(name.to_string());
    }

    fn on_document_complete(&self, index: usize, name: &str, _total: usize, docx_len: usize) {
        let secs = self.elapsed_secs(index);
        self.bar.println(format!(
            "  {} {:<40}  {}  {}",
            green("✓"),
            name,
            dim(&format!("{docx_len:>8} bytes")),
            dim(&format!("{secs:.1}s")),
        ));
        self.bar.inc(1);
    }

    fn on_document_error(&self, index: usize, name: &str, _total: usize, error: &str) {
        let secs = self.elapsed_secs(index);
        self.errors.fetch_add(1, Ordering::SeqCst);

        // Keep very long diagnostics on one line.
        let msg = if error.chars().count() > 80 {
            format!("{}…", error.chars().take(79).collect::<String>())
        } else {
            error.to_string()
        };

        self.bar.println(format!(
            "  {} {:<40}  {}  {}",
            red("✗"),
            name,
            red(&msg),
            dim(&format!("{secs:.1}s")),
        ));
        self.bar.inc(1);
    }

    fn on_batch_complete(&self, total_documents: usize, success_count: usize) {
        let failed = total_documents.saturating_sub(success_count);
        self.bar.finish_and_clear();

        if failed == 0 {
            eprintln!(
                "{} {} files converted successfully",
                green("✔"),
                bold(&success_count.to_string())
            );
        } else {
            eprintln!(
                "{} {}/{} files converted  ({} failed)",
                if failed == total_documents {
                    red("✘")
                } else {
                    cyan("⚠")
                },
                bold(&success_count.to_string()),
                total_documents,
                red(&failed.to_string()),
            );
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Convert two files into converted_files.zip
  pdf2docx report.pdf invoice.pdf

  # Choose the archive path
  pdf2docx scans/*.pdf -o out/batch.zip

  # Convert from URL
  pdf2docx https://arxiv.org/pdf/1706.03762.pdf

  # Bound parallelism and give each file at most 30 seconds
  pdf2docx --concurrency 4 --timeout 30 big/*.pdf

  # JSON summary on stdout
  pdf2docx --json *.pdf > summary.json

  # Run the upload service (POST /api/convert, field "files")
  pdf2docx --serve --bind 0.0.0.0:3000 --persist-dir /app/converted_files

ARCHIVE LAYOUT:
  report.pdf   →  report.docx
  broken.pdf   →  broken.pdf.error.txt   ("Conversion failed: …")
  Duplicate names get -2, -3, … before the extension, in submission order.

ENVIRONMENT VARIABLES:
  PDF2DOCX_OUTPUT, PDF2DOCX_CONCURRENCY, PDF2DOCX_TIMEOUT, PDF2DOCX_MAX_SIZE_MB,
  PDF2DOCX_BIND, PDF2DOCX_PERSIST_DIR, PDF2DOCX_NO_PERSIST, PDF2DOCX_VERBOSE
  RUST_LOG overrides the log filter.
"#;

/// Batch-convert PDF files and URLs to DOCX, packaged in a ZIP archive.
#[derive(Parser, Debug)]
#[command(
    name = "pdf2docx",
    version,
    about = "Batch-convert PDF files and URLs to DOCX, packaged in a ZIP archive",
    long_about = "Convert one or more PDF documents (local files or URLs) to Word documents. \
Every input gets an entry in the output ZIP: a .docx on success or a .error.txt explaining \
the failure. Can also run as an HTTP upload service.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Local PDF file paths or HTTP/HTTPS URLs.
    #[arg(required_unless_present = "serve")]
    inputs: Vec<String>,

    /// Write the ZIP archive to this path.
    #[arg(
        short,
        long,
        env = "PDF2DOCX_OUTPUT",
        default_value = "converted_files.zip"
    )]
    output: PathBuf,

    /// Run the HTTP upload service instead of converting once.
    #[arg(long, conflicts_with = "inputs")]
    serve: bool,

    /// Listen address for --serve.
    #[arg(long, env = "PDF2DOCX_BIND", default_value = "0.0.0.0:3000")]
    bind: String,

    /// Maximum files converted at once (default: all of them).
    #[arg(short, long, env = "PDF2DOCX_CONCURRENCY")]
    concurrency: Option<usize>,

    /// Per-file time budget in seconds (default: none).
    #[arg(long, env = "PDF2DOCX_TIMEOUT")]
    timeout: Option<u64>,

    /// Per-file size ceiling in MiB.
    #[arg(long, env = "PDF2DOCX_MAX_SIZE_MB", default_value_t = 100)]
    max_size_mb: u64,

    /// Ceiling for the finished archive in MiB (default: none).
    #[arg(long, env = "PDF2DOCX_MAX_ARCHIVE_MB")]
    max_archive_mb: Option<u64>,

    /// Directory for durable archive copies in --serve mode.
    #[arg(long, env = "PDF2DOCX_PERSIST_DIR", default_value = "/app/converted_files")]
    persist_dir: PathBuf,

    /// Do not keep durable archive copies in --serve mode.
    #[arg(long, env = "PDF2DOCX_NO_PERSIST")]
    no_persist: bool,

    /// HTTP download timeout in seconds for URL inputs.
    #[arg(long, env = "PDF2DOCX_DOWNLOAD_TIMEOUT", default_value_t = 120)]
    download_timeout: u64,

    /// Print a JSON summary (entries + stats) on stdout.
    #[arg(long, env = "PDF2DOCX_JSON")]
    json: bool,

    /// Disable progress bar.
    #[arg(long, env = "PDF2DOCX_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDF2DOCX_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "PDF2DOCX_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The progress bar replaces INFO logs in one-shot mode; the service
    // always logs at INFO.
    let show_progress = !cli.serve && !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let progress_cb: Option<ProgressCallback> = if show_progress {
        Some(CliProgressCallback::new() as Arc<dyn ConversionProgressCallback>)
    } else {
        None
    };

    let config = build_config(&cli, progress_cb)?;

    // ── Service mode ─────────────────────────────────────────────────────
    if cli.serve {
        let server = ServerConfig {
            bind_addr: cli.bind.clone(),
            persist_dir: (!cli.no_persist).then(|| cli.persist_dir.clone()),
            ..ServerConfig::default()
        };
        serve(AppState::new(config, server))
            .await
            .context("Server failed")?;
        return Ok(());
    }

    // ── One-shot conversion ──────────────────────────────────────────────
    let output = convert_to_file(&cli.inputs, &cli.output, &config)
        .await
        .context("Conversion failed")?;

    if cli.json {
        let summary = serde_json::json!({
            "output": cli.output,
            "entries": output.entries,
            "stats": output.stats,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&summary).context("Failed to serialise summary")?
        );
    } else if !cli.quiet {
        let stats = &output.stats;
        if !show_progress {
            for entry in output.entries.iter().filter(|e| !e.success) {
                eprintln!("  {} {}", red("✗"), entry.source_name);
            }
        }
        eprintln!(
            "{}  {}/{} files  {}ms  →  {}",
            if stats.failed == 0 {
                green("✔")
            } else {
                cyan("⚠")
            },
            stats.succeeded,
            stats.total_documents,
            stats.total_duration_ms,
            bold(&cli.output.display().to_string()),
        );
        eprintln!(
            "   {}",
            dim(&format!("{} byte archive", stats.archive_bytes))
        );
    }

    Ok(())
}

/// Map CLI args to `ConversionConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<ConversionConfig> {
    let max_bytes = cli
        .max_size_mb
        .checked_mul(1024 * 1024)
        .context("--max-size-mb is too large")?;

    let mut builder = ConversionConfig::builder()
        .max_document_bytes(max_bytes)
        .download_timeout_secs(cli.download_timeout);

    if let Some(n) = cli.concurrency {
        builder = builder.concurrency(n);
    }
    if let Some(secs) = cli.timeout {
        builder = builder.document_timeout_secs(secs);
    }
    if let Some(mb) = cli.max_archive_mb {
        let bytes = mb
            .checked_mul(1024 * 1024)
            .context("--max-archive-mb is too large")?;
        builder = builder.max_archive_bytes(bytes);
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}
