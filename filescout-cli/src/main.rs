use clap::Parser;
use colored::Colorize;
use filescout::{
    config, CancellationToken, SearchMatch, SearchOptions, SearchProgress,
};
use std::io::{self, Write};
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::time::SystemTime;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Find files by name, metadata, and content")]
struct Cli {
    /// Root directory to search in
    #[arg(default_value = ".")]
    root: PathBuf,

    /// Wildcard file-name pattern (* and ?)
    #[arg(short = 'n', long)]
    name: Option<String>,

    /// Extensions to include, semicolon or comma separated (e.g. "txt;md,.rs")
    #[arg(short = 'e', long)]
    extensions: Option<String>,

    /// Only files modified on or after this date (e.g. 2024-01-01)
    #[arg(long)]
    from: Option<String>,

    /// Only files modified on or before this date, extended to end of day
    #[arg(long)]
    to: Option<String>,

    /// Do not descend into subdirectories
    #[arg(long)]
    no_recurse: bool,

    /// Case-insensitive text to look for inside matching files
    #[arg(short = 'c', long = "contains")]
    query: Option<String>,

    /// Number of worker threads (default: 2x CPU cores)
    #[arg(short = 'j', long)]
    threads: Option<NonZeroUsize>,

    /// YAML config file providing defaults for the flags above
    #[arg(long)]
    config: Option<PathBuf>,

    /// Suppress the progress line
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let options = match &cli.config {
        Some(path) => {
            SearchOptions::load_from(Some(path))?.merge_with_cli(options_from_cli(&cli)?)
        }
        None => options_from_cli(&cli)?,
    };

    debug!(
        "searching {} with {} workers",
        options.root_path.display(),
        options.effective_thread_count()
    );

    let quiet = cli.quiet;
    let sink = move |progress: SearchProgress| {
        if !quiet {
            eprint!("\r{} files scanned", progress.processed_files);
            let _ = io::stderr().flush();
        }
    };

    let token = CancellationToken::new();
    let matches = match filescout::search(&options, &sink, &token) {
        Ok(matches) => matches,
        Err(e) if e.is_cancelled() => {
            eprintln!("\nsearch cancelled");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    if !quiet {
        eprintln!();
    }
    render(&matches);
    Ok(())
}

fn options_from_cli(cli: &Cli) -> anyhow::Result<SearchOptions> {
    let mut options = SearchOptions::new(&cli.root);
    options.name_pattern = cli.name.clone();
    options.extensions = cli
        .extensions
        .as_deref()
        .and_then(config::parse_extension_list);
    options.modified_after = cli.from.as_deref().map(parse_date).transpose()?;
    options.modified_before = cli
        .to
        .as_deref()
        .map(parse_date)
        .transpose()?
        .map(config::extend_to_end_of_day);
    options.recurse = !cli.no_recurse;
    options.content_query = cli.query.clone();
    options.thread_count = cli.threads;
    Ok(options)
}

/// Accepts either a full RFC3339 timestamp or a bare date, which is read as
/// the start of that day.
fn parse_date(s: &str) -> anyhow::Result<SystemTime> {
    humantime::parse_rfc3339_weak(s)
        .or_else(|_| humantime::parse_rfc3339_weak(&format!("{s} 00:00:00")))
        .map_err(|e| anyhow::anyhow!("invalid date '{s}': {e}"))
}

fn render(matches: &[SearchMatch]) {
    for found in matches {
        let when = humantime::format_rfc3339_seconds(found.modified);
        println!(
            "{}  {:>12}  {}  {}",
            when,
            found.size,
            found.attributes.dimmed(),
            found.path.display().to_string().bold()
        );
        if let Some(snippet) = &found.snippet {
            println!("    {}", snippet.green());
        }
    }
    println!("{} matching files", matches.len().to_string().cyan());
}
