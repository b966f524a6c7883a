//! CLI tool for generating PowerPoint decks from Wikipedia articles.

use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::Parser;
use reqwest::blocking::Client;
use url::Url;

use wikideck_article::{build_client, fetch_article, segment_article, HttpImageFetcher};
use wikideck_core::DeckAssembler;
use wikideck_llm::{OpenAiSummarizer, SummarizerConfig};
use wikideck_pptx::{deck_filename, write_deck};

const OPENSEARCH_ENDPOINT: &str = "https://en.wikipedia.org/w/api.php";
const SEARCH_LIMIT: usize = 5;

/// Generate a PowerPoint deck from a Wikipedia article.
#[derive(Parser, Debug)]
#[command(name = "wikideck")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Topic to search for (prompted interactively when omitted)
    topic: Option<String>,

    /// Output directory for the deck and downloaded images (default: current directory)
    #[arg(short, long, default_value = ".")]
    output: PathBuf,

    /// Pick the Nth search result instead of the first (1-based)
    #[arg(short, long, default_value = "1")]
    pick: usize,

    /// Model name, overriding the WIKIDECK_MODEL environment variable
    #[arg(short, long)]
    model: Option<String>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(default_log_filter(args.verbose)),
    )
    .init();

    let started = Instant::now();

    let query = match &args.topic {
        Some(topic) => topic.clone(),
        None => prompt_topic()?,
    };
    if query.trim().is_empty() {
        bail!("No topic given");
    }

    let mut config = SummarizerConfig::from_env().context("Summarizer configuration")?;
    if let Some(model) = &args.model {
        config.model = model.clone();
    }
    let summarizer = OpenAiSummarizer::new(config)?;

    let client = build_client().context("Failed to build HTTP client")?;
    let (title, article_url) = resolve_topic(&client, &query, args.pick)?;
    eprintln!("Generating deck for '{}' ({})", title, article_url);

    std::fs::create_dir_all(&args.output)
        .with_context(|| format!("Failed to create output directory: {}", args.output.display()))?;

    let html = fetch_article(&client, &article_url)
        .with_context(|| format!("Failed to fetch {}", article_url))?;

    let fetcher = HttpImageFetcher::new(client);
    let segmented = segment_article(&html, &article_url, &args.output, &fetcher);
    if args.verbose {
        eprintln!("  Found {} sections", segmented.sections.len());
    }

    let assembler = DeckAssembler::new(&summarizer);
    let deck = assembler
        .assemble(&title, segmented.sections, segmented.references)
        .context("Failed to assemble deck")?;

    let output_path = deck_filename(&args.output, &title);
    write_deck(&deck, &output_path)
        .with_context(|| format!("Failed to write {}", output_path.display()))?;

    println!(
        "Wrote {} ({} slides) in {:.1}s",
        output_path.display(),
        deck.slides.len(),
        started.elapsed().as_secs_f64()
    );

    Ok(())
}

/// Default log filter: `info` keeps the per-slide progress lines visible on
/// a plain run; `--verbose` adds the per-stage detail.
fn default_log_filter(verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else {
        "info"
    }
}

/// Read a topic from stdin when none was given on the command line.
fn prompt_topic() -> Result<String> {
    print!("Topic: ");
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin()
        .read_line(&mut line)
        .context("Failed to read topic from stdin")?;
    Ok(line.trim().to_string())
}

/// Resolve a free-form query to an article title and URL via the opensearch
/// endpoint. `pick` selects among up to [`SEARCH_LIMIT`] candidates, 1-based.
fn resolve_topic(client: &Client, query: &str, pick: usize) -> Result<(String, Url)> {
    let response = client
        .get(OPENSEARCH_ENDPOINT)
        .query(&[
            ("action", "opensearch"),
            ("search", query),
            ("limit", &SEARCH_LIMIT.to_string()),
            ("format", "json"),
        ])
        .send()
        .context("Topic search request failed")?;

    if !response.status().is_success() {
        bail!("Topic search returned http status {}", response.status());
    }

    let data: serde_json::Value = response
        .json()
        .context("Topic search returned invalid JSON")?;

    // Opensearch shape: [query, [titles...], [descriptions...], [urls...]]
    let titles = data
        .get(1)
        .and_then(|v| v.as_array())
        .context("Topic search response missing titles")?;
    let urls = data
        .get(3)
        .and_then(|v| v.as_array())
        .context("Topic search response missing urls")?;

    if titles.is_empty() {
        bail!("No article found for '{}'", query);
    }

    log::debug!("search candidates for '{}':", query);
    for (idx, candidate) in titles.iter().enumerate() {
        log::debug!("  {}. {}", idx + 1, candidate.as_str().unwrap_or(""));
    }

    if pick == 0 || pick > titles.len() {
        bail!(
            "--pick {} is out of range; {} candidate(s) found",
            pick,
            titles.len()
        );
    }

    let title = titles[pick - 1]
        .as_str()
        .context("Topic search title is not a string")?
        .to_string();
    let url_str = urls
        .get(pick - 1)
        .and_then(|v| v.as_str())
        .context("Topic search url is not a string")?;
    let url = Url::parse(url_str).context("Topic search returned an invalid url")?;

    Ok((title, url))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_shows_progress_lines() {
        // Per-slide progress is logged at info; a plain run must surface it.
        assert_eq!(default_log_filter(false), "info");
        assert_eq!(default_log_filter(true), "debug");
    }
}
