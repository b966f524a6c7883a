//! Summarization client.
//!
//! Implements [`wikideck_core::Summarizer`] against an OpenAI-style
//! chat-completions endpoint: deterministic (temperature 0), bounded
//! output tokens, strict shape validation on the response, and truncation
//! of oversized inputs before submission.

use std::time::Duration;

use reqwest::blocking::Client;
use wikideck_core::{Error, Result, Summarizer};

/// Inputs longer than this are truncated before submission.
const INPUT_CAP_CHARS: usize = 7500;

/// Leading slice kept when truncating (intro context).
const HEAD_CHARS: usize = 5000;

/// Trailing slice kept when truncating (conclusion context).
const TAIL_CHARS: usize = 2500;

/// Marker joining the kept slices.
const OMISSION_MARKER: &str = "\n[...]\n";

/// Bullet-line contract bounds.
const MIN_BULLETS: usize = 4;
const MAX_BULLETS: usize = 8;

/// Character ceiling on the whole bullet block.
const MAX_BULLET_CHARS: usize = 600;

/// Output-token ceilings per request kind.
const BODY_MAX_TOKENS: u32 = 400;
const CAPTION_MAX_TOKENS: u32 = 60;

const BODY_SYSTEM_PROMPT: &str = "You are an expert slide-writer that compresses a chunk of \
encyclopedia text into concise PowerPoint bullet points. STRICT RULES - follow them exactly:\n\
1) Output plain text lines only, one bullet per line, no markdown markers, no numbering.\n\
2) Produce between 4 and 8 lines. Never more than 7 line breaks.\n\
3) Total output must not exceed 120 words and 600 characters.\n\
4) Each line is a single short sentence or phrase, ideally 6-15 words.\n\
5) Do not include citations, bracketed references, HTML, or source text.\n\
6) If the input is short or thin, still return 4 concise lines.\n\
Tone: neutral, factual, slide-friendly.";

const CAPTION_SYSTEM_PROMPT: &str = "You compress image captions for slides. Reply with a \
single descriptive phrase of 5-8 words. No quotes, no citations, no trailing period.";

/// Connection settings for the summarization endpoint.
#[derive(Debug, Clone)]
pub struct SummarizerConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl SummarizerConfig {
    /// Load from environment: `OPENAI_API_KEY` (required),
    /// `WIKIDECK_MODEL` and `OPENAI_BASE_URL` (optional).
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| Error::SummarizerConfig("OPENAI_API_KEY is not set".to_string()))?;
        Ok(Self {
            api_key,
            model: std::env::var("WIKIDECK_MODEL")
                .unwrap_or_else(|_| "gpt-3.5-turbo".to_string()),
            base_url: std::env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
            timeout_secs: 60,
        })
    }
}

/// Blocking chat-completions client behind the [`Summarizer`] seam.
pub struct OpenAiSummarizer {
    client: Client,
    config: SummarizerConfig,
}

impl OpenAiSummarizer {
    pub fn new(config: SummarizerConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::SummarizerConfig(format!("http client: {}", e)))?;
        Ok(Self { client, config })
    }

    /// One deterministic completion round trip.
    fn submit(&self, system: &str, user: &str, max_tokens: u32) -> Result<String> {
        let url = format!("{}/chat/completions", self.config.base_url);
        log::debug!(
            "requesting completion from {} ({} input chars, max_tokens {})",
            url,
            user.chars().count(),
            max_tokens
        );
        let body = serde_json::json!({
            "model": self.config.model,
            "temperature": 0.0,
            "max_tokens": max_tokens,
            "messages": [
                {"role": "system", "content": system},
                {"role": "user", "content": user},
            ],
        });

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .json(&body)
            .send()
            .map_err(|e| Error::SummarizationFailure(format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().unwrap_or_default();
            return Err(Error::SummarizationFailure(format!(
                "api status {}: {}",
                status, text
            )));
        }

        let data: serde_json::Value = response
            .json()
            .map_err(|e| Error::SummarizationFailure(format!("invalid response json: {}", e)))?;

        let content = data["choices"][0]["message"]["content"]
            .as_str()
            .unwrap_or("")
            .trim()
            .to_string();

        if content.is_empty() {
            return Err(Error::SummarizationFailure(
                "empty completion content".to_string(),
            ));
        }

        log::debug!("completion returned {} chars", content.chars().count());
        Ok(content)
    }
}

impl Summarizer for OpenAiSummarizer {
    fn summarize_body(&self, text: &str) -> Result<String> {
        let bounded = truncate_input(text);
        let user = format!(
            "Convert the following text into slide-ready bullet lines. \
             Remember the strict limits above.\n\nText: {}",
            bounded
        );
        let raw = self.submit(BODY_SYSTEM_PROMPT, &user, BODY_MAX_TOKENS)?;
        clean_bullet_block(&raw)
    }

    fn summarize_caption(&self, text: &str) -> Result<String> {
        // Empty captions never reach the service.
        if text.trim().is_empty() {
            return Ok(String::new());
        }
        let user = format!("Caption: {}", text);
        let raw = self.submit(CAPTION_SYSTEM_PROMPT, &user, CAPTION_MAX_TOKENS)?;
        clean_caption(&raw)
    }
}

/// Truncate oversized input to the first [`HEAD_CHARS`] and last
/// [`TAIL_CHARS`] characters joined by an omission marker, preserving intro
/// and conclusion context while keeping the request bounded.
fn truncate_input(text: &str) -> String {
    let count = text.chars().count();
    if count <= INPUT_CAP_CHARS {
        return text.to_string();
    }

    log::debug!(
        "truncating {} input chars to {} head + {} tail",
        count,
        HEAD_CHARS,
        TAIL_CHARS
    );
    let head: String = text.chars().take(HEAD_CHARS).collect();
    let tail: String = text
        .chars()
        .skip(count - TAIL_CHARS)
        .collect();
    format!("{}{}{}", head, OMISSION_MARKER, tail)
}

/// Validate and clamp the returned bullet block: strip any leading dash
/// markers the service still emitted, drop blank lines, enforce the 4-8
/// line range (clamping the top, rejecting the bottom), and enforce the
/// character ceiling.
fn clean_bullet_block(raw: &str) -> Result<String> {
    let mut lines: Vec<&str> = raw
        .lines()
        .map(|l| {
            l.trim()
                .trim_start_matches("- ")
                .trim_start_matches("* ")
                .trim_start_matches("• ")
                .trim()
        })
        .filter(|l| !l.is_empty())
        .collect();

    if lines.len() < MIN_BULLETS {
        return Err(Error::SummarizationFailure(format!(
            "expected at least {} bullet lines, got {}",
            MIN_BULLETS,
            lines.len()
        )));
    }
    lines.truncate(MAX_BULLETS);

    let mut joined = lines.join("\n");
    while joined.chars().count() > MAX_BULLET_CHARS && lines.len() > MIN_BULLETS {
        lines.pop();
        joined = lines.join("\n");
    }
    if joined.chars().count() > MAX_BULLET_CHARS {
        joined = joined.chars().take(MAX_BULLET_CHARS).collect();
    }

    Ok(joined)
}

/// Single-phrase caption: first line only, quotes and bracketed artifacts
/// removed, whitespace collapsed.
fn clean_caption(raw: &str) -> Result<String> {
    let first = raw.lines().next().unwrap_or("");
    let cleaned: String = first
        .chars()
        .filter(|c| !matches!(c, '"' | '\'' | '\u{201c}' | '\u{201d}' | '[' | ']'))
        .collect();
    let cleaned = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");

    if cleaned.is_empty() {
        return Err(Error::SummarizationFailure(
            "empty caption phrase".to_string(),
        ));
    }
    Ok(cleaned)
}
