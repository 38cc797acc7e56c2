//! Text pipes used by the `pipehub` binary

use anyhow::bail;

use crate::{
    error::Result,
    pipeline::{Next, Pipe},
};

const PROCESS_METHOD: &str = "process";

/// Removes configured words from the text.
#[derive(Debug, Clone)]
pub struct RemoveBadWords {
    words: Vec<String>,
}

impl Default for RemoveBadWords {
    fn default() -> Self {
        Self::with_words(["badword"])
    }
}

impl RemoveBadWords {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            words: words.into_iter().map(Into::into).collect(),
        }
    }
}

impl<R> Pipe<String, R> for RemoveBadWords {
    fn handle(&self, content: String, next: Next<'_, String, R>) -> Result<R> {
        let cleaned = self
            .words
            .iter()
            .filter(|word| !word.is_empty())
            .fold(content, |text, word| text.replace(word.as_str(), ""));
        next.run(cleaned)
    }

    fn name(&self) -> &str {
        "RemoveBadWords"
    }
}

/// Rewrites `http://` links to the shortener.
#[derive(Debug, Clone, Default)]
pub struct ShortenUrls;

impl<R> Pipe<String, R> for ShortenUrls {
    fn handle(&self, content: String, next: Next<'_, String, R>) -> Result<R> {
        next.run(content.replace("http://", "https://short.ly/"))
    }

    fn name(&self) -> &str {
        "ShortenUrls"
    }
}

/// Turns the word "content" into a link marker. Answers to `process`.
#[derive(Debug, Clone, Default)]
pub struct GenerateLinks;

impl<R> Pipe<String, R> for GenerateLinks {
    fn responds_to(&self, method: &str) -> bool {
        method == PROCESS_METHOD
    }

    fn dispatch(&self, _method: &str, content: String, next: Next<'_, String, R>) -> Result<R> {
        next.run(content.replace("content", "🔗 Link"))
    }

    fn name(&self) -> &str {
        "GenerateLinks"
    }
}

/// Uppercases the text. Answers to `process`.
#[derive(Debug, Clone, Default)]
pub struct Uppercase;

impl<R> Pipe<String, R> for Uppercase {
    fn responds_to(&self, method: &str) -> bool {
        method == PROCESS_METHOD
    }

    fn dispatch(&self, _method: &str, content: String, next: Next<'_, String, R>) -> Result<R> {
        next.run(content.to_uppercase())
    }

    fn name(&self) -> &str {
        "Uppercase"
    }
}

/// Always fails.
#[derive(Debug, Clone, Default)]
pub struct FaultyPipe;

impl<T, R> Pipe<T, R> for FaultyPipe {
    fn handle(&self, _content: T, _next: Next<'_, T, R>) -> Result<R> {
        bail!("An error occurred!")
    }

    fn name(&self) -> &str {
        "FaultyPipe"
    }
}
