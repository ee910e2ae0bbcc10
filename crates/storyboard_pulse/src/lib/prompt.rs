use std::path::Path;

use crate::error::Error;

pub const RESEARCH_TEXT_PLACEHOLDER: &str = "{{RESEARCH_TEXT}}";

/// Instructional template with exactly one research-text placeholder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate(String);

impl PromptTemplate {
    const BUILTIN: &'static str = include_str!("./prompts/storyboard_0.txt");

    pub fn builtin() -> Self {
        PromptTemplate(Self::BUILTIN.to_string())
    }

    /// Fails unless `template` contains the placeholder exactly once
    pub fn new(template: impl Into<String>) -> Result<Self, Error> {
        let template = template.into();
        match template.matches(RESEARCH_TEXT_PLACEHOLDER).count() {
            1 => Ok(PromptTemplate(template)),
            n => Err(Error::Configuration(format!(
                "prompt template must contain {RESEARCH_TEXT_PLACEHOLDER} exactly once, found {n}"
            ))),
        }
    }

    pub async fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let template = tokio::fs::read_to_string(path)
            .await
            .inspect_err(|e| tracing::error!(error = %e, ?path, "Failed to read prompt template"))?;
        Self::new(template)
    }

    /// Substitutes the research text verbatim, without escaping or truncation
    pub fn compose(&self, research_text: &str) -> String {
        match self.0.split_once(RESEARCH_TEXT_PLACEHOLDER) {
            Some((before, after)) => {
                let mut prompt =
                    String::with_capacity(before.len() + research_text.len() + after.len());
                prompt.push_str(before);
                prompt.push_str(research_text);
                prompt.push_str(after);
                prompt
            }
            None => self.0.clone(),
        }
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Approximate token count of `text` with the `cl100k_base` encoding
pub fn estimate_tokens(text: &str) -> Option<usize> {
    another_tiktoken_rs::cl100k_base()
        .inspect_err(|e| tracing::debug!(error = %e, "Tokenizer unavailable"))
        .ok()
        .map(|bpe| bpe.encode_with_special_tokens(text).len())
}
