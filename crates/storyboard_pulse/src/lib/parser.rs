//! # Reply Parser
//!
//! Pulls the storyboard out of the completion service's reply. The reply is
//! expected to carry a fenced `yaml` block, a fenced `json` block and
//! optionally some free text after them.

use std::{ops::Deref, sync::LazyLock};

use regex::Regex;
use serde_json::Value;
use storyboard_store::Storyboard;

use crate::{
    error::Error,
    validator::{validate, Finding, ValidatorConfig},
};

static YAML_BLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```ya?ml[ \t]*\r?\n?(.*?)```").unwrap());

static JSON_BLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```json[ \t]*\r?\n?(.*?)```").unwrap());

/// Inner text of the two fenced blocks, fences removed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedBlocks {
    pub yaml: String,
    pub json: String,
    /// Free text after the last of the two blocks
    pub summary: Option<String>,
}

/// A fully parsed and validated reply
#[derive(Debug, Clone)]
pub struct ParsedReply {
    pub storyboard: Storyboard,
    pub yaml: String,
    pub json: String,
    pub summary: Option<String>,
    pub findings: Vec<Finding>,
}

pub struct ReplyDocument(String);

impl Deref for ReplyDocument {
    type Target = String;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl ReplyDocument {
    pub fn new(reply: String) -> Self {
        ReplyDocument(reply)
    }

    /// Locates the first `yaml` and the first `json` fenced block.
    ///
    /// # Returns
    /// * `Ok(ExtractedBlocks)` with both blocks' inner text and any trailing summary.
    /// * `Err(Error::Extraction)` if either block is missing.
    pub fn extract(&self) -> Result<ExtractedBlocks, Error> {
        let yaml = YAML_BLOCK_RE
            .captures(self)
            .ok_or(Error::Extraction("No ```yaml fenced block found in the reply"))?;
        let json = JSON_BLOCK_RE
            .captures(self)
            .ok_or(Error::Extraction("No ```json fenced block found in the reply"))?;

        let Some(yaml_inner) = yaml.get(1) else {
            return Err(Error::Extraction("Malformed ```yaml fenced block"));
        };
        let (Some(json_whole), Some(json_inner)) = (json.get(0), json.get(1)) else {
            return Err(Error::Extraction("Malformed ```json fenced block"));
        };

        // free text after the machine-readable block
        let summary = Some(self.as_str()[json_whole.end()..].trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        Ok(ExtractedBlocks {
            yaml: yaml_inner.as_str().to_string(),
            json: json_inner.as_str().to_string(),
            summary,
        })
    }

    /// Extracts, parses and validates the storyboard carried by the reply
    #[tracing::instrument(skip_all, fields(reply_len = self.len()))]
    pub fn parse(&self, config: &ValidatorConfig) -> Result<ParsedReply, Error> {
        let ExtractedBlocks {
            yaml,
            json,
            summary,
        } = self
            .extract()
            .inspect_err(|e| tracing::error!(error = %e, "Failed to extract storyboard blocks"))?;

        let json_value = serde_json::from_str::<Value>(&json)
            .map_err(|e| Error::Parse(format!("JSON block: {e}")))
            .inspect_err(|e| tracing::error!(error = %e, "Failed to parse JSON block"))?;

        let storyboard = serde_json::from_value::<Storyboard>(json_value.clone())
            .map_err(|e| Error::Parse(format!("JSON block is not a storyboard: {e}")))
            .inspect_err(|e| tracing::error!(error = %e, "Failed to parse storyboard"))?;

        let findings = validate(&storyboard, &json_value, &yaml, config)?;

        Ok(ParsedReply {
            storyboard,
            yaml,
            json,
            summary,
            findings,
        })
    }
}

impl From<String> for ReplyDocument {
    fn from(value: String) -> Self {
        ReplyDocument(value)
    }
}
