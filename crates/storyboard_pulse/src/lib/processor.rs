use std::path::{Path, PathBuf};

use storyboard_store::{ArtifactStore, SerializationPaths, Storyboard};

use crate::{
    error::Error,
    parser::{ParsedReply, ReplyDocument},
    prompt::{estimate_tokens, PromptTemplate},
    validator::{Finding, ValidatorConfig},
    Completer,
};

pub mod builder;

/// What a successful run produced
#[derive(Debug, Clone)]
pub struct RunReport {
    pub storyboard: Storyboard,
    pub findings: Vec<Finding>,
    pub serializations: SerializationPaths,
    /// `None` when the storyboard had no `meta` section
    pub composition: Option<PathBuf>,
    pub voiceovers: Vec<PathBuf>,
    pub exec_summary: Option<PathBuf>,
}

/// Research text in, storyboard artifacts out
#[derive(Debug)]
pub struct StoryboardProcessor<C, A>
where
    C: Completer,
    A: ArtifactStore,
{
    pub(crate) completer: C,
    pub(crate) store: A,
    pub(crate) prompt: PromptTemplate,
    pub(crate) validator: ValidatorConfig,
    pub(crate) fail_on_findings: bool,
}

impl<C, A> StoryboardProcessor<C, A>
where
    C: Completer,
    A: ArtifactStore,
{
    #[tracing::instrument(skip(self))]
    async fn read_research_text(&self, input: &Path) -> Result<String, Error> {
        let text = tokio::fs::read_to_string(input)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to read research text"))?;

        tracing::info!(chars = text.chars().count(), "Loaded research text");
        Ok(text)
    }

    /// Composes the prompt and sends it to the completion service
    #[tracing::instrument(skip_all)]
    async fn request_storyboard(&self, research_text: &str) -> Result<ReplyDocument, Error> {
        let prompt = self.prompt.compose(research_text);

        match estimate_tokens(&prompt) {
            Some(tokens) if tokens > C::CONTEXT_WINDOW_LIMIT => tracing::warn!(
                tokens,
                limit = C::CONTEXT_WINDOW_LIMIT,
                "Prompt likely exceeds the model context window, sending it unchanged"
            ),
            Some(tokens) => tracing::debug!(tokens, "Composed prompt"),
            None => {}
        }

        let reply = self
            .completer
            .complete(&prompt)
            .await
            .map_err(Into::<Error>::into)
            .inspect_err(|e| tracing::error!(error = %e, "Failed to get storyboard completion"))?;

        tracing::info!(reply_len = reply.len(), "Received storyboard reply");
        Ok(reply.into())
    }

    /// Parses the reply and applies the findings policy
    #[tracing::instrument(skip_all)]
    fn parse_reply(&self, reply: &ReplyDocument) -> Result<ParsedReply, Error> {
        let parsed = reply.parse(&self.validator)?;

        if self.fail_on_findings && !parsed.findings.is_empty() {
            tracing::error!(
                findings = parsed.findings.len(),
                "Validation findings are configured to fail the run"
            );
            return Err(Error::FindingsEscalated(parsed.findings));
        }

        Ok(parsed)
    }

    #[tracing::instrument(skip_all, fields(slides = parsed.storyboard.slides.len()))]
    fn emit_artifacts(&self, parsed: ParsedReply) -> Result<RunReport, Error> {
        let ParsedReply {
            storyboard,
            yaml,
            json,
            summary,
            findings,
        } = parsed;

        let serializations = self
            .store
            .write_serializations(&yaml, &json)
            .map_err(Error::Artifact)?;

        let composition = self
            .store
            .write_composition(&storyboard)
            .map_err(Error::Artifact)?;

        let voiceovers = self
            .store
            .write_voiceover_placeholders(&storyboard.slides)
            .map_err(Error::Artifact)?;

        let exec_summary = summary
            .map(|summary| self.store.write_exec_summary(&summary))
            .transpose()
            .map_err(Error::Artifact)?;

        Ok(RunReport {
            storyboard,
            findings,
            serializations,
            composition,
            voiceovers,
            exec_summary,
        })
    }

    /// Runs the whole pipeline once for the research text at `input`.
    ///
    /// Nothing is written unless the reply was extracted, parsed and
    /// validated successfully.
    #[tracing::instrument(skip(self, input), fields(input = %input.as_ref().display()))]
    pub async fn run(&self, input: impl AsRef<Path>) -> Result<RunReport, Error> {
        let research_text = self.read_research_text(input.as_ref()).await?;
        let reply = self.request_storyboard(&research_text).await?;
        let parsed = self.parse_reply(&reply)?;
        let report = self.emit_artifacts(parsed)?;

        tracing::info!(
            slides = report.storyboard.slides.len(),
            findings = report.findings.len(),
            composition = report.composition.is_some(),
            "Storyboard artifacts written"
        );

        Ok(report)
    }
}
