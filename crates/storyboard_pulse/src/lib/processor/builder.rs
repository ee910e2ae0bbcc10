use storyboard_store::ArtifactStore;

use crate::{prompt::PromptTemplate, validator::ValidatorConfig, Completer, StoryboardProcessor};

pub struct StoryboardProcessorBuilder<C = (), A = ()> {
    completer: C,
    store: A,
    prompt: PromptTemplate,
    validator: ValidatorConfig,
    fail_on_findings: bool,
}

impl StoryboardProcessorBuilder {
    pub fn new() -> Self {
        Self {
            completer: (),
            store: (),
            prompt: PromptTemplate::builtin(),
            validator: ValidatorConfig::default(),
            fail_on_findings: false,
        }
    }
}

impl Default for StoryboardProcessorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl<C, A> StoryboardProcessorBuilder<C, A> {
    pub fn completer<C2: Completer>(self, completer: C2) -> StoryboardProcessorBuilder<C2, A> {
        StoryboardProcessorBuilder {
            completer,
            store: self.store,
            prompt: self.prompt,
            validator: self.validator,
            fail_on_findings: self.fail_on_findings,
        }
    }

    pub fn store<A2: ArtifactStore>(self, store: A2) -> StoryboardProcessorBuilder<C, A2> {
        StoryboardProcessorBuilder {
            completer: self.completer,
            store,
            prompt: self.prompt,
            validator: self.validator,
            fail_on_findings: self.fail_on_findings,
        }
    }

    pub fn prompt_template(mut self, prompt: PromptTemplate) -> Self {
        self.prompt = prompt;
        self
    }

    pub fn validator(mut self, validator: ValidatorConfig) -> Self {
        self.validator = validator;
        self
    }

    pub fn fail_on_findings(mut self, fail_on_findings: bool) -> Self {
        self.fail_on_findings = fail_on_findings;
        self
    }
}

impl<C, A> StoryboardProcessorBuilder<C, A>
where
    C: Completer,
    A: ArtifactStore,
{
    pub fn build(self) -> StoryboardProcessor<C, A> {
        StoryboardProcessor {
            completer: self.completer,
            store: self.store,
            prompt: self.prompt,
            validator: self.validator,
            fail_on_findings: self.fail_on_findings,
        }
    }
}
