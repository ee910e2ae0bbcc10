use clap::Parser;
use storyboard_pulse::{
    openai::OpenAIClient, prompt::PromptTemplate, tracing::init_tracing_subscriber, Cli, Config,
    StoryboardProcessorBuilder,
};
use storyboard_store::FsArtifactStore;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    let _guard = sentry::init((
        std::env::var("SENTRY_DSN").unwrap_or_default(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: Some("production".into()),
            ..Default::default()
        },
    ));

    let cli = Cli::parse();
    init_tracing_subscriber()?;

    let config = Config::try_from(cli)
        .inspect_err(|e| tracing::error!(error = %e, "Invalid configuration"))?;

    let prompt = match &config.prompt_template {
        Some(path) => PromptTemplate::load(path).await?,
        None => PromptTemplate::builtin(),
    };

    let openai = OpenAIClient::new(config.client.clone())?;
    tracing::info!(
        model = openai.model(),
        input = %config.input.display(),
        output = %config.output.display(),
        "Generating storyboard"
    );

    let processor = StoryboardProcessorBuilder::new()
        .completer(openai)
        .store(FsArtifactStore::new(&config.output))
        .prompt_template(prompt)
        .validator(config.validator.clone())
        .fail_on_findings(config.fail_on_findings)
        .build();

    let report = processor
        .run(&config.input)
        .await
        .inspect_err(|e| tracing::error!(error = %e, "Storyboard generation failed"))?;

    tracing::info!(
        slides = report.storyboard.slides.len(),
        findings = report.findings.len(),
        voiceovers = report.voiceovers.len(),
        composition = ?report.composition,
        exec_summary = ?report.exec_summary,
        json = %report.serializations.json.display(),
        "Done"
    );

    Ok(())
}
