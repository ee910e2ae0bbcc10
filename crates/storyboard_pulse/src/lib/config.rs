use std::{path::PathBuf, time::Duration};

use clap::Parser;

use crate::{
    error::Error,
    openai::ClientConfig,
    validator::{ValidationMode, ValidatorConfig},
};

#[derive(Debug, Parser)]
#[command(
    name = "storyboard-pulse",
    version,
    about = "Turns research notes into a narrated video storyboard"
)]
pub struct Cli {
    /// Research text file to turn into a storyboard
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// Directory receiving the generated artifacts (created if missing)
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// OpenAI API key
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub openai_key: Option<String>,

    /// Chat completion API base URL
    #[arg(long, env = "OPENAI_BASE_URL", default_value = ClientConfig::DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Completion model
    #[arg(long, env = "STORYBOARD_MODEL", default_value = ClientConfig::DEFAULT_MODEL)]
    pub model: String,

    /// Sampling temperature
    #[arg(long, env = "STORYBOARD_TEMPERATURE", default_value_t = ClientConfig::DEFAULT_TEMPERATURE)]
    pub temperature: f32,

    /// Timeout in seconds for a single completion attempt
    #[arg(long, env = "STORYBOARD_TIMEOUT_SECS", default_value_t = ClientConfig::DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// Retries on transient network failures
    #[arg(long, env = "STORYBOARD_MAX_RETRIES", default_value_t = ClientConfig::DEFAULT_MAX_RETRIES)]
    pub max_retries: u32,

    /// How an unparseable YAML block is treated
    #[arg(long, env = "STORYBOARD_VALIDATION", value_enum, default_value_t = ValidationMode::Lenient)]
    pub validation: ValidationMode,

    /// Allowed gap in seconds between declared and summed slide durations
    #[arg(
        long,
        env = "STORYBOARD_DURATION_TOLERANCE",
        default_value_t = ValidatorConfig::DEFAULT_DURATION_TOLERANCE_SEC
    )]
    pub duration_tolerance: f64,

    /// Fail the run instead of warning when validation produces findings
    #[arg(long)]
    pub fail_on_findings: bool,

    /// Custom prompt template containing {{RESEARCH_TEXT}} exactly once
    #[arg(long, env = "STORYBOARD_PROMPT_TEMPLATE")]
    pub prompt_template: Option<PathBuf>,
}

/// Fully resolved run configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub input: PathBuf,
    pub output: PathBuf,
    pub client: ClientConfig,
    pub validator: ValidatorConfig,
    pub fail_on_findings: bool,
    pub prompt_template: Option<PathBuf>,
}

impl TryFrom<Cli> for Config {
    type Error = Error;

    fn try_from(cli: Cli) -> Result<Self, Self::Error> {
        let input = cli
            .input
            .ok_or_else(|| Error::Configuration("missing required argument --input <path>".into()))?;
        let output = cli
            .output
            .ok_or_else(|| Error::Configuration("missing required argument --output <path>".into()))?;

        if !(0.0..=2.0).contains(&cli.temperature) {
            return Err(Error::Configuration(format!(
                "--temperature must be between 0 and 2, got {}",
                cli.temperature
            )));
        }
        if cli.duration_tolerance < 0.0 || !cli.duration_tolerance.is_finite() {
            return Err(Error::Configuration(format!(
                "--duration-tolerance must be a non-negative number, got {}",
                cli.duration_tolerance
            )));
        }

        Ok(Config {
            input,
            output,
            client: ClientConfig {
                api_key: cli.openai_key,
                base_url: cli.base_url,
                model: cli.model,
                temperature: cli.temperature,
                timeout: Duration::from_secs(cli.timeout_secs),
                max_retries: cli.max_retries,
            },
            validator: ValidatorConfig {
                mode: cli.validation,
                duration_tolerance_sec: cli.duration_tolerance,
            },
            fail_on_findings: cli.fail_on_findings,
            prompt_template: cli.prompt_template,
        })
    }
}

#[cfg(test)]
mod tests {
    use clap::error::ErrorKind;

    use super::*;

    fn resolve(args: &[&str]) -> Result<Config, Error> {
        let cli = Cli::try_parse_from(std::iter::once("storyboard-pulse").chain(args.iter().copied()))
            .expect("arguments should parse");
        Config::try_from(cli)
    }

    #[test]
    fn test_resolves_input_and_output() {
        let config = resolve(&["--input", "notes.txt", "--output", "out"]).unwrap();

        assert_eq!(config.input, PathBuf::from("notes.txt"));
        assert_eq!(config.output, PathBuf::from("out"));
        assert!(!config.fail_on_findings);
    }

    #[test]
    fn test_missing_input_is_configuration_error() {
        let result = resolve(&["--output", "out"]);
        assert!(matches!(result, Err(Error::Configuration(msg)) if msg.contains("--input")));
    }

    #[test]
    fn test_missing_output_is_configuration_error() {
        let result = resolve(&["--input", "notes.txt"]);
        assert!(matches!(result, Err(Error::Configuration(msg)) if msg.contains("--output")));
    }

    #[test]
    fn test_help_flags_short_circuit() {
        for flag in ["--help", "-h"] {
            let err = Cli::try_parse_from(["storyboard-pulse", flag]).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::DisplayHelp);
            assert_eq!(err.exit_code(), 0);
        }
    }

    #[test]
    fn test_tuning_flags() {
        let config = resolve(&[
            "--input",
            "notes.txt",
            "--output",
            "out",
            "--validation",
            "strict",
            "--duration-tolerance",
            "0.5",
            "--max-retries",
            "1",
            "--timeout-secs",
            "30",
            "--fail-on-findings",
        ])
        .unwrap();

        assert_eq!(config.validator.mode, ValidationMode::Strict);
        assert_eq!(config.validator.duration_tolerance_sec, 0.5);
        assert_eq!(config.client.max_retries, 1);
        assert_eq!(config.client.timeout, Duration::from_secs(30));
        assert!(config.fail_on_findings);
    }

    #[test]
    fn test_out_of_range_temperature_is_rejected() {
        let result = resolve(&["--input", "a", "--output", "b", "--temperature", "3.5"]);
        assert!(matches!(result, Err(Error::Configuration(_))));
    }
}
