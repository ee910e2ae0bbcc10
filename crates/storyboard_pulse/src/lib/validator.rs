//! # Storyboard validation
//!
//! Checks run on a freshly parsed storyboard. Duplicate slide ids and ids that
//! cannot name a voiceover file are fatal, everything else is reported as a [`Finding`] and left for the caller to
//! act on.

use std::{collections::BTreeSet, fmt};

use itertools::Itertools;
use serde_json::Value;
use storyboard_store::Storyboard;

use crate::error::Error;

/// Largest integer an `f64` holds exactly
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// How a broken human-readable (YAML) block is treated
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ValidationMode {
    /// YAML parse failures fail the run
    Strict,
    /// YAML parse failures are reported as a finding and the equivalence check is skipped
    #[default]
    Lenient,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidatorConfig {
    pub mode: ValidationMode,
    /// Allowed gap in seconds between the declared total and the sum of slide durations
    pub duration_tolerance_sec: f64,
}

impl ValidatorConfig {
    pub const DEFAULT_DURATION_TOLERANCE_SEC: f64 = 0.05;
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            mode: ValidationMode::default(),
            duration_tolerance_sec: Self::DEFAULT_DURATION_TOLERANCE_SEC,
        }
    }
}

/// A non-fatal validation result
#[derive(Debug, Clone, PartialEq)]
pub enum Finding {
    HumanReadableUnparsed {
        reason: String,
    },
    StructuralMismatch {
        path: String,
    },
    DurationMismatch {
        declared_sec: f64,
        actual_sec: f64,
    },
    NonPositiveDuration {
        slide_id: String,
        duration_sec: f64,
    },
    ElementTiming {
        slide_id: String,
        element_index: usize,
        start_sec: f64,
        end_sec: f64,
    },
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Finding::HumanReadableUnparsed { reason } => {
                write!(f, "YAML block could not be parsed, equivalence check skipped: {reason}")
            }
            Finding::StructuralMismatch { path } => {
                write!(f, "YAML and JSON blocks differ at {path}")
            }
            Finding::DurationMismatch {
                declared_sec,
                actual_sec,
            } => write!(
                f,
                "slide durations sum to {actual_sec}s but meta.totalDurationSec is {declared_sec}s"
            ),
            Finding::NonPositiveDuration {
                slide_id,
                duration_sec,
            } => write!(f, "slide {slide_id:?} has non-positive duration {duration_sec}s"),
            Finding::ElementTiming {
                slide_id,
                element_index,
                start_sec,
                end_sec,
            } => write!(
                f,
                "element {element_index} of slide {slide_id:?} spans {start_sec}s..{end_sec}s outside the slide"
            ),
        }
    }
}

/// Fails on the first slide id that appears more than once
pub fn check_unique_slide_ids(storyboard: &Storyboard) -> Result<(), Error> {
    match storyboard.slides.iter().map(|s| s.id.as_str()).duplicates().next() {
        Some(id) => Err(Error::DuplicateSlideId(id.to_string())),
        None => Ok(()),
    }
}

/// Slide ids name the voiceover files, so each must be a single path component
pub fn check_slide_ids_name_files(storyboard: &Storyboard) -> Result<(), Error> {
    match storyboard
        .slides
        .iter()
        .find(|s| s.voiceover_file_name().is_none())
    {
        Some(slide) => Err(Error::InvalidSlideId(slide.id.clone())),
        None => Ok(()),
    }
}

/// Runs every check against the parsed storyboard.
///
/// `json` is the machine-readable block as a generic value and `yaml` the raw
/// human-readable block text.
#[tracing::instrument(skip_all, fields(mode = ?config.mode, slides = storyboard.slides.len()))]
pub fn validate(
    storyboard: &Storyboard,
    json: &Value,
    yaml: &str,
    config: &ValidatorConfig,
) -> Result<Vec<Finding>, Error> {
    check_unique_slide_ids(storyboard)
        .and_then(|_| check_slide_ids_name_files(storyboard))
        .inspect_err(|e| tracing::error!(error = %e, "Rejected slide ids"))?;

    let mut findings = Vec::new();

    match serde_yaml::from_str::<Value>(yaml) {
        Ok(yaml_value) => {
            if let Some(path) = first_difference(&normalize(json.clone()), &normalize(yaml_value)) {
                findings.push(Finding::StructuralMismatch { path });
            }
        }
        Err(e) if config.mode == ValidationMode::Strict => {
            tracing::error!(error = %e, "Failed to parse YAML block");
            return Err(Error::Parse(format!("YAML block: {e}")));
        }
        Err(e) => findings.push(Finding::HumanReadableUnparsed {
            reason: e.to_string(),
        }),
    }

    findings.extend(check_durations(storyboard, config.duration_tolerance_sec));
    findings.extend(check_element_timing(storyboard));

    for finding in &findings {
        tracing::warn!(%finding, "Storyboard validation finding");
    }

    Ok(findings)
}

fn check_durations(storyboard: &Storyboard, tolerance_sec: f64) -> Vec<Finding> {
    let mut findings = storyboard
        .slides
        .iter()
        .filter(|s| s.duration_sec <= 0.0)
        .map(|s| Finding::NonPositiveDuration {
            slide_id: s.id.clone(),
            duration_sec: s.duration_sec,
        })
        .collect::<Vec<_>>();

    if let Some(declared_sec) = storyboard.meta.as_ref().and_then(|m| m.total_duration_sec) {
        let actual_sec = storyboard.slides_duration_sec();
        if (actual_sec - declared_sec).abs() > tolerance_sec {
            findings.push(Finding::DurationMismatch {
                declared_sec,
                actual_sec,
            });
        }
    }

    findings
}

fn check_element_timing(storyboard: &Storyboard) -> Vec<Finding> {
    storyboard
        .slides
        .iter()
        .flat_map(|slide| {
            slide
                .elements
                .iter()
                .enumerate()
                .filter_map(move |(element_index, element)| {
                    let end_sec = element.end_sec.unwrap_or(slide.duration_sec);
                    let out_of_bounds = element.start_sec < 0.0
                        || end_sec < element.start_sec
                        || end_sec > slide.duration_sec;

                    out_of_bounds.then(|| Finding::ElementTiming {
                        slide_id: slide.id.clone(),
                        element_index,
                        start_sec: element.start_sec,
                        end_sec,
                    })
                })
        })
        .collect()
}

/// Canonical form for comparison: integral floats become integers, so `20.0` equals `20`
fn normalize(value: Value) -> Value {
    match value {
        Value::Number(n) if n.is_f64() => match n.as_f64() {
            Some(f) if f.fract() == 0.0 && f.abs() <= MAX_EXACT_INTEGER => Value::from(f as i64),
            _ => Value::Number(n),
        },
        Value::Array(items) => Value::Array(items.into_iter().map(normalize).collect()),
        Value::Object(map) => Value::Object(map.into_iter().map(|(k, v)| (k, normalize(v))).collect()),
        other => other,
    }
}

/// Path of the first place two values differ, `None` when they are equal
fn first_difference(left: &Value, right: &Value) -> Option<String> {
    fn walk(left: &Value, right: &Value, path: &str) -> Option<String> {
        match (left, right) {
            (Value::Object(l), Value::Object(r)) => {
                let keys = l.keys().chain(r.keys()).collect::<BTreeSet<_>>();
                keys.into_iter().find_map(|key| {
                    let child = format!("{path}.{key}");
                    match (l.get(key), r.get(key)) {
                        (Some(lv), Some(rv)) => walk(lv, rv, &child),
                        _ => Some(child),
                    }
                })
            }
            (Value::Array(l), Value::Array(r)) if l.len() == r.len() => l
                .iter()
                .zip(r)
                .enumerate()
                .find_map(|(i, (lv, rv))| walk(lv, rv, &format!("{path}[{i}]"))),
            _ if left == right => None,
            _ => Some(path.to_string()),
        }
    }

    walk(left, right, "$")
}
