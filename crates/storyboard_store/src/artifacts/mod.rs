use std::path::PathBuf;

use crate::domain::{Slide, Storyboard};

pub mod fs;

pub const STORYBOARD_YAML: &str = "storyboard.yaml";
pub const STORYBOARD_JSON: &str = "storyboard.json";
pub const COMPOSITION_FILE: &str = "Video.tsx";
pub const VOICEOVERS_DIR: &str = "public/voiceovers";
pub const EXEC_SUMMARY_FILE: &str = "EXEC_SUMMARY.txt";

pub trait ArtifactStore {
    /// Persists both serializations exactly as the service returned them
    fn write_serializations(&self, yaml: &str, json: &str) -> anyhow::Result<SerializationPaths>;

    /// Writes the composition stub, `Ok(None)` when the storyboard has no `meta`
    fn write_composition(&self, storyboard: &Storyboard) -> anyhow::Result<Option<PathBuf>>;

    /// Writes one empty voiceover placeholder per slide
    fn write_voiceover_placeholders(&self, slides: &[Slide]) -> anyhow::Result<Vec<PathBuf>>;

    fn write_exec_summary(&self, summary: &str) -> anyhow::Result<PathBuf>;
}

impl<T: ArtifactStore> ArtifactStore for &T {
    fn write_serializations(&self, yaml: &str, json: &str) -> anyhow::Result<SerializationPaths> {
        (**self).write_serializations(yaml, json)
    }

    fn write_composition(&self, storyboard: &Storyboard) -> anyhow::Result<Option<PathBuf>> {
        (**self).write_composition(storyboard)
    }

    fn write_voiceover_placeholders(&self, slides: &[Slide]) -> anyhow::Result<Vec<PathBuf>> {
        (**self).write_voiceover_placeholders(slides)
    }

    fn write_exec_summary(&self, summary: &str) -> anyhow::Result<PathBuf> {
        (**self).write_exec_summary(summary)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerializationPaths {
    pub yaml: PathBuf,
    pub json: PathBuf,
}
