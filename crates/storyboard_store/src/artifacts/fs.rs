use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use itertools::Itertools;

use crate::{
    artifacts::{
        ArtifactStore, SerializationPaths, COMPOSITION_FILE, EXEC_SUMMARY_FILE, STORYBOARD_JSON,
        STORYBOARD_YAML, VOICEOVERS_DIR,
    },
    composition::render_composition,
    domain::{Slide, Storyboard},
};

/// Writes artifacts below a root output directory.
///
/// Nothing touches the disk until the first write; every write creates the
/// directories it needs.
#[derive(Debug, Clone)]
pub struct FsArtifactStore {
    root: PathBuf,
}

impl FsArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn voiceovers_dir(&self) -> PathBuf {
        self.root.join(VOICEOVERS_DIR)
    }

    fn write_file(&self, path: &Path, contents: &[u8]) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .inspect_err(|e| tracing::error!(error = ?e, path = ?parent, "Failed to create directory"))
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        fs::write(path, contents)
            .inspect_err(|e| tracing::error!(error = ?e, path = ?path, "Failed to write artifact"))
            .with_context(|| format!("Failed to write {}", path.display()))
    }
}

impl ArtifactStore for FsArtifactStore {
    #[tracing::instrument(skip_all, fields(root = %self.root.display()))]
    fn write_serializations(&self, yaml: &str, json: &str) -> anyhow::Result<SerializationPaths> {
        let paths = SerializationPaths {
            yaml: self.root.join(STORYBOARD_YAML),
            json: self.root.join(STORYBOARD_JSON),
        };

        self.write_file(&paths.yaml, yaml.as_bytes())?;
        self.write_file(&paths.json, json.as_bytes())?;

        Ok(paths)
    }

    #[tracing::instrument(skip_all, fields(root = %self.root.display()))]
    fn write_composition(&self, storyboard: &Storyboard) -> anyhow::Result<Option<PathBuf>> {
        let Some(source) = render_composition(storyboard) else {
            tracing::warn!("Storyboard has no meta section, skipping composition stub");
            return Ok(None);
        };

        let path = self.root.join(COMPOSITION_FILE);
        self.write_file(&path, source.as_bytes())?;

        Ok(Some(path))
    }

    #[tracing::instrument(skip_all, fields(root = %self.root.display(), slides = slides.len()))]
    fn write_voiceover_placeholders(&self, slides: &[Slide]) -> anyhow::Result<Vec<PathBuf>> {
        let dir = self.voiceovers_dir();

        let paths = slides
            .iter()
            .map(|slide| {
                slide
                    .voiceover_file_name()
                    .map(|name| dir.join(name))
                    .with_context(|| format!("Slide id {:?} cannot be used as a file name", slide.id))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        for path in paths.iter().unique() {
            self.write_file(path, &[])?;
        }

        Ok(paths)
    }

    #[tracing::instrument(skip_all, fields(root = %self.root.display()))]
    fn write_exec_summary(&self, summary: &str) -> anyhow::Result<PathBuf> {
        let path = self.root.join(EXEC_SUMMARY_FILE);
        self.write_file(&path, summary.as_bytes())?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const JSON: &str = r#"{
  "meta": {"fps": 30, "videoId": "3-ways-ai-helps", "totalDurationSec": 60},
  "slides": [
    {"id": "intro", "title": "Intro", "durationSec": 20},
    {"id": "body", "title": "Body", "durationSec": 25},
    {"id": "outro", "title": "Outro", "durationSec": 15}
  ]
}
"#;
    const YAML: &str = "meta:\n  fps: 30\nslides: []\n";

    fn storyboard() -> Storyboard {
        serde_json::from_str(JSON).unwrap()
    }

    fn write_all(store: &FsArtifactStore, storyboard: &Storyboard) {
        store.write_serializations(YAML, JSON).unwrap();
        store.write_composition(storyboard).unwrap();
        store
            .write_voiceover_placeholders(&storyboard.slides)
            .unwrap();
    }

    fn placeholder_files(store: &FsArtifactStore) -> Vec<(String, u64)> {
        let mut files = fs::read_dir(store.voiceovers_dir())
            .unwrap()
            .filter_map(|e| e.ok())
            .map(|e| {
                (
                    e.file_name().to_string_lossy().into_owned(),
                    e.metadata().unwrap().len(),
                )
            })
            .collect::<Vec<_>>();
        files.sort();
        files
    }

    #[test]
    fn test_serializations_are_written_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsArtifactStore::new(dir.path().join("out"));

        let paths = store.write_serializations(YAML, JSON).unwrap();

        assert_eq!(fs::read_to_string(&paths.yaml).unwrap(), YAML);
        assert_eq!(fs::read_to_string(&paths.json).unwrap(), JSON);
        assert_eq!(paths.json, dir.path().join("out").join(STORYBOARD_JSON));
    }

    #[test]
    fn test_emitting_twice_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsArtifactStore::new(dir.path());
        let storyboard = storyboard();

        write_all(&store, &storyboard);
        let json_first = fs::read(dir.path().join(STORYBOARD_JSON)).unwrap();
        let yaml_first = fs::read(dir.path().join(STORYBOARD_YAML)).unwrap();
        let video_first = fs::read(dir.path().join(COMPOSITION_FILE)).unwrap();
        let placeholders_first = placeholder_files(&store);

        write_all(&store, &storyboard);

        assert_eq!(fs::read(dir.path().join(STORYBOARD_JSON)).unwrap(), json_first);
        assert_eq!(fs::read(dir.path().join(STORYBOARD_YAML)).unwrap(), yaml_first);
        assert_eq!(fs::read(dir.path().join(COMPOSITION_FILE)).unwrap(), video_first);

        let placeholders = placeholder_files(&store);
        assert_eq!(placeholders, placeholders_first);
        assert_eq!(placeholders.len(), storyboard.slides.len());
        assert!(placeholders.iter().all(|(_, len)| *len == 0));
    }

    #[test]
    fn test_placeholders_named_after_slide_ids() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsArtifactStore::new(dir.path());

        let paths = store
            .write_voiceover_placeholders(&storyboard().slides)
            .unwrap();

        assert_eq!(
            paths,
            vec![
                dir.path().join("public/voiceovers/intro.mp3"),
                dir.path().join("public/voiceovers/body.mp3"),
                dir.path().join("public/voiceovers/outro.mp3"),
            ]
        );
    }

    #[test]
    fn test_slide_id_with_path_separator_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsArtifactStore::new(dir.path());
        let mut storyboard = storyboard();
        storyboard.slides[1].id = "../escape".into();

        let result = store.write_voiceover_placeholders(&storyboard.slides);

        assert!(result.is_err());
        assert!(!dir.path().join("public").exists());
    }

    #[test]
    fn test_composition_skipped_without_meta() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsArtifactStore::new(dir.path());
        let mut storyboard = storyboard();
        storyboard.meta = None;

        assert_eq!(store.write_composition(&storyboard).unwrap(), None);
        assert!(!dir.path().join(COMPOSITION_FILE).exists());
    }

    #[test]
    fn test_composition_written_with_sanitized_identifier() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsArtifactStore::new(dir.path());

        let path = store.write_composition(&storyboard()).unwrap().unwrap();
        let source = fs::read_to_string(path).unwrap();

        assert!(source.contains("export const Video3WaysAiHelps"));
        assert!(source.contains("durationInFrames={1800}"));
    }

    #[test]
    fn test_exec_summary_written_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsArtifactStore::new(dir.path());

        let path = store.write_exec_summary("Three slides, one minute.\n").unwrap();

        assert_eq!(path, dir.path().join(EXEC_SUMMARY_FILE));
        assert_eq!(
            fs::read_to_string(path).unwrap(),
            "Three slides, one minute.\n"
        );
    }
}
