use std::{
    path::PathBuf,
    sync::{Arc, Mutex},
};
use storyboard_store::{ArtifactStore, SerializationPaths, Slide, Storyboard};

#[derive(Clone, Default)]
pub struct MockArtifactStore {
    pub calls: Arc<Mutex<Vec<String>>>,
    pub fail_with: Option<String>,
}

impl MockArtifactStore {
    pub fn failing(msg: &str) -> Self {
        Self {
            fail_with: Some(msg.to_string()),
            ..Default::default()
        }
    }

    fn record(&self, call: String) -> anyhow::Result<()> {
        if let Some(ref msg) = self.fail_with {
            return Err(anyhow::anyhow!("{}", msg));
        }
        self.calls.lock().unwrap().push(call);
        Ok(())
    }
}

impl ArtifactStore for MockArtifactStore {
    fn write_serializations(&self, yaml: &str, json: &str) -> anyhow::Result<SerializationPaths> {
        self.record(format!("serializations:{}:{}", yaml.len(), json.len()))?;
        Ok(SerializationPaths {
            yaml: PathBuf::from("/mock/storyboard.yaml"),
            json: PathBuf::from("/mock/storyboard.json"),
        })
    }

    fn write_composition(&self, storyboard: &Storyboard) -> anyhow::Result<Option<PathBuf>> {
        self.record("composition".into())?;
        Ok(storyboard
            .meta
            .as_ref()
            .map(|_| PathBuf::from("/mock/Video.tsx")))
    }

    fn write_voiceover_placeholders(&self, slides: &[Slide]) -> anyhow::Result<Vec<PathBuf>> {
        self.record(format!("voiceovers:{}", slides.len()))?;
        Ok(slides
            .iter()
            .map(|s| PathBuf::from(format!("/mock/public/voiceovers/{}.mp3", s.id)))
            .collect())
    }

    fn write_exec_summary(&self, summary: &str) -> anyhow::Result<PathBuf> {
        self.record(format!("exec_summary:{summary}"))?;
        Ok(PathBuf::from("/mock/EXEC_SUMMARY.txt"))
    }
}
