use serde::{de::Error as _, Deserialize, Deserializer, Serialize};

/// Sentinel used by the model for "no background music".
pub const NO_BACKGROUND_MUSIC: &str = "none";

/// Full structured description of a generated video
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Storyboard {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
    pub slides: Vec<Slide>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fps: Option<f64>,
    #[serde(
        default,
        deserialize_with = "whole_pixels",
        skip_serializing_if = "Option::is_none"
    )]
    pub width: Option<u32>,
    #[serde(
        default,
        deserialize_with = "whole_pixels",
        skip_serializing_if = "Option::is_none"
    )]
    pub height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_duration_sec: Option<f64>,
}

/// Accepts `1920` as well as `1920.0`
fn whole_pixels<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<f64>::deserialize(deserializer)?
        .map(|px| {
            if px.fract() == 0.0 && (0.0..=f64::from(u32::MAX)).contains(&px) {
                Ok(px as u32)
            } else {
                Err(D::Error::custom(format!("expected a whole pixel count, got {px}")))
            }
        })
        .transpose()
}

/// One timed segment of the video
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slide {
    pub id: String,
    #[serde(default)]
    pub title: String,
    pub duration_sec: f64,
    #[serde(default)]
    pub elements: Vec<Element>,
    #[serde(default)]
    pub narration: String,
    #[serde(default)]
    pub subtitles: String,
    #[serde(default)]
    pub audio_tracks: AudioTracks,
    #[serde(default)]
    pub transition_to_next: Transition,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ElementKind {
    Heading,
    Paragraph,
    Bullets,
    Image,
    Video,
    Chart,
    Code,
    Shape,
}

/// Literal element content: plain text, or the items of a bulleted list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ElementContent {
    Text(String),
    Items(Vec<String>),
}

/// One on-screen item within a slide, timed relative to the slide start
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    pub kind: ElementKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<ElementContent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
    #[serde(default)]
    pub start_sec: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_sec: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animation_in: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animation_out: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioTracks {
    #[serde(default = "no_background_music")]
    pub background_music: String,
    #[serde(default)]
    pub sfx: Vec<SoundCue>,
}

fn no_background_music() -> String {
    NO_BACKGROUND_MUSIC.to_string()
}

impl Default for AudioTracks {
    fn default() -> Self {
        Self {
            background_music: no_background_music(),
            sfx: Vec::new(),
        }
    }
}

impl AudioTracks {
    /// Background music reference, `None` when the sentinel or an empty value was given
    pub fn background_music(&self) -> Option<&str> {
        let bgm = self.background_music.trim();
        if bgm.is_empty() || bgm.eq_ignore_ascii_case(NO_BACKGROUND_MUSIC) {
            None
        } else {
            Some(bgm)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SoundCue {
    pub src: String,
    #[serde(default)]
    pub at_sec: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Transition {
    #[default]
    #[serde(rename = "cut")]
    Cut,
    #[serde(rename = "crossfade")]
    CrossFade,
    #[serde(rename = "push-left")]
    PushLeft,
    #[serde(rename = "custom")]
    Custom,
}

impl Slide {
    /// Name of the slide's voiceover file, `None` when the id is not a single
    /// path component.
    pub fn voiceover_file_name(&self) -> Option<String> {
        let id = self.id.trim();
        if id.is_empty() || id == "." || id == ".." || id.contains(['/', '\\']) {
            return None;
        }
        Some(format!("{id}.mp3"))
    }
}

impl Storyboard {
    /// Sum of all slide durations in seconds
    pub fn slides_duration_sec(&self) -> f64 {
        self.slides.iter().map(|s| s.duration_sec).sum()
    }

    /// Declared total duration, falling back to the sum of slide durations
    pub fn total_duration_sec(&self) -> f64 {
        self.meta
            .as_ref()
            .and_then(|m| m.total_duration_sec)
            .unwrap_or_else(|| self.slides_duration_sec())
    }
}
