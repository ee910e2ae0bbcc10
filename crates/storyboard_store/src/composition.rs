//! # Composition stub
//!
//! Renders the `Video.tsx` source consumed by the external rendering framework.
//! Rendering is deterministic: the same storyboard always yields the same bytes.

use crate::domain::Storyboard;

const VIDEO_TEMPLATE: &str = include_str!("./templates/video.tsx");

pub const DEFAULT_FPS: f64 = 30.0;
pub const DEFAULT_WIDTH: u32 = 1920;
pub const DEFAULT_HEIGHT: u32 = 1080;

/// Prepended when a sanitized identifier would be empty or start with a digit
const IDENTIFIER_PREFIX: &str = "Video";

/// Turns an arbitrary slug into a PascalCase identifier valid in TypeScript.
///
/// Every character outside `[A-Za-z0-9]` is a token boundary and is dropped.
/// Each token is title-cased. If the result is empty or starts with a digit,
/// it is prefixed with `Video`.
///
/// ```
/// use storyboard_store::composition::sanitize_identifier;
///
/// assert_eq!(sanitize_identifier("3-ways-ai-helps"), "Video3WaysAiHelps");
/// assert_eq!(sanitize_identifier("--climate_report"), "ClimateReport");
/// ```
pub fn sanitize_identifier(raw: &str) -> String {
    let mut ident = raw
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(|token| {
            let mut chars = token.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<String>();

    if ident.chars().next().map_or(true, |c| c.is_ascii_digit()) {
        ident.insert_str(0, IDENTIFIER_PREFIX);
    }

    ident
}

/// Parameters substituted into the composition template
#[derive(Debug, Clone, PartialEq)]
pub struct CompositionParams {
    pub component: String,
    pub fps: f64,
    pub width: u32,
    pub height: u32,
    pub duration_in_frames: u64,
}

impl CompositionParams {
    /// Derives template parameters from the storyboard, `None` when it has no `meta`.
    ///
    /// The frame count is `totalDurationSec * fps` rounded to the nearest frame.
    pub fn from_storyboard(storyboard: &Storyboard) -> Option<Self> {
        let meta = storyboard.meta.as_ref()?;

        let fps = meta.fps.filter(|fps| *fps > 0.0).unwrap_or(DEFAULT_FPS);
        let total_duration_sec = storyboard.total_duration_sec().max(0.0);

        Some(Self {
            component: sanitize_identifier(meta.video_id.as_deref().unwrap_or_default()),
            fps,
            width: meta.width.unwrap_or(DEFAULT_WIDTH),
            height: meta.height.unwrap_or(DEFAULT_HEIGHT),
            duration_in_frames: (total_duration_sec * fps).round() as u64,
        })
    }

    pub fn render(&self) -> String {
        VIDEO_TEMPLATE
            .replace("__COMPONENT__", &self.component)
            .replace("__FPS__", &self.fps.to_string())
            .replace("__WIDTH__", &self.width.to_string())
            .replace("__HEIGHT__", &self.height.to_string())
            .replace("__DURATION_IN_FRAMES__", &self.duration_in_frames.to_string())
    }
}

/// Renders the composition source, `None` when the storyboard has no `meta`
pub fn render_composition(storyboard: &Storyboard) -> Option<String> {
    CompositionParams::from_storyboard(storyboard).map(|params| params.render())
}
