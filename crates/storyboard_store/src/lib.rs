//! # Storyboard Store
//!
//! The storyboard domain model and the artifacts derived from it.
//!
//! A parsed [`Storyboard`] is written out through an [`ArtifactStore`]: the two
//! serializations returned by the completion service, the `Video.tsx`
//! composition stub and one empty voiceover placeholder per slide.

mod artifacts;
pub mod composition;
mod domain;

pub use artifacts::fs::FsArtifactStore;
pub use artifacts::{
    ArtifactStore, SerializationPaths, COMPOSITION_FILE, EXEC_SUMMARY_FILE, STORYBOARD_JSON,
    STORYBOARD_YAML, VOICEOVERS_DIR,
};
pub use domain::{
    AudioTracks, Element, ElementContent, ElementKind, Meta, Slide, SoundCue, Storyboard,
    Transition, NO_BACKGROUND_MUSIC,
};
