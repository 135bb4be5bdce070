//! Caption derivation for quote posts.

/// Turns a source post's text into the caption of the quote post.
pub trait CaptionWriter {
    fn caption(&self, source_text: &str) -> String;
}

/// Reuses the source text unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct VerbatimCaption;

impl CaptionWriter for VerbatimCaption {
    fn caption(&self, source_text: &str) -> String {
        source_text.to_string()
    }
}
