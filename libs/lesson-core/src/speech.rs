//! Speech synthesis collaborator.

use thiserror::Error;

/// Options for one utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SpeechOptions {
    /// Pick a voice at random instead of the default one.
    pub random_voice: bool,
}

#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("speech synthesis unavailable: {0}")]
    Unavailable(String),

    #[error("speech synthesis failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Fire-and-forget text-to-speech. Callers treat every error as recoverable.
pub trait SpeechSynthesizer {
    fn speak(&self, text: &str, options: SpeechOptions) -> Result<(), SpeechError>;
}

/// Synthesizer that says nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct Silent;

impl SpeechSynthesizer for Silent {
    fn speak(&self, _text: &str, _options: SpeechOptions) -> Result<(), SpeechError> {
        Ok(())
    }
}
