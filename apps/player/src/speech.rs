//! Speech through an external text-to-speech program.

use lesson_core::{SpeechError, SpeechOptions, SpeechSynthesizer};
use rand::seq::IndexedRandom;
use rand::Rng;
use std::io::ErrorKind;
use std::process::{Command, Stdio};
use tracing::debug;

/// Runs `program [-v voice] text` for every utterance without waiting for it.
#[derive(Debug, Clone)]
pub struct CommandSpeech {
    program: String,
    voices: Vec<String>,
}

impl CommandSpeech {
    pub fn new(program: impl Into<String>, voices: Vec<String>) -> Self {
        Self {
            program: program.into(),
            voices,
        }
    }

    /// Arguments for one utterance. A voice is only passed when a random one
    /// was asked for and there are voices to choose from.
    pub fn args_for<R: Rng + ?Sized>(&self, text: &str, options: SpeechOptions, rng: &mut R) -> Vec<String> {
        let mut args = Vec::with_capacity(3);
        if options.random_voice {
            if let Some(voice) = self.voices.choose(rng) {
                args.push("-v".to_string());
                args.push(voice.clone());
            }
        }
        args.push(text.to_string());
        args
    }
}

impl SpeechSynthesizer for CommandSpeech {
    fn speak(&self, text: &str, options: SpeechOptions) -> Result<(), SpeechError> {
        let args = self.args_for(text, options, &mut rand::rng());
        debug!(program = %self.program, ?args, "speaking");

        let mut child = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => SpeechError::Unavailable(self.program.clone()),
                _ => SpeechError::Io(e),
            })?;

        // Reap the child off the input path.
        std::thread::spawn(move || child.wait());
        Ok(())
    }
}
