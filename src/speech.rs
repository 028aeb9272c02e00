use std::process::{Child, Command, Stdio};

/// espeak's normal speaking speed in words per minute.
const BASE_WPM: f32 = 175.0;

/// Text-to-speech, fire-and-forget. Failures never reach the drill.
pub trait Speaker {
    fn speak(&mut self, text: &str, rate: f32);
}

/// Speaks through an external program that takes `-s <wpm> <text>`,
/// such as `espeak-ng` or `espeak`.
pub struct CommandSpeaker {
    command: String,
    current: Option<Child>,
}

impl CommandSpeaker {
    pub fn new(command: &str) -> Self {
        Self {
            command: command.to_string(),
            current: None,
        }
    }

    fn words_per_minute(rate: f32) -> u32 {
        (BASE_WPM * rate).round().clamp(40.0, 450.0) as u32
    }

    /// Cut off whatever is still being spoken.
    fn stop(&mut self) {
        if let Some(mut child) = self.current.take() {
            if matches!(child.try_wait(), Ok(None)) {
                let _ = child.kill();
            }
            let _ = child.wait();
        }
    }
}

impl Speaker for CommandSpeaker {
    fn speak(&mut self, text: &str, rate: f32) {
        self.stop();
        let spawned = Command::new(&self.command)
            .arg("-s")
            .arg(Self::words_per_minute(rate).to_string())
            .arg(text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();
        match spawned {
            Ok(child) => self.current = Some(child),
            Err(e) => log::debug!("Speech command {:?} failed to start: {e}", self.command),
        }
    }
}

impl Drop for CommandSpeaker {
    fn drop(&mut self) {
        self.stop();
    }
}

pub struct NullSpeaker;

impl Speaker for NullSpeaker {
    fn speak(&mut self, _text: &str, _rate: f32) {}
}
