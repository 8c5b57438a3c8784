//! Run reporter: fans events out to the transcript, the console and tracing

use tracing::debug;

use crate::console::ConsoleFormat;
use crate::event::Event;
use crate::transcript::Transcript;
use crate::Result;

/// Records every event of a run, in order
pub struct Reporter {
    transcript: Transcript,
    console: Option<ConsoleFormat>,
}

impl Reporter {
    /// Reporter that echoes events to stdout in the given format
    pub fn new(transcript: Transcript, console: ConsoleFormat) -> Self {
        Self {
            transcript,
            console: Some(console.resolve()),
        }
    }

    /// Reporter that only writes the transcript
    pub fn silent(transcript: Transcript) -> Self {
        Self {
            transcript,
            console: None,
        }
    }

    pub fn record(&mut self, event: Event) -> Result<()> {
        let message = event.console_message();

        // Operator output goes to stdout; tracing mirrors it at debug only
        debug!(severity = ?event.severity(), event = ?event, "{}", message);

        if let Some(format) = self.console {
            println!("{}", format.render(event.severity(), &message));
        }

        for line in event.transcript_lines() {
            self.transcript.push_line(&line)?;
        }
        Ok(())
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }
}
