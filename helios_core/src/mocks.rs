//! Test and helper doubles for helios_core

use std::collections::VecDeque;

use helios_traits::{BoxError, TelemetrySample, TelemetrySource};

/// Replays a fixed script of samples and errors, then reports exhaustion.
#[derive(Debug, Default)]
pub struct ScriptedSource {
    script: VecDeque<Result<TelemetrySample, String>>,
}

impl ScriptedSource {
    pub fn new(samples: impl IntoIterator<Item = TelemetrySample>) -> Self {
        Self {
            script: samples.into_iter().map(Ok).collect(),
        }
    }

    /// Queue an error to be returned at this point in the script.
    #[must_use]
    pub fn then_error(mut self, message: impl Into<String>) -> Self {
        self.script.push_back(Err(message.into()));
        self
    }

    #[must_use]
    pub fn then(mut self, sample: TelemetrySample) -> Self {
        self.script.push_back(Ok(sample));
        self
    }
}

impl TelemetrySource for ScriptedSource {
    fn next_sample(&mut self) -> Result<Option<TelemetrySample>, BoxError> {
        match self.script.pop_front() {
            Some(Ok(s)) => Ok(Some(s)),
            Some(Err(msg)) => Err(Box::new(std::io::Error::other(msg))),
            None => Ok(None),
        }
    }
}
