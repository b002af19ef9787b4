use crate::config::Overflow;
use crate::engine::join::ActiveSegment;
use crate::template::SegmentsCache;
use std::time::Duration;

/// Evaluation record of one segment, for the debug report.
#[derive(Debug, Clone)]
pub struct SegmentTiming {
    pub name: String,
    pub enabled: bool,
    pub duration: Duration,
    pub text: String,
}

/// State of one prompt render. Created per render, never shared.
#[derive(Debug, Default)]
pub struct RenderSession {
    /// Data of enabled segments, by display name.
    pub segments: SegmentsCache,
    /// The last emitted segment. Survives block boundaries, so the first
    /// segment of a block joins onto the last one of the blocks before.
    pub(crate) previous: Option<ActiveSegment>,
    pub(crate) prompt: String,
    pub(crate) current_line_length: usize,
    pub(crate) rprompt: String,
    pub(crate) rprompt_length: usize,
    pub(crate) overflow: Option<Overflow>,
    pub(crate) timings: Vec<SegmentTiming>,
}

impl RenderSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn previous(&self) -> Option<&ActiveSegment> {
        self.previous.as_ref()
    }

    pub fn current_line_length(&self) -> usize {
        self.current_line_length
    }

    /// Buffered right prompt and its printed length.
    pub fn rprompt(&self) -> (&str, usize) {
        (&self.rprompt, self.rprompt_length)
    }

    pub fn overflow(&self) -> Option<Overflow> {
        self.overflow
    }

    pub fn timings(&self) -> &[SegmentTiming] {
        &self.timings
    }

    pub(crate) fn write(&mut self, text: &str) {
        self.prompt.push_str(text);
    }

    pub(crate) fn write_newline(&mut self) {
        self.prompt.push('\n');
        self.current_line_length = 0;
    }

    pub(crate) fn take_prompt(&mut self) -> String {
        std::mem::take(&mut self.prompt)
    }
}
