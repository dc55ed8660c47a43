use meetgraph_core::TranscriptEvent;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum PlaybackError {
    #[error("transcript event not found: {0}")]
    NotFound(String),
}

/// Correlates the advancing audio playback cursor with the ordered set of
/// transcript events.
///
/// `nearest_event` runs on every playback tick (several per second), so it
/// stays a binary search over the offset-sorted events with no I/O.
pub struct PlaybackCorrelator {
    events: Vec<TranscriptEvent>,
    by_id: HashMap<String, usize>,
    highlighted: Option<String>,
}

impl PlaybackCorrelator {
    pub fn new(mut events: Vec<TranscriptEvent>) -> Self {
        events.sort_by_key(|e| e.offset_ms);
        let mut by_id = HashMap::with_capacity(events.len());
        for (i, e) in events.iter().enumerate() {
            by_id.entry(e.id.clone()).or_insert(i);
        }
        Self {
            events,
            by_id,
            highlighted: None,
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn events(&self) -> &[TranscriptEvent] {
        &self.events
    }

    /// The event whose offset is nearest to the cursor; ties go to the
    /// earlier offset. `None` only on an empty transcript.
    pub fn nearest_event(&self, current_time_sec: f64) -> Option<&TranscriptEvent> {
        if self.events.is_empty() {
            return None;
        }
        let t_ms = current_time_sec * 1000.0;
        let i = self.events.partition_point(|e| (e.offset_ms as f64) < t_ms);
        if i == 0 {
            return self.events.first();
        }
        if i == self.events.len() {
            return self.events.last();
        }
        let before = &self.events[i - 1];
        let after = &self.events[i];
        if t_ms - before.offset_ms as f64 <= after.offset_ms as f64 - t_ms {
            Some(before)
        } else {
            Some(after)
        }
    }

    /// Seek target in seconds for a user-selected event. The caller must
    /// not issue a seek when this fails.
    pub fn seek_for(&self, event_id: &str) -> Result<f64, PlaybackError> {
        self.by_id
            .get(event_id)
            .map(|&i| self.events[i].offset_ms as f64 / 1000.0)
            .ok_or_else(|| PlaybackError::NotFound(event_id.to_string()))
    }

    /// Advances the highlight to the event nearest the cursor, reporting
    /// only changes so the surface is not re-highlighted on every tick.
    pub fn tick(&mut self, current_time_sec: f64) -> Option<&str> {
        let next = self.nearest_event(current_time_sec).map(|e| e.id.clone());
        if next == self.highlighted {
            return None;
        }
        self.highlighted = next;
        self.highlighted.as_deref()
    }

    pub fn highlighted(&self) -> Option<&str> {
        self.highlighted.as_deref()
    }
}
