use meetgraph_core::{Edge, Node, NodeId};

use crate::interact::AnnotationState;

/// Rendering collaborator. Receives read-only views of the graph and
/// derived interaction state; it never mutates the graph itself. Dangling
/// edges are delivered as-is, to be filtered or visually distinguished by
/// the implementation.
pub trait RenderSurface {
    fn graph_changed(&mut self, nodes: &[Node], edges: &[Edge], selected: Option<&NodeId>);

    fn annotation_changed(&mut self, annotation: &AnnotationState);

    /// Transient "user is discussing X" advisory; display-only, no graph
    /// mutation backs it.
    fn keyword_advisory(&mut self, speaker: &str, keyword: &str) {
        let _ = (speaker, keyword);
    }

    /// Audible confirmation for a locally added node; opt-in per action.
    fn node_added_cue(&mut self) {}

    fn transcript_highlight(&mut self, event_id: &str) {
        let _ = event_id;
    }
}

/// Playback collaborator: accepts seek requests in seconds. The time
/// cursor flows the other way, into `MeetingSession::playback_tick`.
pub trait PlaybackSurface {
    fn request_seek(&mut self, target_sec: f64);
}
