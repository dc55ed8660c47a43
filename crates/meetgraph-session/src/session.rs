use meetgraph_core::{ChannelEvent, Command, Edge, EdgeId, Node, NodeId};
use std::collections::VecDeque;

use crate::bootstrap::MeetingSnapshot;
use crate::config::SessionConfig;
use crate::graph::{Applied, GraphStore, SyncReconciler};
use crate::interact::{ElementBounds, InteractionMapper};
use crate::playback::{PlaybackCorrelator, PlaybackError};
use crate::render::{PlaybackSurface, RenderSurface};

/// One meeting's worth of graph state, with every mutation (local action
/// or reconciled remote event) funneled through this single entry point.
/// An add is atomic: a read between calls never observes a half-applied
/// node or edge.
pub struct MeetingSession {
    session_id: String,
    store: GraphStore,
    reconciler: SyncReconciler,
    mapper: InteractionMapper,
    correlator: PlaybackCorrelator,
    selected: Option<NodeId>,
    outbox: VecDeque<Command>,
    next_local_seq: u64,
    ended: bool,
}

impl MeetingSession {
    pub fn new(session_id: impl Into<String>, cfg: &SessionConfig) -> Self {
        Self {
            session_id: session_id.into(),
            store: GraphStore::default(),
            reconciler: SyncReconciler::default(),
            mapper: InteractionMapper::new(cfg.popover_margin_px),
            correlator: PlaybackCorrelator::empty(),
            selected: None,
            outbox: VecDeque::new(),
            next_local_seq: 0,
            ended: false,
        }
    }

    /// Loads a persisted snapshot through the reconciler, so replaying the
    /// same snapshot twice (or over a live stream) is absorbed.
    pub fn bootstrap(&mut self, snapshot: MeetingSnapshot, render: &mut dyn RenderSurface) {
        for node in snapshot.nodes {
            self.reconciler
                .apply(&mut self.store, ChannelEvent::NodeAdded(node));
        }
        for edge in snapshot.edges {
            self.reconciler
                .apply(&mut self.store, ChannelEvent::EdgeAdded(edge));
        }
        self.correlator = PlaybackCorrelator::new(snapshot.transcript);
        self.notify_graph(render);
    }

    /// Applies one decoded remote event. Absorbed duplicates and
    /// suppressed adds raise no render notification, so a re-sent batch
    /// after a reconnect causes no flicker.
    pub fn apply_remote(&mut self, event: ChannelEvent, render: &mut dyn RenderSurface) -> Applied {
        let outcome = self.reconciler.apply(&mut self.store, event);
        match &outcome {
            Applied::NodeInserted(_) | Applied::EdgeInserted(_) => self.notify_graph(render),
            Applied::NodeRemoved(id) => {
                if self.selected.as_ref() == Some(id) {
                    self.selected = None;
                }
                self.notify_graph(render);
            }
            Applied::Keyword { speaker, keyword } => render.keyword_advisory(speaker, keyword),
            Applied::Duplicate | Applied::Suppressed | Applied::Parked | Applied::Noop
            | Applied::Rejected => {}
        }
        outcome
    }

    // ----- Local user actions -----

    /// Adds a locally-authored node and queues the mirrored channel
    /// command. `emit_sound` only toggles the audible confirmation.
    pub fn add_node(
        &mut self,
        label: &str,
        content: &str,
        color: &str,
        priority: i32,
        emit_sound: bool,
        render: &mut dyn RenderSurface,
    ) -> NodeId {
        let id = self.next_node_id();
        let node = Node {
            id: id.clone(),
            label: label.to_string(),
            content: content.to_string(),
            color: color.to_string(),
            priority,
        };
        let outcome = self
            .reconciler
            .apply(&mut self.store, ChannelEvent::NodeAdded(node.clone()));
        if matches!(outcome, Applied::NodeInserted(_)) {
            self.outbox.push_back(Command::AddNode(node));
            if emit_sound {
                render.node_added_cue();
            }
            self.notify_graph(render);
        }
        id
    }

    pub fn add_edge(&mut self, from: NodeId, to: NodeId, render: &mut dyn RenderSurface) -> EdgeId {
        let id = self.next_edge_id();
        let edge = Edge {
            id: id.clone(),
            from,
            to,
        };
        let outcome = self
            .reconciler
            .apply(&mut self.store, ChannelEvent::EdgeAdded(edge.clone()));
        if matches!(outcome, Applied::EdgeInserted(_) | Applied::Parked) {
            self.outbox.push_back(Command::AddEdge(edge));
            if matches!(outcome, Applied::EdgeInserted(_)) {
                self.notify_graph(render);
            }
        }
        id
    }

    pub fn remove_node(&mut self, id: NodeId, render: &mut dyn RenderSurface) {
        let outcome = self
            .reconciler
            .apply(&mut self.store, ChannelEvent::NodeRemoved { id: id.clone() });
        self.outbox.push_back(Command::RemoveNode { id: id.clone() });
        if matches!(outcome, Applied::NodeRemoved(_)) {
            if self.selected.as_ref() == Some(&id) {
                self.selected = None;
            }
            self.notify_graph(render);
        }
    }

    // ----- Pointer input (capability interface handed to the renderer) -----

    pub fn on_click(&mut self, id: &NodeId, render: &mut dyn RenderSurface) -> Option<NodeId> {
        self.selected = self.mapper.map_click(&self.store, id).map(|n| n.id.clone());
        self.notify_graph(render);
        self.selected.clone()
    }

    pub fn on_hover(
        &mut self,
        target: Option<(&NodeId, ElementBounds)>,
        render: &mut dyn RenderSurface,
    ) {
        let state = self.mapper.map_hover(&self.store, target);
        render.annotation_changed(state);
    }

    /// Second phase of annotation anchoring, driven by the renderer once
    /// the popover's own width is known.
    pub fn on_annotation_measured(&mut self, width: f32, render: &mut dyn RenderSurface) {
        let state = self.mapper.apply_measured_width(width);
        render.annotation_changed(state);
    }

    // ----- Playback -----

    pub fn set_transcript(&mut self, events: Vec<meetgraph_core::TranscriptEvent>) {
        self.correlator = PlaybackCorrelator::new(events);
    }

    /// Called on every playback time tick; notifies the surface only when
    /// the highlighted transcript event changes.
    pub fn playback_tick(&mut self, current_time_sec: f64, render: &mut dyn RenderSurface) {
        if let Some(id) = self.correlator.tick(current_time_sec) {
            render.transcript_highlight(id);
        }
    }

    /// User selected a transcript event; issues the seek only when the id
    /// resolves.
    pub fn seek_to_event(
        &mut self,
        event_id: &str,
        playback: &mut dyn PlaybackSurface,
    ) -> Result<f64, PlaybackError> {
        let target = self.correlator.seek_for(event_id)?;
        playback.request_seek(target);
        Ok(target)
    }

    // ----- Lifecycle -----

    /// Ends the meeting: queues the one-shot `end_meeting` notification and
    /// discards tombstones, parked edges and annotation state. Idempotent.
    pub fn end(&mut self) {
        if self.ended {
            return;
        }
        self.ended = true;
        self.reconciler.clear();
        self.mapper.clear();
        self.outbox.push_back(Command::EndMeeting {
            session_id: self.session_id.clone(),
        });
        tracing::info!(session = %self.session_id, "meeting ended");
    }

    pub fn is_ended(&self) -> bool {
        self.ended
    }

    /// Locally-originated commands awaiting transmission, oldest first.
    pub fn drain_outbox(&mut self) -> Vec<Command> {
        self.outbox.drain(..).collect()
    }

    // ----- Read-only views -----

    pub fn nodes(&self) -> &[Node] {
        self.store.nodes()
    }

    pub fn edges(&self) -> &[Edge] {
        self.store.edges()
    }

    pub fn selected(&self) -> Option<&NodeId> {
        self.selected.as_ref()
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    fn notify_graph(&mut self, render: &mut dyn RenderSurface) {
        render.graph_changed(self.store.nodes(), self.store.edges(), self.selected.as_ref());
    }

    // Local ids carry the session prefix so they cannot collide with ids
    // minted by other participants.
    fn next_node_id(&mut self) -> NodeId {
        self.next_local_seq += 1;
        NodeId(format!("{}-n{}", self.session_id, self.next_local_seq))
    }

    fn next_edge_id(&mut self) -> EdgeId {
        self.next_local_seq += 1;
        EdgeId::Str(format!("{}-e{}", self.session_id, self.next_local_seq))
    }
}
