//! Parses the persisted-state documents served for session bootstrap and
//! post-meeting review. Transport (HTTP fetch, SSE) lives outside; this
//! module only consumes the already-fetched JSON text.

use anyhow::{Context, Result};
use meetgraph_core::{Edge, EdgeId, Node, NodeId, TranscriptEvent};
use serde::Deserialize;

/// Parsed snapshot of a recorded meeting: the keyword graph plus the
/// transcript, ready to feed through the reconciler.
#[derive(Debug)]
pub struct MeetingSnapshot {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    pub transcript: Vec<TranscriptEvent>,
}

/// One-shot meeting summary document (title, schedule, participants and
/// the generated minutes).
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct MeetingSummary {
    pub title: String,
    #[serde(rename = "startTime")]
    pub start_time: String,
    /// Meeting duration in milliseconds.
    pub period: u64,
    #[serde(default)]
    pub owner: Vec<Participant>,
    pub mom: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Participant {
    pub name: String,
    pub role: String,
    #[serde(default)]
    pub image: String,
}

#[derive(Debug, Deserialize)]
struct StoredSnapshot {
    #[serde(default)]
    conversations: Vec<StoredConversation>,
    #[serde(default)]
    vertexes: Vec<StoredVertex>,
    #[serde(default)]
    edges: Vec<StoredEdge>,
}

#[derive(Debug, Deserialize)]
struct StoredVertex {
    #[serde(rename = "_id")]
    id: String,
    keyword: String,
    #[serde(default)]
    subject: String,
    #[serde(default)]
    priority: i32,
}

#[derive(Debug, Deserialize)]
struct StoredEdge {
    #[serde(rename = "_id")]
    id: EdgeId,
    vertex1: StoredRef,
    vertex2: StoredRef,
}

#[derive(Debug, Deserialize)]
struct StoredConversation {
    #[serde(rename = "_id")]
    id: String,
    user: String,
    script: String,
    /// Epoch milliseconds.
    timestamp: u64,
    time_offset: u64,
    #[serde(default)]
    image: Option<String>,
}

/// Older meetings persist vertex references as numeric indexes, newer ones
/// as id strings; normalize both to the string id form.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StoredRef {
    Num(u64),
    Str(String),
}

impl StoredRef {
    fn into_node_id(self) -> NodeId {
        match self {
            StoredRef::Num(n) => NodeId(n.to_string()),
            StoredRef::Str(s) => NodeId(s),
        }
    }
}

/// Parses the `{conversations, vertexes, edges}` snapshot document.
/// Replayed nodes all use `node_color`; the live colors are not persisted.
pub fn parse_snapshot(json: &str, node_color: &str) -> Result<MeetingSnapshot> {
    let raw: StoredSnapshot =
        serde_json::from_str(json).context("malformed meeting snapshot document")?;

    let nodes = raw
        .vertexes
        .into_iter()
        .map(|v| Node {
            id: NodeId(v.id),
            label: v.keyword,
            content: v.subject,
            color: node_color.to_string(),
            priority: v.priority,
        })
        .collect();

    let edges = raw
        .edges
        .into_iter()
        .map(|e| Edge {
            id: e.id,
            from: e.vertex1.into_node_id(),
            to: e.vertex2.into_node_id(),
        })
        .collect();

    let transcript = raw
        .conversations
        .into_iter()
        .map(|c| TranscriptEvent {
            id: c.id,
            speaker: c.user,
            text: c.script,
            timestamp_ms: c.timestamp,
            offset_ms: c.time_offset,
            image: c.image,
        })
        .collect();

    Ok(MeetingSnapshot {
        nodes,
        edges,
        transcript,
    })
}

/// Parses the one-shot summary document delivered over the streaming
/// endpoint.
pub fn parse_summary(json: &str) -> Result<MeetingSummary> {
    serde_json::from_str(json).context("malformed meeting summary document")
}
