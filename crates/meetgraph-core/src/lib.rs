use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct NodeId(pub String);

/// Edge ids arrive as store-assigned id strings for persisted meetings and
/// as numeric counters from live peers; both forms are kept verbatim.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(untagged)]
pub enum EdgeId {
    Num(u64),
    Str(String),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub label: String,
    pub content: String,
    pub color: String,
    pub priority: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Edge {
    pub id: EdgeId,
    pub from: NodeId,
    pub to: NodeId,
}

/// One conversation turn. `offset_ms` is the position within the recorded
/// audio; `timestamp_ms` is the wall-clock time of the utterance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TranscriptEvent {
    pub id: String,
    pub speaker: String,
    pub text: String,
    pub timestamp_ms: u64,
    pub offset_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Inbound events from the real-time channel.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum ChannelEvent {
    NodeAdded(Node),
    EdgeAdded(Edge),
    NodeRemoved { id: NodeId },
    Keyword { speaker: String, keyword: String },
}

/// Outbound commands to the channel; mirror the inbound shapes for
/// locally-originated mutations, plus the one-shot meeting termination.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum Command {
    AddNode(Node),
    AddEdge(Edge),
    RemoveNode { id: NodeId },
    EndMeeting { session_id: String },
}
