use anyhow::Result;
use meetgraph_core::{Edge, Node, NodeId};
use meetgraph_session::config;
use meetgraph_session::interact::AnnotationState;
use meetgraph_session::net::{spawn_channel, Incoming};
use meetgraph_session::render::RenderSurface;
use meetgraph_session::session::MeetingSession;

/// Headless surface for running a session against a live channel; real
/// deployments plug a graph renderer in here instead.
struct LogSurface;

impl RenderSurface for LogSurface {
    fn graph_changed(&mut self, nodes: &[Node], edges: &[Edge], selected: Option<&NodeId>) {
        tracing::info!(
            nodes = nodes.len(),
            edges = edges.len(),
            selected = ?selected.map(|id| id.0.as_str()),
            "graph changed"
        );
    }

    fn annotation_changed(&mut self, annotation: &AnnotationState) {
        if annotation.visible {
            tracing::info!(x = annotation.anchor_x, y = annotation.anchor_y, "annotation shown");
        }
    }

    fn keyword_advisory(&mut self, speaker: &str, keyword: &str) {
        tracing::info!(speaker, keyword, "keyword advisory");
    }
}

fn main() -> Result<()> {
    let _ = tracing_subscriber::fmt::try_init();

    let cfg = config::load_or_default();
    let session_id = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "local".to_string());

    let (tx, rx) = crossbeam_channel::unbounded();
    let channel = spawn_channel(cfg.channel_socket.clone(), tx);

    let mut session = MeetingSession::new(session_id, &cfg);
    let mut surface = LogSurface;

    for incoming in rx {
        match incoming {
            Incoming::Connected => tracing::info!("channel connected"),
            Incoming::Event(ev) => {
                session.apply_remote(ev, &mut surface);
                for cmd in session.drain_outbox() {
                    channel.send(cmd);
                }
            }
            Incoming::Error(e) => tracing::warn!(error = %e, "channel error"),
            Incoming::Disconnected => {
                tracing::info!("channel disconnected");
                break;
            }
        }
    }

    session.end();
    for cmd in session.drain_outbox() {
        channel.send(cmd);
    }
    Ok(())
}
