use anyhow::{Context, Result};
use crossbeam_channel::Sender;
use futures_util::{SinkExt, StreamExt};
use meetgraph_core::{ChannelEvent, Command};
use tokio::net::UnixStream;
use tokio::sync::mpsc;
use tokio_util::codec::{Framed, LengthDelimitedCodec};

use crate::net::Incoming;

/// Handle for queueing outbound commands from the synchronous session
/// loop; frames are written by the channel thread.
pub struct ChannelHandle {
    commands: mpsc::Sender<Command>,
}

impl ChannelHandle {
    pub fn send(&self, cmd: Command) {
        let _ = self.commands.blocking_send(cmd);
    }
}

/// Connects to the meeting channel socket on a dedicated thread and
/// bridges decoded events into `events`. Malformed frames are dropped
/// with a warning; they never tear the connection down.
pub fn spawn_channel(sock_path: String, events: Sender<Incoming>) -> ChannelHandle {
    let (cmd_tx, cmd_rx) = mpsc::channel::<Command>(256);
    std::thread::spawn(move || {
        let rt = tokio::runtime::Runtime::new().expect("tokio runtime");
        rt.block_on(async move {
            if let Err(e) = run(sock_path.clone(), events.clone(), cmd_rx).await {
                let _ = events.send(Incoming::Error(format!("{e:?}")));
                let _ = events.send(Incoming::Disconnected);
            }
        });
    });
    ChannelHandle { commands: cmd_tx }
}

async fn run(
    sock_path: String,
    events: Sender<Incoming>,
    mut commands: mpsc::Receiver<Command>,
) -> Result<()> {
    let stream = UnixStream::connect(&sock_path)
        .await
        .with_context(|| format!("connect channel socket {sock_path}"))?;

    let framed = Framed::new(stream, LengthDelimitedCodec::new());
    let (mut sink, mut frames) = framed.split();

    let _ = events.send(Incoming::Connected);

    loop {
        tokio::select! {
            frame = frames.next() => {
                let Some(frame) = frame else { break };
                let bytes = frame?;
                match serde_json::from_slice::<ChannelEvent>(&bytes) {
                    Ok(ev) => {
                        let _ = events.send(Incoming::Event(ev));
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "dropping malformed channel event");
                        let _ = events.send(Incoming::Error(format!("decode error: {e}")));
                    }
                }
            }
            cmd = commands.recv() => {
                let Some(cmd) = cmd else { break };
                sink.send(serde_json::to_vec(&cmd)?.into()).await?;
            }
        }
    }

    let _ = events.send(Incoming::Disconnected);
    Ok(())
}
