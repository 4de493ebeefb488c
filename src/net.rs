use std::sync::Arc;

use futures::{SinkExt, StreamExt};
use log::{debug, info, warn};
use serde::Deserialize;
use tokio::net::TcpListener;
use tokio::sync::{Mutex, mpsc};
use tokio_tungstenite::accept_async;
use tungstenite::Message;

use raycast_vehicle::ControlInput;

use crate::state::SharedState;

pub const BIND_ADDR: &str = "0.0.0.0:9001";

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ClientMessage {
    Input {
        #[serde(default)]
        steer: f32,
        #[serde(default)]
        throttle: f32,
        #[serde(default)]
        brake: f32,
    },
    Ping,
}

impl ClientMessage {
    pub fn from_json(txt: &str) -> Option<Self> {
        serde_json::from_str(txt).ok()
    }
}

pub async fn start_websocket_server(state: Arc<Mutex<SharedState>>) -> std::io::Result<()> {
    let listener = TcpListener::bind(BIND_ADDR).await?;
    info!("websocket listening on ws://{BIND_ADDR}");

    loop {
        let (raw, peer) = match listener.accept().await {
            Ok(conn) => conn,
            Err(err) => {
                warn!("accept failed: {err}");
                continue;
            }
        };
        let state = Arc::clone(&state);

        tokio::spawn(async move {
            let ws = match accept_async(raw).await {
                Ok(ws) => ws,
                Err(err) => {
                    warn!("handshake with {peer} failed: {err}");
                    return;
                }
            };
            let (mut write, mut read) = ws.split();

            // -------------------------------
            // 1) Outgoing channel + session id
            // -------------------------------
            let (tx, mut rx) = mpsc::unbounded_channel::<String>();
            let session = state.lock().await.register_client(tx.clone());
            info!("client connected: {session} ({peer})");

            // -------------------------------
            // 2) Send loop
            // -------------------------------
            tokio::spawn(async move {
                while let Some(msg) = rx.recv().await {
                    if write.send(Message::Text(msg)).await.is_err() {
                        break;
                    }
                }
            });

            let welcome = format!(r#"{{"type":"welcome","session_id":"{session}"}}"#);
            let _ = tx.send(welcome);

            // -------------------------------
            // 3) Receive loop
            // -------------------------------
            while let Some(msg) = read.next().await {
                let msg = match msg {
                    Ok(m) => m,
                    Err(_) => break,
                };

                let text = match msg.to_text() {
                    Ok(t) if msg.is_text() => t,
                    _ => continue,
                };

                match ClientMessage::from_json(text) {
                    Some(ClientMessage::Ping) => {
                        let _ = tx.send(r#"{"type":"pong"}"#.into());
                    }
                    Some(ClientMessage::Input { steer, throttle, brake }) => {
                        state
                            .lock()
                            .await
                            .update_input(ControlInput { steer, throttle, brake });
                    }
                    None => debug!("ignoring message from {session}: {text}"),
                }
            }

            info!("client disconnected: {session}");
            state.lock().await.remove_client(&session);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_input_with_missing_axes() {
        match ClientMessage::from_json(r#"{"type":"input","throttle":0.8}"#) {
            Some(ClientMessage::Input { steer, throttle, brake }) => {
                assert_eq!(steer, 0.0);
                assert_eq!(throttle, 0.8);
                assert_eq!(brake, 0.0);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn parses_ping_and_rejects_unknown() {
        assert!(matches!(ClientMessage::from_json(r#"{"type":"ping"}"#), Some(ClientMessage::Ping)));
        assert!(ClientMessage::from_json(r#"{"type":"fly"}"#).is_none());
        assert!(ClientMessage::from_json("not json").is_none());
    }
}
