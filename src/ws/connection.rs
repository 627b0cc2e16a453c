//! WebSocket connection state machine.
//!
//! Handles the read/write loop for a single WebSocket connection,
//! dispatching incoming commands and forwarding filtered events.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::broadcast;

use super::messages::{WsCommand, WsMessage, WsMessageType};
use super::subscription::SubscriptionManager;
use crate::domain::{PortalEvent, Sport};
use crate::service::TeamService;

/// Runs the read/write loop for a single WebSocket connection.
///
/// - Reads commands from the client and dispatches them.
/// - Forwards events of subscribed sports from the [`broadcast::Receiver`]
///   to the client.
pub async fn run_connection(
    socket: WebSocket,
    mut event_rx: broadcast::Receiver<PortalEvent>,
    team_service: Arc<TeamService>,
) {
    let (mut ws_tx, mut ws_rx) = socket.split();
    let mut subs = SubscriptionManager::new();

    loop {
        tokio::select! {
            // Incoming message from client
            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        let response = handle_text_message(&text, &mut subs, &team_service).await;
                        if let Some(resp_json) = response
                            && ws_tx.send(Message::text(resp_json)).await.is_err() {
                                break;
                            }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    _ => {}
                }
            }
            // Event from EventBus
            event = event_rx.recv() => {
                match event {
                    Ok(portal_event) => {
                        if subs.matches(portal_event.sport()) {
                            let msg = WsMessage::server(
                                uuid::Uuid::new_v4().to_string(),
                                WsMessageType::Event,
                                serde_json::to_value(&portal_event).unwrap_or_default(),
                            );
                            let json = serde_json::to_string(&msg).unwrap_or_default();
                            if ws_tx.send(Message::text(json)).await.is_err() {
                                break;
                            }
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(lagged = n, "ws client lagged behind event bus");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }
    }

    tracing::debug!("ws connection closed");
}

/// Handles a text message from the client, returning an optional JSON response.
async fn handle_text_message(
    text: &str,
    subs: &mut SubscriptionManager,
    team_service: &TeamService,
) -> Option<String> {
    let Ok(msg) = serde_json::from_str::<WsMessage>(text) else {
        return serde_json::to_string(&WsMessage::error(String::new(), 400, "malformed JSON")).ok();
    };

    let Ok(command) = serde_json::from_value::<WsCommand>(msg.payload) else {
        return serde_json::to_string(&WsMessage::error(msg.id, 404, "unknown command")).ok();
    };

    let response = match command {
        WsCommand::Subscribe { sports } => {
            let (sports, wildcard) = parse_sports(&sports);
            subs.subscribe(&sports, wildcard);
            WsMessage::server(
                msg.id,
                WsMessageType::Response,
                serde_json::json!({
                    "subscribed": sports.iter().map(Sport::as_str).collect::<Vec<_>>(),
                    "count": subs.count(),
                    "wildcard": subs.is_subscribed_all(),
                }),
            )
        }
        WsCommand::Unsubscribe { sports } => {
            let (sports, wildcard) = parse_sports(&sports);
            subs.unsubscribe(&sports, wildcard);
            WsMessage::server(
                msg.id,
                WsMessageType::Response,
                serde_json::json!({
                    "unsubscribed": sports.iter().map(Sport::as_str).collect::<Vec<_>>(),
                    "remaining_count": subs.count(),
                    "wildcard": subs.is_subscribed_all(),
                }),
            )
        }
        WsCommand::GetStandings { sport } => {
            let table = match Sport::parse(&sport) {
                Ok(sport) => team_service
                    .standings(sport.as_str())
                    .await
                    .map(|table| (sport, table)),
                Err(e) => Err(e),
            };
            match table {
                Ok((sport, table)) => WsMessage::server(
                    msg.id,
                    WsMessageType::Response,
                    serde_json::json!({ "sport": sport, "table": table }),
                ),
                Err(e) => WsMessage::error(msg.id, e.status_code().as_u16(), &e.to_string()),
            }
        }
    };
    serde_json::to_string(&response).ok()
}

/// Splits raw sport tags into parsed sports and the wildcard flag. Invalid
/// tags are skipped.
fn parse_sports(raw: &[String]) -> (Vec<Sport>, bool) {
    let mut wildcard = false;
    let mut sports = Vec::with_capacity(raw.len());
    for tag in raw {
        if tag.trim() == "*" {
            wildcard = true;
        } else if let Ok(sport) = Sport::parse(tag) {
            sports.push(sport);
        }
    }
    (sports, wildcard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wildcard_and_invalid_tags() {
        let raw = vec!["*".to_string(), " Rugby".to_string(), "   ".to_string()];
        let (sports, wildcard) = parse_sports(&raw);
        assert!(wildcard);
        assert_eq!(sports.len(), 1);
        assert!(sports.iter().all(|s| s.as_str() == "rugby"));
    }
}
