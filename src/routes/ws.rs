//! WebSocket upgrade + message loop. Each client message is parsed as JSON and
//! forwarded to core logic. We reply with a single JSON message per request.

use std::sync::Arc;
use axum::{
  extract::{
    ws::{Message, WebSocket},
    State, WebSocketUpgrade,
  },
  response::IntoResponse,
};
use tracing::{info, error, instrument, debug};
use uuid::Uuid;

use crate::protocol::{ClientWsMessage, ServerWsMessage};
use crate::logic::*;
use crate::state::AppState;
use crate::util::trunc_for_log;

const LOG_PREVIEW_BYTES: usize = 200;

#[instrument(level = "info", skip(state))]
pub async fn ws_upgrade(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
  info!(target: "mathsfacts", "WebSocket upgrade requested");
  ws.on_upgrade(move |socket| handle_ws(socket, state))
}

/// Sessions started on one socket; dropped when the socket closes.
#[derive(Debug, Default)]
struct OwnedSessions(Vec<Uuid>);

impl OwnedSessions {
  fn track(&mut self, reply: &ServerWsMessage) {
    if let ServerWsMessage::Session { session } = reply {
      if let Ok(id) = Uuid::parse_str(&session.session_id) {
        self.0.push(id);
      }
    }
  }

  async fn release(self, state: &AppState) {
    let dropped = state.remove_sessions(&self.0).await;
    if dropped > 0 {
      info!(target: "mathsfacts", dropped, "Unfinished WebSocket sessions dropped");
    }
  }
}

#[instrument(level = "info", skip(socket, state))]
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
  info!(target: "mathsfacts", "WebSocket connected");
  let mut owned = OwnedSessions::default();
  while let Some(Ok(msg)) = socket.recv().await {
    match msg {
      Message::Text(txt) => {
        let reply = dispatch_text(&txt, &state, &mut owned).await;
        if let Err(e) = socket.send(Message::Text(reply)).await {
          error!(target: "mathsfacts", error = %e, "WS send error");
          break;
        }
      }
      Message::Ping(payload) => { let _ = socket.send(Message::Pong(payload)).await; }
      Message::Close(_) => break,
      _ => {}
    }
  }
  owned.release(&state).await;
  info!(target: "mathsfacts", "WebSocket disconnected");
}

/// Parse, dispatch, serialize. Invalid JSON becomes an `error` reply.
async fn dispatch_text(txt: &str, state: &AppState, owned: &mut OwnedSessions) -> String {
  let reply_msg = match serde_json::from_str::<ClientWsMessage>(txt) {
    Ok(incoming) => {
      debug!(target: "mathsfacts", "WS received: {:?}", &incoming);
      let reply = handle_client_ws(incoming, state).await;
      owned.track(&reply);
      reply
    }
    Err(e) => {
      debug!(target: "mathsfacts", raw = %trunc_for_log(txt, LOG_PREVIEW_BYTES), "WS message rejected");
      ServerWsMessage::Error { message: format!("Invalid JSON: {}", e) }
    }
  };

  serde_json::to_string(&reply_msg).unwrap_or_else(|e| {
    serde_json::json!({ "type": "error", "message": format!("Serialization error: {}", e) }).to_string()
  })
}

#[instrument(level = "info", skip(state))]
async fn handle_client_ws(msg: ClientWsMessage, state: &AppState) -> ServerWsMessage {
  let result = match msg {
    ClientWsMessage::Ping => return ServerWsMessage::Pong,

    ClientWsMessage::Levels => return ServerWsMessage::Levels { levels: list_levels(state).await },

    ClientWsMessage::Progress => return ServerWsMessage::Progress { progress: progress_report(state).await },

    ClientWsMessage::ResetProgress => return ServerWsMessage::Progress { progress: reset_progress(state).await },

    ClientWsMessage::StartLevel { level_key } => start_session(state, &level_key)
      .await
      .map(|session| ServerWsMessage::Session { session }),

    ClientWsMessage::NextLevel => start_next_level(state)
      .await
      .map(|session| ServerWsMessage::Session { session }),

    ClientWsMessage::SubmitAnswer { session_id, answer } => submit_answer(state, &session_id, &answer)
      .await
      .map(|result| ServerWsMessage::AnswerResult { result }),

    ClientWsMessage::Quit { session_id } => quit_session(state, &session_id)
      .await
      .map(|out| ServerWsMessage::Quit { session_id: out.session_id }),
  };

  result.unwrap_or_else(|e| {
    info!(target: "mathsfacts", error = %e, "WS request failed");
    ServerWsMessage::Error { message: e.to_string() }
  })
}
