use crate::domain::{MatchError, MatchId, MatchVariant};
use crate::interface_adapters::protocol::{
    ProtocolError, RoutedCommand, ServerMessage, decode_client_message,
};
use crate::interface_adapters::state::AppState;
use crate::use_cases::types::RESERVED_EVENT_SLOTS;
use crate::use_cases::{MatchEvent, MatchHandle, MatchRegistry};

use axum::{
    Error,
    extract::{
        State,
        ws::{CloseFrame, Message, WebSocket, WebSocketUpgrade, close_code},
    },
    response::IntoResponse,
};
use futures_util::SinkExt;
use std::{
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::{Duration, Instant},
};
use tokio::sync::mpsc;
use tracing::{Instrument, Span, debug, info, info_span, warn};

const LOG_THROTTLE: Duration = Duration::from_secs(2);

static NEXT_CONN_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug)]
enum NetError {
    // Categorizes connection lifecycle failures so callers can decide policy.
    #[allow(dead_code)]
    Ws(axum::Error),
    #[allow(dead_code)]
    Serialization(serde_json::Error),
    #[allow(dead_code)]
    MatchUnavailable(MatchError),
}

impl From<axum::Error> for NetError {
    fn from(e: axum::Error) -> Self {
        NetError::Ws(e)
    }
}

pub async fn ws_local_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    upgrade(ws, state, MatchVariant::Local)
}

pub async fn ws_ai_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    upgrade(ws, state, MatchVariant::Ai)
}

pub async fn ws_remote_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    upgrade(ws, state, MatchVariant::Remote)
}

fn upgrade(
    ws: WebSocketUpgrade,
    state: Arc<AppState>,
    variant: MatchVariant,
) -> axum::response::Response {
    let registry = state.registry.clone();
    ws.on_upgrade(move |socket| handle_socket(socket, registry, variant))
}

async fn handle_socket(socket: WebSocket, registry: Arc<MatchRegistry>, variant: MatchVariant) {
    // Connection id correlates logs from before and after the match exists.
    let conn_id = NEXT_CONN_ID.fetch_add(1, Ordering::Relaxed);
    let span = info_span!("conn", conn_id, match_id = tracing::field::Empty);
    serve_connection(socket, registry, variant)
        .instrument(span)
        .await;
}

async fn serve_connection(
    mut socket: WebSocket,
    registry: Arc<MatchRegistry>,
    variant: MatchVariant,
) {
    // Events flow from the match task into this socket; the match owns the sender.
    // The queue is bounded so a reader that stops draining ends the match.
    let capacity = registry
        .settings()
        .event_channel_capacity
        .max(RESERVED_EVENT_SLOTS + 1);
    let (event_tx, event_rx) = mpsc::channel::<MatchEvent>(capacity);
    let handle = match registry.create(variant, event_tx).await {
        Ok(handle) => handle,
        Err(e) => {
            warn!(error = %e, "failed to create match");
            let _ = send_close_with_reason(&mut socket, close_code::ERROR, "match unavailable")
                .await;
            return;
        }
    };

    Span::current().record("match_id", tracing::field::display(handle.match_id));
    info!(?variant, "client connected");

    let mut ctx = ConnCtx {
        registry,
        handle,
        event_rx,
        events_open: true,
        stats: ConnStats::default(),
        last_invalid_log: Instant::now() - LOG_THROTTLE,
        close_frame: None,
    };

    if let Err(e) = run_client_loop(&mut socket, &mut ctx).await {
        warn!(error = ?e, "client loop exited with error");
    }

    // A finished match has already dropped its command receiver.
    match ctx.handle.disconnect().await {
        Ok(()) | Err(MatchError::MatchClosed) => {}
        Err(e) => debug!(error = %e, "disconnect not delivered"),
    }

    let ConnStats {
        msgs_in,
        msgs_out,
        bytes_in,
        bytes_out,
        rejected,
    } = ctx.stats;
    debug!(
        msgs_in,
        msgs_out, bytes_in, bytes_out, rejected, "connection stats"
    );
    info!("client disconnected");
}

struct ConnCtx {
    registry: Arc<MatchRegistry>,
    // The match created for this connection.
    handle: MatchHandle,
    event_rx: mpsc::Receiver<MatchEvent>,
    // False once the match task has exited and dropped its sender.
    events_open: bool,
    stats: ConnStats,
    last_invalid_log: Instant,
    close_frame: Option<CloseFrame>,
}

#[derive(Debug, Default, Clone, Copy)]
struct ConnStats {
    msgs_in: u64,
    msgs_out: u64,
    bytes_in: u64,
    bytes_out: u64,
    rejected: u32,
}

enum LoopControl {
    Continue,
    Disconnect,
}

async fn run_client_loop(socket: &mut WebSocket, ctx: &mut ConnCtx) -> Result<(), NetError> {
    let mut fatal: Option<NetError> = None;

    loop {
        let disconnect: bool = tokio::select! {
            incoming = socket.recv() => {
                match handle_incoming_ws(socket, incoming, ctx).await {
                    Ok(LoopControl::Continue) => false,
                    Ok(LoopControl::Disconnect) => true,
                    Err(e) => {
                        fatal = Some(e);
                        true
                    }
                }
            }

            event = ctx.event_rx.recv(), if ctx.events_open => {
                match event {
                    Some(event) => match forward_event(socket, event, &mut ctx.stats).await {
                        LoopControl::Continue => false,
                        LoopControl::Disconnect => true,
                    },
                    None => {
                        // The match is over; the socket stays open until the client leaves.
                        debug!("match task ended");
                        ctx.events_open = false;
                        false
                    }
                }
            }
        };

        if disconnect {
            if let Some(frame) = ctx.close_frame.take() {
                let _ = socket.send(Message::Close(Some(frame))).await;
            }
            if let Err(err) = socket.close().await.map_err(NetError::Ws) {
                debug!(error = ?err, "socket close error");
            }
            break;
        }
    }

    match fatal {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

async fn handle_incoming_ws(
    socket: &mut WebSocket,
    incoming: Option<Result<Message, Error>>,
    ctx: &mut ConnCtx,
) -> Result<LoopControl, NetError> {
    match incoming {
        Some(Ok(msg)) => match msg {
            Message::Text(text) => {
                ctx.stats.msgs_in += 1;
                ctx.stats.bytes_in += text.len() as u64;

                match decode_client_message(&text) {
                    Ok(routed) => route_command(ctx, routed).await,
                    Err(err) => {
                        ctx.stats.rejected += 1;
                        if should_log(&mut ctx.last_invalid_log) {
                            warn!(
                                bytes = text.len(),
                                error = %err,
                                "rejected client message"
                            );
                        }
                        reply_error(socket, &err, &mut ctx.stats).await
                    }
                }
            }
            Message::Binary(_) => {
                ctx.close_frame = Some(CloseFrame {
                    code: close_code::UNSUPPORTED,
                    reason: "binary messages not supported".into(),
                });
                Ok(LoopControl::Disconnect)
            }
            Message::Ping(_) | Message::Pong(_) => Ok(LoopControl::Continue),
            Message::Close(_) => Ok(LoopControl::Disconnect),
        },
        Some(Err(e)) => {
            warn!(error = %e, "websocket recv error");
            Ok(LoopControl::Disconnect)
        }
        None => {
            info!("websocket closed");
            Ok(LoopControl::Disconnect)
        }
    }
}

async fn route_command(ctx: &mut ConnCtx, routed: RoutedCommand) -> Result<LoopControl, NetError> {
    let RoutedCommand { match_id, command } = routed;

    // Commands naming an unknown or ended match are dropped.
    let Ok(match_id) = match_id.parse::<MatchId>() else {
        debug!(%match_id, "command for malformed match id ignored");
        return Ok(LoopControl::Continue);
    };
    let handle = match ctx.registry.get(&match_id).await {
        Ok(handle) => handle,
        Err(e) => {
            debug!(%match_id, error = %e, "command for unknown match ignored");
            return Ok(LoopControl::Continue);
        }
    };

    match handle.send(command).await {
        Ok(()) => Ok(LoopControl::Continue),
        Err(MatchError::MatchClosed) => {
            debug!(%match_id, "command raced match shutdown");
            Ok(LoopControl::Continue)
        }
        Err(e) => Err(NetError::MatchUnavailable(e)),
    }
}

async fn reply_error(
    socket: &mut WebSocket,
    err: &ProtocolError,
    stats: &mut ConnStats,
) -> Result<LoopControl, NetError> {
    let bytes = send_message(socket, &ServerMessage::from(err)).await?;
    stats.msgs_out += 1;
    stats.bytes_out += bytes as u64;
    Ok(LoopControl::Continue)
}

async fn forward_event(
    socket: &mut WebSocket,
    event: MatchEvent,
    stats: &mut ConnStats,
) -> LoopControl {
    let msg = ServerMessage::from(event);
    match send_message(socket, &msg).await {
        Ok(bytes) => {
            stats.msgs_out += 1;
            stats.bytes_out += bytes as u64;
            LoopControl::Continue
        }
        Err(err) => {
            // Log unexpected send failures; disconnect will follow immediately.
            warn!(error = ?err, "failed to send match event");
            LoopControl::Disconnect
        }
    }
}

async fn send_message(socket: &mut WebSocket, msg: &ServerMessage) -> Result<usize, NetError> {
    let txt = serde_json::to_string(msg).map_err(NetError::Serialization)?;
    let bytes = txt.len();
    socket
        .send(Message::Text(txt.into()))
        .await
        .map_err(NetError::Ws)?;
    Ok(bytes)
}

async fn send_close_with_reason(
    socket: &mut WebSocket,
    code: u16,
    reason: &'static str,
) -> Result<(), NetError> {
    socket
        .send(Message::Close(Some(CloseFrame {
            code,
            reason: reason.into(),
        })))
        .await
        .map_err(NetError::Ws)?;
    socket.close().await.map_err(NetError::Ws)
}

fn should_log(last: &mut Instant) -> bool {
    if last.elapsed() >= LOG_THROTTLE {
        *last = Instant::now();
        true
    } else {
        false
    }
}
