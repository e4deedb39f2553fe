// Wire protocol DTOs and conversions for public match messages.

use crate::domain::systems::paddle::{parse_direction, parse_side};
use crate::domain::{Ball, CanvasSize, MatchError, MatchMode, Paddle};
use crate::use_cases::{MatchCommand, MatchEvent, MatchSnapshot};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

const KNOWN_TYPES: [&str; 4] = [
    "game.starting",
    "player.moved",
    "player.pause",
    "player.unpause",
];

/// Failures decoding an inbound envelope. `Display` is the wire message.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ProtocolError {
    #[error("Invalid JSON format")]
    InvalidJson,
    #[error("Unknown message type: {0}")]
    UnknownType(String),
    #[error(transparent)]
    Rejected(#[from] MatchError),
}

/// Messages the client sends over the WebSocket.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum ClientMessage {
    #[serde(rename = "game.starting")]
    GameStarting { start: StartPayload },
    #[serde(rename = "player.moved")]
    PlayerMoved(MovePayload),
    #[serde(rename = "player.pause")]
    PlayerPause(MatchRef),
    #[serde(rename = "player.unpause")]
    PlayerUnpause(MatchRef),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartPayload {
    pub match_id: String,
    pub window_height: f64,
    pub window_width: f64,
    #[serde(default)]
    pub type_of_match: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovePayload {
    pub match_id: String,
    pub player: String,
    pub direction: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRef {
    pub match_id: String,
}

/// A decoded command together with the raw match id it targets.
#[derive(Debug)]
pub struct RoutedCommand {
    pub match_id: String,
    pub command: MatchCommand,
}

/// Parses one text frame into a routed command.
///
/// Unknown `type` values are reported separately from malformed payloads.
pub fn decode_client_message(text: &str) -> Result<RoutedCommand, ProtocolError> {
    let value: Value = serde_json::from_str(text).map_err(|_| ProtocolError::InvalidJson)?;
    let message_type = value
        .get("type")
        .and_then(Value::as_str)
        .ok_or(ProtocolError::InvalidJson)?;
    if !KNOWN_TYPES.contains(&message_type) {
        return Err(ProtocolError::UnknownType(message_type.to_string()));
    }

    let message: ClientMessage =
        serde_json::from_value(value).map_err(|_| ProtocolError::InvalidJson)?;
    message.try_into()
}

impl TryFrom<ClientMessage> for RoutedCommand {
    type Error = ProtocolError;

    fn try_from(message: ClientMessage) -> Result<Self, Self::Error> {
        let routed = match message {
            ClientMessage::GameStarting { start } => {
                let mode = match start.type_of_match.as_deref() {
                    Some("tournament") => MatchMode::Tournament,
                    _ => MatchMode::Normal,
                };
                RoutedCommand {
                    match_id: start.match_id,
                    command: MatchCommand::Start {
                        canvas: CanvasSize {
                            width: start.window_width,
                            height: start.window_height,
                        },
                        mode,
                    },
                }
            }
            ClientMessage::PlayerMoved(payload) => RoutedCommand {
                command: MatchCommand::Move {
                    side: parse_side(&payload.player)?,
                    direction: parse_direction(&payload.direction)?,
                },
                match_id: payload.match_id,
            },
            ClientMessage::PlayerPause(target) => RoutedCommand {
                match_id: target.match_id,
                command: MatchCommand::Pause,
            },
            ClientMessage::PlayerUnpause(target) => RoutedCommand {
                match_id: target.match_id,
                command: MatchCommand::Unpause,
            },
        };
        Ok(routed)
    }
}

/// Messages the server sends over the WebSocket.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum ServerMessage {
    #[serde(rename = "info")]
    Info {
        #[serde(rename = "matchId")]
        match_id: String,
    },
    #[serde(rename = "game.state")]
    GameState(GameStateDto),
    #[serde(rename = "match.result")]
    MatchResult { winner: String, loser: String },
    #[serde(rename = "error")]
    Error { message: String },
}

impl From<MatchEvent> for ServerMessage {
    fn from(event: MatchEvent) -> Self {
        match event {
            MatchEvent::Info { match_id } => ServerMessage::Info {
                match_id: match_id.to_string(),
            },
            MatchEvent::State(snapshot) => ServerMessage::GameState(snapshot.into()),
            MatchEvent::Result(result) => ServerMessage::MatchResult {
                winner: result.winner.to_string(),
                loser: result.loser.to_string(),
            },
            MatchEvent::Error { message } => ServerMessage::Error { message },
        }
    }
}

impl From<&ProtocolError> for ServerMessage {
    fn from(error: &ProtocolError) -> Self {
        ServerMessage::Error {
            message: error.to_string(),
        }
    }
}

/// Per-tick match snapshot for wire transmission.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStateDto {
    pub match_id: String,
    pub tick: u64,
    pub player_one: PaddleDto,
    pub player_two: PaddleDto,
    pub ball: BallDto,
    pub score_max: u32,
}

impl From<MatchSnapshot> for GameStateDto {
    fn from(snapshot: MatchSnapshot) -> Self {
        Self {
            match_id: snapshot.match_id.to_string(),
            tick: snapshot.tick,
            player_one: PaddleDto::from(&snapshot.player_one),
            player_two: PaddleDto::from(&snapshot.player_two),
            ball: BallDto::from(&snapshot.ball),
            score_max: snapshot.score_max,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaddleDto {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub paddle_speed: f64,
    pub score: u32,
}

impl From<&Paddle> for PaddleDto {
    fn from(paddle: &Paddle) -> Self {
        Self {
            x: paddle.x,
            y: paddle.y,
            width: paddle.width,
            height: paddle.height,
            paddle_speed: paddle.paddle_speed,
            score: paddle.score,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BallDto {
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub speed: f64,
    pub accel: f64,
    pub vx: f64,
    pub vy: f64,
}

impl From<&Ball> for BallDto {
    fn from(ball: &Ball) -> Self {
        Self {
            x: ball.x,
            y: ball.y,
            size: ball.size,
            speed: ball.speed,
            accel: ball.accel,
            vx: ball.vx,
            vy: ball.vy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::systems::scoring::MatchResult;
    use crate::domain::{Direction, MatchId, Side};
    use serde_json::json;

    #[test]
    fn decodes_game_starting_with_tournament_mode() {
        let text = json!({
            "type": "game.starting",
            "start": {
                "matchId": "abc",
                "windowHeight": 600,
                "windowWidth": 800.5,
                "typeOfMatch": "tournament"
            }
        })
        .to_string();

        let routed = decode_client_message(&text).expect("valid start");
        assert_eq!(routed.match_id, "abc");
        match routed.command {
            MatchCommand::Start { canvas, mode } => {
                assert_eq!(canvas.width, 800.5);
                assert_eq!(canvas.height, 600.0);
                assert_eq!(mode, MatchMode::Tournament);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn missing_type_of_match_is_normal() {
        let text = r#"{"type":"game.starting","start":{"matchId":"m","windowHeight":900,"windowWidth":900}}"#;
        let routed = decode_client_message(text).expect("valid start");
        assert!(matches!(
            routed.command,
            MatchCommand::Start {
                mode: MatchMode::Normal,
                ..
            }
        ));
    }

    #[test]
    fn decodes_player_moved() {
        let text = r#"{"type":"player.moved","matchId":"m","player":"p2","direction":"down"}"#;
        let routed = decode_client_message(text).expect("valid move");
        assert!(matches!(
            routed.command,
            MatchCommand::Move {
                side: Side::Two,
                direction: Direction::Down
            }
        ));
    }

    #[test]
    fn decodes_pause_and_unpause() {
        let pause = decode_client_message(r#"{"type":"player.pause","matchId":"m"}"#);
        let unpause = decode_client_message(r#"{"type":"player.unpause","matchId":"m"}"#);
        assert!(matches!(pause.map(|r| r.command), Ok(MatchCommand::Pause)));
        assert!(matches!(unpause.map(|r| r.command), Ok(MatchCommand::Unpause)));
    }

    #[test]
    fn unknown_type_is_reported_by_name() {
        let err = decode_client_message(r#"{"type":"player.jump","matchId":"m"}"#)
            .expect_err("unknown type");
        assert_eq!(err.to_string(), "Unknown message type: player.jump");
    }

    #[test]
    fn malformed_payloads_are_invalid_json() {
        for text in [
            "{not json",
            r#"{"matchId":"m"}"#,
            r#"{"type":"player.pause"}"#,
            r#"{"type":"game.starting","start":{"matchId":"m"}}"#,
        ] {
            let err = decode_client_message(text).expect_err("malformed");
            assert_eq!(err.to_string(), "Invalid JSON format", "input: {text}");
        }
    }

    #[test]
    fn unknown_player_is_rejected() {
        let err = decode_client_message(
            r#"{"type":"player.moved","matchId":"m","player":"p3","direction":"up"}"#,
        )
        .expect_err("unknown player");
        assert_eq!(err.to_string(), "Unknown player: p3");
    }

    #[test]
    fn game_state_uses_camel_case_fields() {
        let snapshot = MatchSnapshot {
            match_id: MatchId::new(),
            tick: 7,
            player_one: Paddle {
                x: 5.0,
                y: 360.0,
                width: 20.0,
                height: 180.0,
                paddle_speed: 20.0,
                score: 3,
            },
            player_two: Paddle::default(),
            ball: Ball::default(),
            score_max: 10,
        };
        let value = serde_json::to_value(ServerMessage::from(MatchEvent::State(snapshot)))
            .expect("serialize");

        assert_eq!(value["type"], "game.state");
        assert_eq!(value["scoreMax"], 10);
        assert_eq!(value["tick"], 7);
        assert_eq!(value["playerOne"]["paddleSpeed"], 20.0);
        assert_eq!(value["playerOne"]["score"], 3);
        assert!(value["ball"]["vx"].is_number());
        assert!(value["matchId"].is_string());
    }

    #[test]
    fn result_and_info_shapes() {
        let result = serde_json::to_value(ServerMessage::from(MatchEvent::Result(MatchResult {
            winner: Side::One,
            loser: Side::Two,
        })))
        .expect("serialize");
        assert_eq!(
            result,
            json!({"type": "match.result", "winner": "p1", "loser": "p2"})
        );

        let id = MatchId::new();
        let info = serde_json::to_value(ServerMessage::from(MatchEvent::Info { match_id: id }))
            .expect("serialize");
        assert_eq!(info, json!({"type": "info", "matchId": id.to_string()}));
    }
}
