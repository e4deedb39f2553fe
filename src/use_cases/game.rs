use super::scheduler::{TickScheduler, wait_for};
use super::session::MatchSession;
use super::types::{EventSink, MatchCommand, MatchEvent};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Why a match task stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchExit {
    /// A side reached the target score.
    Finished,
    /// Explicit disconnect, or every command sender was dropped.
    Disconnected,
    /// The transport stopped accepting events.
    DeliveryFailed,
}

/// Owns one match: applies commands in arrival order and drives its ticks.
///
/// All reads and writes of the session happen on this task, so commands and
/// ticks never race.
pub async fn match_task<S: EventSink>(
    mut session: MatchSession,
    mut command_rx: mpsc::Receiver<MatchCommand>,
    events: S,
    tick_interval: Duration,
) -> MatchExit {
    let match_id = session.id();
    let mut scheduler = TickScheduler::new(tick_interval);

    loop {
        let deadline = scheduler.deadline();
        tokio::select! {
            command = command_rx.recv() => {
                let Some(command) = command else {
                    debug!(%match_id, "command channel closed");
                    session.terminate();
                    return MatchExit::Disconnected;
                };
                if let Some(exit) = apply_command(&mut session, &mut scheduler, &events, command) {
                    return exit;
                }
            }
            _ = wait_for(deadline), if deadline.is_some() => {
                scheduler.disarm();
                // Status is checked after waking: a pause that landed mid-sleep
                // stops the loop here without touching the state.
                let Some(outcome) = session.tick() else {
                    continue;
                };

                if let Some(result) = outcome.result {
                    let state = session.state();
                    info!(
                        %match_id,
                        winner = %result.winner,
                        score_one = state.player_one.score,
                        score_two = state.player_two.score,
                        ticks = state.tick,
                        "match finished"
                    );
                    if let Err(e) = events.deliver(MatchEvent::Result(result)) {
                        warn!(%match_id, error = %e, "failed to deliver match result");
                    }
                    return MatchExit::Finished;
                }

                if let Err(e) = events.deliver(MatchEvent::State(session.snapshot())) {
                    warn!(%match_id, error = %e, "peer gone or stalled; ending match");
                    session.terminate();
                    return MatchExit::DeliveryFailed;
                }
                scheduler.arm();
            }
        }
    }
}

fn apply_command<S: EventSink>(
    session: &mut MatchSession,
    scheduler: &mut TickScheduler,
    events: &S,
    command: MatchCommand,
) -> Option<MatchExit> {
    let match_id = session.id();
    match command {
        MatchCommand::Start { canvas, mode } => match session.initialize(canvas, mode) {
            Ok(true) => {
                let state = session.state();
                info!(
                    %match_id,
                    width = state.canvas.width,
                    height = state.canvas.height,
                    scale = state.canvas.scale,
                    max_score = state.max_score,
                    "match started"
                );
                scheduler.arm();
            }
            Ok(false) => debug!(%match_id, "duplicate start ignored"),
            Err(e) => {
                warn!(%match_id, error = %e, "rejected match start");
                let message = e.to_string();
                if events.deliver(MatchEvent::Error { message }).is_err() {
                    session.terminate();
                    return Some(MatchExit::DeliveryFailed);
                }
            }
        },
        MatchCommand::Move { side, direction } => {
            session.move_paddle(side, direction);
        }
        MatchCommand::Pause => {
            if session.pause() {
                debug!(%match_id, "match paused");
            }
        }
        MatchCommand::Unpause => {
            // The scheduler keeps a single deadline; re-arming is a no-op when
            // a tick from before the pause is still pending.
            if session.unpause() {
                scheduler.arm();
                debug!(%match_id, "match resumed");
            }
        }
        MatchCommand::Disconnect => {
            info!(%match_id, "match disconnected");
            session.terminate();
            return Some(MatchExit::Disconnected);
        }
        MatchCommand::Inspect { reply } => {
            let _ = reply.send(session.state().clone());
        }
    }
    None
}
