// Match registry: creates match tasks and routes commands to them by id.

use crate::domain::{
    CanvasSize, Direction, LaunchRandom, MatchError, MatchId, MatchMode, MatchState,
    MatchVariant, Side,
};
use crate::use_cases::game::match_task;
use crate::use_cases::session::MatchSession;
use crate::use_cases::{EventSink, MatchCommand, MatchEvent};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::{RwLock, mpsc, oneshot};
use tracing::{debug, error, info};

/// Shared configuration for spawning matches.
#[derive(Debug, Clone)]
pub struct MatchSettings {
    /// Capacity for inbound commands per match.
    pub command_channel_capacity: usize,
    /// Capacity of the outbound event queue handed to each match.
    pub event_channel_capacity: usize,
    /// Fixed tick interval for every match loop.
    pub tick_interval: Duration,
    /// Base seed for launch randomness; `None` draws from OS entropy.
    pub rng_seed: Option<u64>,
}

/// Cloneable command endpoint for one match.
#[derive(Debug, Clone)]
pub struct MatchHandle {
    pub match_id: MatchId,
    command_tx: mpsc::Sender<MatchCommand>,
}

impl MatchHandle {
    pub async fn send(&self, command: MatchCommand) -> Result<(), MatchError> {
        self.command_tx
            .send(command)
            .await
            .map_err(|_| MatchError::MatchClosed)
    }

    pub async fn start(&self, canvas: CanvasSize, mode: MatchMode) -> Result<(), MatchError> {
        self.send(MatchCommand::Start { canvas, mode }).await
    }

    pub async fn move_paddle(&self, side: Side, direction: Direction) -> Result<(), MatchError> {
        self.send(MatchCommand::Move { side, direction }).await
    }

    pub async fn pause(&self) -> Result<(), MatchError> {
        self.send(MatchCommand::Pause).await
    }

    pub async fn unpause(&self) -> Result<(), MatchError> {
        self.send(MatchCommand::Unpause).await
    }

    pub async fn disconnect(&self) -> Result<(), MatchError> {
        self.send(MatchCommand::Disconnect).await
    }

    /// Fetches a copy of the match state from its owning task.
    pub async fn inspect(&self) -> Result<MatchState, MatchError> {
        let (reply, rx) = oneshot::channel();
        self.send(MatchCommand::Inspect { reply }).await?;
        rx.await.map_err(|_| MatchError::MatchClosed)
    }
}

/// Thread-safe registry of live matches.
#[derive(Debug)]
pub struct MatchRegistry {
    /// Settings applied to newly created matches.
    settings: MatchSettings,
    /// Map of match id to command handle.
    matches: RwLock<HashMap<MatchId, MatchHandle>>,
    /// Offsets the base seed so seeded matches do not share launches.
    seed_counter: AtomicU64,
}

impl MatchRegistry {
    pub fn new(settings: MatchSettings) -> Self {
        Self {
            settings,
            matches: RwLock::new(HashMap::new()),
            seed_counter: AtomicU64::new(0),
        }
    }

    pub fn settings(&self) -> &MatchSettings {
        &self.settings
    }

    /// Creates a match, announces it on `events` and spawns its task.
    pub async fn create<S: EventSink>(
        self: &Arc<Self>,
        variant: MatchVariant,
        events: S,
    ) -> Result<MatchHandle, MatchError> {
        let random = self.launch_random();
        self.create_with_random(variant, events, random).await
    }

    /// Like [`MatchRegistry::create`] with an explicit launch random source.
    pub async fn create_with_random<S: EventSink>(
        self: &Arc<Self>,
        variant: MatchVariant,
        events: S,
        random: Box<dyn LaunchRandom>,
    ) -> Result<MatchHandle, MatchError> {
        let match_id = MatchId::new();
        events.deliver(MatchEvent::Info { match_id })?;

        let (command_tx, command_rx) = mpsc::channel(self.settings.command_channel_capacity);
        let handle = MatchHandle {
            match_id,
            command_tx,
        };
        let session = MatchSession::new(match_id, variant, random);

        // Insert before spawning so the task's removal can never precede it.
        self.matches.write().await.insert(match_id, handle.clone());

        let registry = Arc::clone(self);
        let tick_interval = self.settings.tick_interval;
        tokio::spawn(async move {
            let task = tokio::spawn(match_task(session, command_rx, events, tick_interval));
            match task.await {
                Ok(exit) => info!(%match_id, ?exit, "match task exited"),
                Err(e) => error!(%match_id, error = %e, "match task failed"),
            }
            registry.remove(&match_id).await;
        });

        info!(%match_id, ?variant, "match created");
        Ok(handle)
    }

    pub async fn get(&self, match_id: &MatchId) -> Result<MatchHandle, MatchError> {
        let matches = self.matches.read().await;
        matches
            .get(match_id)
            .cloned()
            .ok_or(MatchError::MatchNotFound)
    }

    /// Drops the registry entry; returns false if it was already gone.
    pub async fn remove(&self, match_id: &MatchId) -> bool {
        let removed = self.matches.write().await.remove(match_id).is_some();
        if removed {
            debug!(%match_id, "match removed from registry");
        }
        removed
    }

    pub async fn len(&self) -> usize {
        self.matches.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    fn launch_random(&self) -> Box<dyn LaunchRandom> {
        match self.settings.rng_seed {
            Some(seed) => {
                let offset = self.seed_counter.fetch_add(1, Ordering::Relaxed);
                Box::new(StdRng::seed_from_u64(seed.wrapping_add(offset)))
            }
            None => Box::new(StdRng::from_entropy()),
        }
    }
}
