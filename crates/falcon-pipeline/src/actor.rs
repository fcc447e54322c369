//! Actor wrapper for multi-threaded hosts
//!
//! One tokio task owns the [`PipelineController`] and is the only code that
//! mutates it. Callers hold a cloneable [`PipelineHandle`]; commands travel
//! over an `mpsc` channel and answers come back on `oneshot` channels. The
//! task ticks the controller on a fixed interval and broadcasts every
//! [`PipelineEvent`] it produces.

use crate::controller::PipelineController;
use crate::error::PipelineError;
use crate::notification::Notification;
use crate::session::Session;
use crate::types::{PipelineEvent, PipelineMode, PipelineSnapshot};
use std::time::Duration;
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

const COMMAND_BUFFER: usize = 32;
const EVENT_BUFFER: usize = 256;

type Reply<T> = oneshot::Sender<T>;

/// Messages sent to the pipeline actor
#[derive(Debug)]
pub enum PipelineCommand {
    /// Start or restart the engines
    StartEngines(Reply<Result<Vec<PipelineEvent>, PipelineError>>),
    /// Start the active stage's countdown
    TriggerStage(Reply<Result<Vec<PipelineEvent>, PipelineError>>),
    /// Switch mode
    SetMode(PipelineMode, Reply<Option<PipelineEvent>>),
    /// Read the current state
    Snapshot(Reply<PipelineSnapshot>),
    /// Read notifications, newest first
    Notifications(Reply<Vec<Notification>>),
    /// Read archived sessions, most recent first
    Sessions(Reply<Vec<Session>>),
    /// Flag every notification read
    MarkAllRead,
    /// Stop the actor and hand the controller back
    Shutdown,
}

/// Cloneable handle to a running pipeline actor
#[derive(Debug, Clone)]
pub struct PipelineHandle {
    sender: mpsc::Sender<PipelineCommand>,
    events: broadcast::Sender<PipelineEvent>,
}

impl PipelineHandle {
    /// Subscribe to pipeline events produced from now on
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<PipelineEvent> {
        self.events.subscribe()
    }

    /// Start or restart the engines
    pub async fn start_engines(&self) -> Result<Vec<PipelineEvent>, PipelineError> {
        self.request(PipelineCommand::StartEngines).await?
    }

    /// Start the active stage's countdown
    pub async fn trigger_stage(&self) -> Result<Vec<PipelineEvent>, PipelineError> {
        self.request(PipelineCommand::TriggerStage).await?
    }

    /// Switch mode
    pub async fn set_mode(&self, mode: PipelineMode) -> Result<Option<PipelineEvent>, PipelineError> {
        self.request(|reply| PipelineCommand::SetMode(mode, reply)).await
    }

    /// Current state
    pub async fn snapshot(&self) -> Result<PipelineSnapshot, PipelineError> {
        self.request(PipelineCommand::Snapshot).await
    }

    /// Notifications, newest first
    pub async fn notifications(&self) -> Result<Vec<Notification>, PipelineError> {
        self.request(PipelineCommand::Notifications).await
    }

    /// Archived sessions, most recent first
    pub async fn sessions(&self) -> Result<Vec<Session>, PipelineError> {
        self.request(PipelineCommand::Sessions).await
    }

    /// Flag every notification read
    pub async fn mark_all_read(&self) -> Result<(), PipelineError> {
        self.send(PipelineCommand::MarkAllRead).await
    }

    /// Ask the actor to stop
    pub async fn shutdown(&self) -> Result<(), PipelineError> {
        self.send(PipelineCommand::Shutdown).await
    }

    async fn send(&self, command: PipelineCommand) -> Result<(), PipelineError> {
        self.sender
            .send(command)
            .await
            .map_err(|_| PipelineError::ActorClosed)
    }

    async fn request<T>(
        &self,
        command: impl FnOnce(Reply<T>) -> PipelineCommand,
    ) -> Result<T, PipelineError> {
        let (tx, rx) = oneshot::channel();
        self.send(command(tx)).await?;
        rx.await.map_err(|_| PipelineError::ActorClosed)
    }
}

/// Task that owns a controller
#[derive(Debug)]
pub struct PipelineActor {
    controller: PipelineController,
    commands: mpsc::Receiver<PipelineCommand>,
    events: broadcast::Sender<PipelineEvent>,
    tick_interval: Duration,
}

impl PipelineActor {
    /// Spawn the actor on the current tokio runtime.
    ///
    /// The join handle resolves to the controller once the actor stops
    /// (shutdown command, or every handle dropped).
    ///
    /// # Errors
    /// - `PipelineError::InvalidConfig` if the controller's configuration
    ///   fails validation (e.g. a zero tick interval)
    pub fn spawn(
        controller: PipelineController,
    ) -> Result<(PipelineHandle, JoinHandle<PipelineController>), PipelineError> {
        controller.config().validate()?;
        let (sender, commands) = mpsc::channel(COMMAND_BUFFER);
        let (events, _) = broadcast::channel(EVENT_BUFFER);
        let tick_interval = controller.config().tick_interval();

        let actor = Self {
            controller,
            commands,
            events: events.clone(),
            tick_interval,
        };
        let join = tokio::spawn(actor.run());
        Ok((PipelineHandle { sender, events }, join))
    }

    async fn run(mut self) -> PipelineController {
        let mut ticker = tokio::time::interval(self.tick_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tracing::debug!(interval = ?self.tick_interval, "pipeline actor running");

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let events = self.controller.tick();
                    self.publish(events);
                }
                command = self.commands.recv() => {
                    match command {
                        None | Some(PipelineCommand::Shutdown) => break,
                        Some(command) => self.handle(command),
                    }
                }
            }
        }

        tracing::debug!("pipeline actor stopped");
        self.controller
    }

    fn handle(&mut self, command: PipelineCommand) {
        match command {
            PipelineCommand::StartEngines(reply) => {
                let result = self.controller.start_engines();
                if let Ok(events) = &result {
                    self.publish(events.clone());
                }
                let _ = reply.send(result);
            }
            PipelineCommand::TriggerStage(reply) => {
                let result = self.controller.trigger_stage();
                if let Ok(events) = &result {
                    self.publish(events.clone());
                }
                let _ = reply.send(result);
            }
            PipelineCommand::SetMode(mode, reply) => {
                let event = self.controller.set_mode(mode);
                if let Some(event) = &event {
                    self.publish(vec![event.clone()]);
                }
                let _ = reply.send(event);
            }
            PipelineCommand::Snapshot(reply) => {
                let _ = reply.send(self.controller.snapshot());
            }
            PipelineCommand::Notifications(reply) => {
                let _ = reply.send(self.controller.notifications().to_vec());
            }
            PipelineCommand::Sessions(reply) => {
                let _ = reply.send(self.controller.sessions().to_vec());
            }
            PipelineCommand::MarkAllRead => self.controller.notifications_mut().mark_all_read(),
            PipelineCommand::Shutdown => {}
        }
    }

    fn publish(&self, events: Vec<PipelineEvent>) {
        for event in events {
            // no subscribers is fine
            let _ = self.events.send(event);
        }
    }
}
