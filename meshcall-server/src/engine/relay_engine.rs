use crate::engine::EngineCommand;
use crate::relay::{Delivery, NegotiationRelay};
use crate::signaling::SignalingOutput;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info};

pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Single owner of the relay state. Every command is applied in arrival
/// order, so membership reads never observe a half-applied join.
pub struct RelayEngine {
    relay: NegotiationRelay,
    command_rx: mpsc::Receiver<EngineCommand>,
    signaling: Arc<dyn SignalingOutput>,
    sweep_interval: Duration,
}

impl RelayEngine {
    pub fn new(
        relay: NegotiationRelay,
        command_rx: mpsc::Receiver<EngineCommand>,
        signaling: Arc<dyn SignalingOutput>,
    ) -> Self {
        Self {
            relay,
            command_rx,
            signaling,
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
        }
    }

    pub fn with_sweep_interval(mut self, sweep_interval: Duration) -> Self {
        self.sweep_interval = sweep_interval;
        self
    }

    pub async fn run(mut self) {
        info!("Relay engine started");

        let mut sweep = tokio::time::interval(self.sweep_interval);
        sweep.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                cmd = self.command_rx.recv() => {
                    match cmd {
                        Some(c) => self.handle_command(c).await,
                        None => {
                            info!("Command channel closed. Shutting down relay engine.");
                            break;
                        }
                    }
                }

                _ = sweep.tick() => {
                    let purged = self.relay.sweep_expired(Instant::now());
                    if purged > 0 {
                        debug!("Purged {} expired delegated secrets", purged);
                    }
                }
            }
        }

        info!("Relay engine finished");
    }

    async fn handle_command(&mut self, cmd: EngineCommand) {
        match cmd {
            EngineCommand::Inbound { endpoint, message } => {
                let outcome = self.relay.handle(&endpoint, message, Instant::now()).await;
                self.dispatch(outcome.deliveries()).await;
            }

            EngineCommand::Disconnect { endpoint } => {
                info!("Unwinding endpoint {}", endpoint);
                let deliveries = self.relay.disconnect(&endpoint);
                self.dispatch(deliveries).await;
            }

            EngineCommand::Members { room_id, reply } => {
                let _ = reply.send(self.relay.registry().members_of(&room_id));
            }
        }
    }

    async fn dispatch(&self, deliveries: Vec<Delivery>) {
        for Delivery { to, event } in deliveries {
            self.signaling.deliver(to, event).await;
        }
    }
}
