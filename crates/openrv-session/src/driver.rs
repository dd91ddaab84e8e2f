//! Cooperative scheduler that owns a [`Session`] on one thread.
//!
//! All mutations arrive as [`SessionEvent`]s on a single crossbeam channel
//! and are applied in arrival order. A periodic tick, interleaved on the
//! same loop, fires due debounce timers and advances playback. Nothing else
//! touches the session, so no locking is needed around its state.

use crossbeam_channel::{select, tick, unbounded, Receiver, Sender};
use openrv_core::{Result, RvError};
use std::thread;
use tracing::{debug, info, warn};

use crate::event::SessionEvent;
use crate::session::Session;

/// Handle for feeding events to a running driver. Cheap to clone.
#[derive(Debug, Clone)]
pub struct EventSender {
    tx: Sender<SessionEvent>,
}

impl EventSender {
    /// Queue an event. Fails once the driver has shut down.
    pub fn send(&self, event: SessionEvent) -> Result<()> {
        self.tx.send(event).map_err(|_| RvError::SessionClosed)
    }

    /// Ask the driver loop to stop after the events already queued.
    pub fn shutdown(&self) -> Result<()> {
        self.send(SessionEvent::Shutdown)
    }
}

/// Event loop around a session.
#[derive(Debug)]
pub struct SessionDriver {
    session: Session,
    events: Receiver<SessionEvent>,
}

impl SessionDriver {
    pub fn new(session: Session) -> (Self, EventSender) {
        let (tx, events) = unbounded();
        (Self { session, events }, EventSender { tx })
    }

    /// Run on a dedicated thread. Joining the handle returns the session
    /// after shutdown.
    pub fn spawn(session: Session) -> Result<(EventSender, thread::JoinHandle<Session>)> {
        let (driver, sender) = Self::new(session);
        let handle = thread::Builder::new()
            .name("openrv-session".to_string())
            .spawn(move || driver.run())?;
        Ok((sender, handle))
    }

    /// Process events and ticks until `Shutdown` arrives or every sender is
    /// dropped, then hand the session back.
    pub fn run(mut self) -> Session {
        let ticker = tick(self.session.config().tick_interval());
        info!("Session driver started");

        loop {
            select! {
                recv(self.events) -> msg => match msg {
                    Ok(SessionEvent::Shutdown) | Err(_) => break,
                    Ok(event) => self.dispatch(event),
                },
                recv(ticker) -> _ => {
                    self.session.tick();
                }
            }
        }

        // Anything still queued behind Shutdown is dropped.
        let dropped = self.events.try_iter().count();
        if dropped > 0 {
            debug!(dropped, "Events discarded at shutdown");
        }
        info!("Session driver stopped");
        self.session
    }

    fn dispatch(&mut self, event: SessionEvent) {
        if let Err(err) = self.session.handle(event) {
            warn!(%err, "Event rejected");
        }
    }
}
