//! Native host: drives a [`MenuController`] on a Tokio runtime.
//!
//! The runtime plays the part of the browser event loop. It executes the
//! controller's effects: `Schedule` spawns a sleeping task that reports the
//! timer back over a channel, attach/detach gates which document events are
//! delivered, and `PreventDefault` is surfaced to the caller through
//! [`Dispatch`]. Timers fire only when the caller awaits them via
//! [`MenuRuntime::next_timer`] or [`MenuRuntime::settle`], so every handler
//! runs to completion before the next one starts.
//!
//! Must be used from within a Tokio runtime.

use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{error, trace};

use crate::config::MenuConfig;
use crate::controller::MenuController;
use crate::dom::Dom;
use crate::error::MenuError;
use crate::msg::{Effect, Msg, Timer};

/// Outcome of dispatching one event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Dispatch {
    /// The controller asked for the event's default action to be cancelled.
    pub default_prevented: bool,
    /// The event was not delivered because no listener was registered for it.
    pub dropped: bool,
}

pub struct MenuRuntime<D: Dom> {
    controller: MenuController<D>,
    timer_sender: mpsc::UnboundedSender<Timer>,
    timer_receiver: mpsc::UnboundedReceiver<Timer>,
    outstanding_timers: usize,
    document_listeners: bool,
}

impl<D: Dom> MenuRuntime<D> {
    /// Mounts a controller on `dom`, reporting a failed mount before handing
    /// the error back.
    pub fn mount(dom: D, config: MenuConfig) -> Result<Self, MenuError> {
        match MenuController::mount(dom, config) {
            Ok(controller) => Ok(Self::new(controller)),
            Err(error) => {
                error!(%error, "navigation menu not initialized");
                Err(error)
            }
        }
    }

    pub fn new(controller: MenuController<D>) -> Self {
        let (timer_sender, timer_receiver) = mpsc::unbounded_channel();
        Self {
            controller,
            timer_sender,
            timer_receiver,
            outstanding_timers: 0,
            document_listeners: false,
        }
    }

    pub fn controller(&self) -> &MenuController<D> {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut MenuController<D> {
        &mut self.controller
    }

    /// Whether document-level keydown/click events are currently delivered.
    pub fn document_listeners_attached(&self) -> bool {
        self.document_listeners
    }

    /// Timers scheduled but not yet delivered.
    pub fn pending_timers(&self) -> usize {
        self.outstanding_timers
    }

    /// Delivers one event to the controller and executes its effects.
    pub fn dispatch(&mut self, msg: Msg<D::Node>) -> Dispatch {
        let document_event = matches!(msg, Msg::DocumentKeyDown(_) | Msg::DocumentClicked { .. });
        if document_event && !self.document_listeners {
            trace!("no document listener registered; event dropped");
            return Dispatch {
                dropped: true,
                ..Dispatch::default()
            };
        }
        let effects = self.controller.update(msg);
        self.apply(effects)
    }

    /// Waits for the next scheduled timer and delivers it. Returns `None`
    /// when nothing is scheduled.
    pub async fn next_timer(&mut self) -> Option<Dispatch> {
        if self.outstanding_timers == 0 {
            return None;
        }
        let timer = self.timer_receiver.recv().await?;
        self.outstanding_timers -= 1;
        Some(self.dispatch(Msg::TimerElapsed(timer)))
    }

    /// Delivers timers until none are left.
    pub async fn settle(&mut self) {
        while self.next_timer().await.is_some() {}
    }

    fn apply(&mut self, effects: Vec<Effect>) -> Dispatch {
        let mut dispatch = Dispatch::default();
        for effect in effects {
            match effect {
                Effect::PreventDefault => dispatch.default_prevented = true,
                Effect::Schedule { delay, timer } => self.schedule(delay, timer),
                Effect::AttachDocumentListeners => self.document_listeners = true,
                Effect::DetachDocumentListeners => self.document_listeners = false,
            }
        }
        dispatch
    }

    fn schedule(&mut self, delay: Duration, timer: Timer) {
        self.outstanding_timers += 1;
        let sender = self.timer_sender.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if sender.send(timer).is_err() {
                trace!(?timer, "menu runtime dropped before timer fired");
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use tokio::time::Instant;

    use super::*;
    use crate::dom::{ElementSpec, MemoryDom, PageSpec};
    use crate::msg::KeyInput;

    fn runtime() -> MenuRuntime<MemoryDom> {
        let page = PageSpec::default()
            .child(ElementSpec::new("button").id("hamburger"))
            .child(ElementSpec::new("nav").id("nav-links").child(ElementSpec::link("#a")).child(ElementSpec::link("#b")));
        MenuRuntime::mount(MemoryDom::from_page(&page), MenuConfig::default()).unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_lock_released_after_transition() {
        let mut runtime = runtime();
        let started = Instant::now();

        runtime.dispatch(Msg::TriggerClicked);
        runtime.dispatch(Msg::TriggerClicked);
        assert!(runtime.controller().is_open());
        assert_eq!(runtime.pending_timers(), 1);

        runtime.next_timer().await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(300));
        assert!(!runtime.controller().is_locked());
        assert!(runtime.next_timer().await.is_none());

        runtime.dispatch(Msg::TriggerClicked);
        assert!(!runtime.controller().is_open());
    }

    #[tokio::test(start_paused = true)]
    async fn test_document_events_follow_listener_effects() {
        let mut runtime = runtime();
        let body = runtime.controller().dom().body();

        let dispatch = runtime.dispatch(Msg::DocumentKeyDown(KeyInput::escape()));
        assert!(dispatch.dropped);

        runtime.dispatch(Msg::TriggerClicked);
        assert!(runtime.document_listeners_attached());

        let dispatch = runtime.dispatch(Msg::DocumentClicked { target: body });
        assert!(!dispatch.dropped);
        assert!(!runtime.controller().is_open());
        assert!(!runtime.document_listeners_attached());
    }

    #[tokio::test(start_paused = true)]
    async fn test_resize_debounce_is_last_write_wins() {
        let mut runtime = runtime();
        runtime.dispatch(Msg::TriggerClicked);
        runtime.settle().await;
        runtime.controller_mut().dom_mut().set_viewport_width(1200.0);

        runtime.dispatch(Msg::Resized);
        tokio::time::advance(Duration::from_millis(100)).await;
        runtime.dispatch(Msg::Resized);
        tokio::time::advance(Duration::from_millis(100)).await;
        let last = Instant::now();
        runtime.dispatch(Msg::Resized);

        runtime.next_timer().await.unwrap();
        runtime.next_timer().await.unwrap();
        assert!(runtime.controller().is_open());

        runtime.next_timer().await.unwrap();
        assert!(last.elapsed() >= Duration::from_millis(150));
        assert!(!runtime.controller().is_open());
    }
}
