//! The navigation menu controller.
//!
//! `MenuController` owns the trigger, panel and body handles and the
//! transient state (animation lock, focus trap members, touch start, resize
//! debouncer). The menu's open/closed state itself lives only in the panel's
//! open marker class.
//!
//! Hosts route events in through [`MenuController::update`] and execute the
//! returned [`Effect`]s. Faults never escape: they are logged, the animation
//! lock is released, and the controller stays usable.

use navmenu_util::{Debouncer, fragment_id};
use tracing::{debug, error, trace, warn};

use crate::config::{MenuConfig, validate_config};
use crate::dom::{Dom, ScrollBehavior};
use crate::error::{DomError, ElementRole, MenuError};
use crate::msg::{Effect, Key, KeyInput, Msg, Timer};
use crate::state::{AnimationLock, FocusableSet, MenuSnapshot, MenuState, TouchTracker};

const ARIA_EXPANDED: &str = "aria-expanded";

pub struct MenuController<D: Dom> {
    dom: D,
    config: MenuConfig,
    trigger: D::Node,
    panel: D::Node,
    body: Option<D::Node>,
    links: Vec<D::Node>,
    lock: AnimationLock,
    focusables: FocusableSet<D::Node>,
    touch: TouchTracker,
    resize: Debouncer,
    document_listeners: bool,
}

impl<D: Dom> MenuController<D> {
    /// Binds to the configured elements.
    ///
    /// Fails with [`MenuError::MissingElement`] when the trigger or panel is
    /// absent; the host should report that and leave the page untouched. A
    /// missing body or an unusable link selector only disables the affected
    /// feature.
    pub fn mount(dom: D, config: MenuConfig) -> Result<Self, MenuError> {
        validate_config(&config)?;
        let selectors = &config.selectors;

        let trigger = dom.element_by_id(&selectors.trigger_id).ok_or_else(|| MenuError::MissingElement {
            role: ElementRole::Trigger,
            id: selectors.trigger_id.clone(),
        })?;
        let panel = dom.element_by_id(&selectors.panel_id).ok_or_else(|| MenuError::MissingElement {
            role: ElementRole::Panel,
            id: selectors.panel_id.clone(),
        })?;

        let body = match dom.query_selector(&selectors.body) {
            Ok(Some(body)) => Some(body),
            Ok(None) => {
                warn!(selector = %selectors.body, "body element not found; scroll locking disabled");
                None
            }
            Err(error) => {
                warn!(selector = %selectors.body, %error, "body lookup failed; scroll locking disabled");
                None
            }
        };

        let links = dom.query_selector_all(&panel, &selectors.links).unwrap_or_else(|error| {
            error!(%error, "failed to collect navigation links; anchor scrolling disabled");
            Vec::new()
        });

        debug!(
            trigger = %dom.describe(&trigger),
            panel = %dom.describe(&panel),
            links = links.len(),
            "navigation menu mounted"
        );

        let resize = Debouncer::new(config.timings.resize_debounce());
        Ok(Self {
            dom,
            config,
            trigger,
            panel,
            body,
            links,
            lock: AnimationLock::default(),
            focusables: FocusableSet::default(),
            touch: TouchTracker::default(),
            resize,
            document_listeners: false,
        })
    }

    pub fn dom(&self) -> &D {
        &self.dom
    }

    pub fn dom_mut(&mut self) -> &mut D {
        &mut self.dom
    }

    pub fn config(&self) -> &MenuConfig {
        &self.config
    }

    pub fn trigger(&self) -> &D::Node {
        &self.trigger
    }

    pub fn panel(&self) -> &D::Node {
        &self.panel
    }

    /// Anchor links found in the panel at mount time.
    pub fn links(&self) -> &[D::Node] {
        &self.links
    }

    pub fn focusables(&self) -> &FocusableSet<D::Node> {
        &self.focusables
    }

    pub fn state(&self) -> MenuState {
        MenuState::from_open(self.is_open())
    }

    pub fn is_open(&self) -> bool {
        self.dom.has_class(&self.panel, &self.config.classes.open)
    }

    pub fn is_locked(&self) -> bool {
        self.lock.is_engaged()
    }

    pub fn document_listeners_attached(&self) -> bool {
        self.document_listeners
    }

    /// Routes one host event.
    pub fn update(&mut self, msg: Msg<D::Node>) -> Vec<Effect> {
        trace!(?msg, "menu message");
        match msg {
            Msg::TriggerClicked => self.toggle_menu(),
            Msg::TriggerKeyDown(key) => self.handle_trigger_key(&key),
            Msg::LinkActivated { link } => self.handle_link(&link),
            Msg::DocumentKeyDown(key) => self.handle_document_key(&key),
            Msg::DocumentClicked { target } => self.handle_document_click(&target),
            Msg::TouchStarted { y } => {
                self.touch.start(y);
                Vec::new()
            }
            Msg::TouchMoved { y } => self.handle_touch_move(y),
            Msg::TouchEnded => {
                self.touch.reset();
                Vec::new()
            }
            Msg::Resized => self.handle_resize(),
            Msg::LogoClicked => self.toggle_logo(),
            Msg::TimerElapsed(timer) => self.handle_timer(timer),
        }
    }

    /// Opens or closes the menu from the trigger.
    ///
    /// No-op while the animation lock is engaged. On success the lock stays
    /// engaged until the returned [`Timer::AnimationLock`] fires; on failure
    /// it is released immediately.
    pub fn toggle_menu(&mut self) -> Vec<Effect> {
        if !self.lock.try_engage() {
            debug!("toggle ignored while the menu transition is running");
            return Vec::new();
        }

        let mut effects = Vec::new();
        match self.toggle_transition(&mut effects) {
            Ok(state) => {
                debug!(%state, "menu toggled");
                effects.push(Effect::Schedule {
                    delay: self.config.timings.transition(),
                    timer: Timer::AnimationLock,
                });
            }
            Err(error) => {
                self.lock.release();
                error!(%error, "error toggling menu");
            }
        }
        effects
    }

    /// Closes the menu if it is open. Every dismissal path ends here.
    pub fn close_menu(&mut self) -> Vec<Effect> {
        if !self.is_open() {
            return Vec::new();
        }

        let mut effects = Vec::new();
        let closed = self.apply_menu_state(false).and_then(|()| self.on_close(&mut effects));
        match closed {
            Ok(()) => debug!("menu closed"),
            Err(error) => error!(%error, "error closing menu"),
        }
        effects
    }

    /// Logo/brand toggle: flips the markers without the animation lock, focus
    /// management or document listeners.
    pub fn toggle_logo(&mut self) -> Vec<Effect> {
        let open = !self.is_open();
        match self.apply_menu_state(open) {
            Ok(()) => debug!(state = %MenuState::from_open(open), "menu toggled from logo"),
            Err(error) => error!(%error, "error toggling menu from logo"),
        }
        Vec::new()
    }

    /// Enter and Space on the trigger act like a click.
    pub fn handle_trigger_key(&mut self, key: &KeyInput) -> Vec<Effect> {
        match key.key {
            Key::Enter | Key::Space => {
                let mut effects = vec![Effect::PreventDefault];
                effects.extend(self.toggle_menu());
                effects
            }
            _ => Vec::new(),
        }
    }

    /// Escape closes; Tab and Shift+Tab wrap around the focus trap.
    pub fn handle_document_key(&mut self, key: &KeyInput) -> Vec<Effect> {
        if let Some(effects) = self.drop_stale_listeners() {
            return effects;
        }
        match key.key {
            Key::Escape => self.close_menu(),
            Key::Tab => self.trap_tab(key.shift),
            _ => Vec::new(),
        }
    }

    /// Closes when the click landed outside both the panel and the trigger.
    pub fn handle_document_click(&mut self, target: &D::Node) -> Vec<Effect> {
        if let Some(effects) = self.drop_stale_listeners() {
            return effects;
        }
        let inside = self.dom.contains(&self.panel, target) || self.dom.contains(&self.trigger, target);
        if inside {
            return Vec::new();
        }
        debug!(target = %self.dom.describe(target), "click outside the menu");
        self.close_menu()
    }

    /// Suppresses navigation, closes the menu and scrolls to the link's
    /// fragment target when it exists.
    pub fn handle_link(&mut self, link: &D::Node) -> Vec<Effect> {
        let mut effects = vec![Effect::PreventDefault];
        let fragment = self.dom.attribute(link, "href").as_deref().and_then(fragment_id);
        effects.extend(self.close_menu());

        let Some(id) = fragment else {
            debug!(link = %self.dom.describe(link), "link has no fragment; nothing to scroll to");
            return effects;
        };
        let Some(section) = self.dom.element_by_id(&id) else {
            debug!(%id, "no element for link fragment; skipping scroll");
            return effects;
        };
        if let Err(error) = self.dom.scroll_into_view(&section, ScrollBehavior::Smooth) {
            warn!(%id, %error, "failed to scroll section into view");
        }
        effects
    }

    /// Closes on a downward swipe longer than the swipe threshold.
    pub fn handle_touch_move(&mut self, y: f64) -> Vec<Effect> {
        if !self.is_open() {
            return Vec::new();
        }
        match self.touch.delta(y) {
            Some(delta) if delta > self.config.thresholds.swipe_px => {
                debug!(delta, "swipe down dismissed the menu");
                self.close_menu()
            }
            _ => Vec::new(),
        }
    }

    /// Restarts the resize settle timer.
    pub fn handle_resize(&mut self) -> Vec<Effect> {
        let ticket = self.resize.reschedule();
        vec![Effect::Schedule {
            delay: self.resize.delay(),
            timer: Timer::ResizeSettled(ticket),
        }]
    }

    pub fn handle_timer(&mut self, timer: Timer) -> Vec<Effect> {
        match timer {
            Timer::AnimationLock => {
                self.lock.release();
                Vec::new()
            }
            Timer::ResizeSettled(ticket) => {
                if !self.resize.fire(ticket) {
                    return Vec::new();
                }
                let width = self.dom.viewport_width();
                if width > self.config.thresholds.breakpoint_px {
                    debug!(width, "viewport wider than the menu breakpoint");
                    return self.close_menu();
                }
                Vec::new()
            }
        }
    }

    pub fn snapshot(&self) -> MenuSnapshot {
        let focused = self.dom.active_element().map(|node| self.dom.describe(&node));
        MenuSnapshot {
            state: self.state(),
            locked: self.lock.is_engaged(),
            aria_expanded: self.dom.attribute(&self.trigger, ARIA_EXPANDED),
            trigger_active: self.dom.has_class(&self.trigger, &self.config.classes.active),
            body_no_scroll: self
                .body
                .as_ref()
                .is_some_and(|body| self.dom.has_class(body, &self.config.classes.no_scroll)),
            document_listeners: self.document_listeners,
            focusable_count: self.focusables.len(),
            focused,
        }
    }

    fn toggle_transition(&mut self, effects: &mut Vec<Effect>) -> Result<MenuState, DomError> {
        let open = !self.is_open();
        self.apply_menu_state(open)?;
        if open {
            self.on_open(effects)?;
        } else {
            self.on_close(effects)?;
        }
        Ok(MenuState::from_open(open))
    }

    /// Writes the open marker, active marker, `aria-expanded` and the body
    /// no-scroll marker for `open`. Shared by the trigger and logo paths.
    fn apply_menu_state(&mut self, open: bool) -> Result<(), DomError> {
        let classes = &self.config.classes;
        self.dom.toggle_class(&self.panel, &classes.open, Some(open))?;
        self.dom.toggle_class(&self.trigger, &classes.active, Some(open))?;
        self.dom
            .set_attribute(&self.trigger, ARIA_EXPANDED, if open { "true" } else { "false" })?;
        self.set_body_no_scroll(open)
    }

    fn set_body_no_scroll(&mut self, enabled: bool) -> Result<(), DomError> {
        if let Some(body) = &self.body {
            self.dom.toggle_class(body, &self.config.classes.no_scroll, Some(enabled))?;
        }
        Ok(())
    }

    fn on_open(&mut self, effects: &mut Vec<Effect>) -> Result<(), DomError> {
        let nodes = self
            .dom
            .query_selector_all(&self.panel, &self.config.selectors.focusable)
            .unwrap_or_else(|error| {
                warn!(%error, "failed to collect focusable elements; focus trap disabled");
                Vec::new()
            });
        self.focusables = FocusableSet::new(nodes);
        self.attach_document_listeners(effects);

        if let Some(first) = self.focusables.first() {
            self.dom.focus(first)?;
        }
        Ok(())
    }

    fn on_close(&mut self, effects: &mut Vec<Effect>) -> Result<(), DomError> {
        self.detach_document_listeners(effects);
        self.focusables.clear();
        self.touch.reset();
        self.set_body_no_scroll(false)?;
        self.dom.focus(&self.trigger)
    }

    fn trap_tab(&mut self, backwards: bool) -> Vec<Effect> {
        let Some((first, last)) = self.focusables.bounds() else {
            return vec![Effect::PreventDefault];
        };
        let active = self.dom.active_element();
        let (edge, wrap_to) = if backwards { (first, last) } else { (last, first) };
        if active.as_ref() != Some(&edge) {
            return Vec::new();
        }
        match self.dom.focus(&wrap_to) {
            Ok(()) => vec![Effect::PreventDefault],
            Err(error) => {
                warn!(%error, "failed to wrap focus inside the menu");
                Vec::new()
            }
        }
    }

    fn attach_document_listeners(&mut self, effects: &mut Vec<Effect>) {
        if !self.document_listeners {
            self.document_listeners = true;
            effects.push(Effect::AttachDocumentListeners);
        }
    }

    fn detach_document_listeners(&mut self, effects: &mut Vec<Effect>) {
        if self.document_listeners {
            self.document_listeners = false;
            effects.push(Effect::DetachDocumentListeners);
        }
    }

    /// Document listeners that outlived the open menu (the logo path can
    /// close it without cleanup) are detached instead of acting.
    fn drop_stale_listeners(&mut self) -> Option<Vec<Effect>> {
        if !self.document_listeners {
            return Some(Vec::new());
        }
        if self.is_open() {
            return None;
        }
        let mut effects = Vec::new();
        self.detach_document_listeners(&mut effects);
        self.focusables.clear();
        Some(effects)
    }
}
