//! Browser event wiring for a mounted [`MenuController`].
//!
//! Every listener closure holds a `Weak` handle to the shared state, so
//! dropping [`WebMenu`] tears the whole menu down. The controller borrow is
//! released before effects run; effects may register or drop listeners.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use gloo::events::{EventListener, EventListenerOptions, EventListenerPhase};
use gloo::timers::callback::Timeout;
use navmenu::{Dom, Effect, Key, KeyInput, MenuConfig, MenuController, MenuError, Msg};
use tracing::{debug, warn};
use wasm_bindgen::JsCast;
use web_sys::{Element, Event, EventTarget, KeyboardEvent, TouchEvent};

use crate::dom::WebDom;

struct Shared {
    controller: RefCell<MenuController<WebDom>>,
    listeners: RefCell<Vec<EventListener>>,
    document_listeners: RefCell<Vec<EventListener>>,
}

/// A menu wired to the page. Dropping it removes every listener.
pub struct WebMenu {
    shared: Rc<Shared>,
}

impl WebMenu {
    /// Resolves the menu elements and registers the always-on listeners:
    /// trigger click/keydown, panel links, panel touch, window resize and the
    /// optional logo.
    pub fn mount(config: MenuConfig) -> Result<Self, MenuError> {
        let dom = WebDom::from_global()?;
        let window = dom.window().clone();
        let controller = MenuController::mount(dom, config)?;

        let trigger = controller.trigger().clone();
        let panel = controller.panel().clone();
        let links = controller.links().to_vec();
        let logo = controller
            .config()
            .selectors
            .logo_id
            .as_deref()
            .and_then(|id| controller.dom().element_by_id(id));

        let shared = Rc::new(Shared {
            controller: RefCell::new(controller),
            listeners: RefCell::new(Vec::new()),
            document_listeners: RefCell::new(Vec::new()),
        });
        let weak = Rc::downgrade(&shared);
        let mut listeners = Vec::new();

        listeners.push(listen(&trigger, "click", &weak, |_| Some(Msg::TriggerClicked)));
        listeners.push(listen(&trigger, "keydown", &weak, |event| {
            key_input(event).map(Msg::TriggerKeyDown)
        }));
        for link in links {
            let target = link.clone();
            listeners.push(listen(&target, "click", &weak, move |_| {
                Some(Msg::LinkActivated { link: link.clone() })
            }));
        }
        listeners.push(listen(&panel, "touchstart", &weak, |event| {
            touch_y(event).map(|y| Msg::TouchStarted { y })
        }));
        listeners.push(listen(&panel, "touchmove", &weak, |event| {
            touch_y(event).map(|y| Msg::TouchMoved { y })
        }));
        listeners.push(listen(&panel, "touchend", &weak, |_| Some(Msg::TouchEnded)));
        listeners.push(listen(&panel, "touchcancel", &weak, |_| Some(Msg::TouchEnded)));
        listeners.push(listen(&window, "resize", &weak, |_| Some(Msg::Resized)));
        if let Some(logo) = logo {
            listeners.push(listen(&logo, "click", &weak, |_| Some(Msg::LogoClicked)));
        }

        debug!(count = listeners.len(), "navigation menu listeners registered");
        *shared.listeners.borrow_mut() = listeners;
        Ok(Self { shared })
    }

    /// Logo-style toggle for pages that call it from their own handlers.
    pub fn toggle_logo(&self) {
        dispatch(&self.shared, Msg::LogoClicked, None);
    }
}

fn listen<F>(target: &EventTarget, event_type: &'static str, shared: &Weak<Shared>, to_msg: F) -> EventListener
where
    F: Fn(&Event) -> Option<Msg<Element>> + 'static,
{
    let shared = shared.clone();
    let options = EventListenerOptions {
        phase: EventListenerPhase::Bubble,
        passive: false,
    };
    EventListener::new_with_options(target, event_type, options, move |event: &Event| {
        let Some(shared) = shared.upgrade() else {
            return;
        };
        if let Some(msg) = to_msg(event) {
            dispatch(&shared, msg, Some(event));
        }
    })
}

fn dispatch(shared: &Rc<Shared>, msg: Msg<Element>, event: Option<&Event>) {
    let effects = match shared.controller.try_borrow_mut() {
        Ok(mut controller) => controller.update(msg),
        Err(_) => {
            warn!(?msg, "menu event arrived while another was being handled; ignored");
            return;
        }
    };
    for effect in effects {
        match effect {
            Effect::PreventDefault => {
                if let Some(event) = event {
                    event.prevent_default();
                }
            }
            Effect::Schedule { delay, timer } => {
                let weak = Rc::downgrade(shared);
                let millis = u32::try_from(delay.as_millis()).unwrap_or(u32::MAX);
                Timeout::new(millis, move || {
                    if let Some(shared) = weak.upgrade() {
                        dispatch(&shared, Msg::TimerElapsed(timer), None);
                    }
                })
                .forget();
            }
            Effect::AttachDocumentListeners => attach_document_listeners(shared),
            Effect::DetachDocumentListeners => detach_document_listeners(shared),
        }
    }
}

fn attach_document_listeners(shared: &Rc<Shared>) {
    let mut registered = shared.document_listeners.borrow_mut();
    if !registered.is_empty() {
        return;
    }
    let document = shared.controller.borrow().dom().document().clone();
    let weak = Rc::downgrade(shared);
    registered.push(listen(&document, "keydown", &weak, |event| {
        key_input(event).map(Msg::DocumentKeyDown)
    }));
    registered.push(listen(&document, "click", &weak, |event| {
        let target = event.target()?.dyn_into::<Element>().ok()?;
        Some(Msg::DocumentClicked { target })
    }));
}

fn detach_document_listeners(shared: &Rc<Shared>) {
    let stale = std::mem::take(&mut *shared.document_listeners.borrow_mut());
    if stale.is_empty() {
        return;
    }
    // A listener may be the one currently running; free the closures after
    // this event has finished.
    Timeout::new(0, move || drop(stale)).forget();
}

fn key_input(event: &Event) -> Option<KeyInput> {
    let event = event.dyn_ref::<KeyboardEvent>()?;
    Some(KeyInput::new(Key::from_dom_key(&event.key())).with_shift(event.shift_key()))
}

fn touch_y(event: &Event) -> Option<f64> {
    let touch = event.dyn_ref::<TouchEvent>()?.touches().item(0)?;
    Some(f64::from(touch.client_y()))
}
