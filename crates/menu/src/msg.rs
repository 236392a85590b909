//! Messages the host feeds into the controller and the effects it gets back.
//!
//! The controller performs DOM writes directly through its [`crate::dom::Dom`]
//! handle. Anything that depends on the host event loop (cancelling the
//! current event's default action, timers, document-level listener
//! registration) is returned as an [`Effect`] instead.

use std::convert::Infallible;
use std::str::FromStr;
use std::time::Duration;

use navmenu_util::Ticket;

/// Input events, parameterized over the host's node handle.
#[derive(Debug, Clone, PartialEq)]
pub enum Msg<N> {
    /// Click on the trigger button.
    TriggerClicked,
    /// Keydown on the trigger button.
    TriggerKeyDown(KeyInput),
    /// Click on one of the panel's anchor links.
    LinkActivated { link: N },
    /// Document-level keydown, delivered only while document listeners are attached.
    DocumentKeyDown(KeyInput),
    /// Document-level click, delivered only while document listeners are attached.
    DocumentClicked { target: N },
    /// `touchstart` on the panel, with the first touch's `clientY`.
    TouchStarted { y: f64 },
    /// `touchmove` on the panel, with the first touch's `clientY`.
    TouchMoved { y: f64 },
    /// `touchend` or `touchcancel` on the panel.
    TouchEnded,
    /// Window resize.
    Resized,
    /// Click on the logo/brand element.
    LogoClicked,
    /// A timer requested through [`Effect::Schedule`] fired.
    TimerElapsed(Timer),
}

/// Side effects the host must carry out after dispatching a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Cancel the default action of the event currently being dispatched.
    PreventDefault,
    /// Deliver `Msg::TimerElapsed(timer)` after `delay`.
    Schedule { delay: Duration, timer: Timer },
    /// Register the document-level keydown and click listeners.
    AttachDocumentListeners,
    /// Remove the document-level keydown and click listeners.
    DetachDocumentListeners,
}

/// Timers the controller can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Timer {
    /// End of the open/close transition; releases the animation lock.
    AnimationLock,
    /// Resize settle timer. Only the newest ticket has any effect.
    ResizeSettled(Ticket),
}

/// Logical key, following `KeyboardEvent.key`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Enter,
    Space,
    Escape,
    Tab,
    Other(String),
}

impl Key {
    /// Maps a `KeyboardEvent.key` value, including legacy spellings.
    pub fn from_dom_key(key: &str) -> Self {
        match key {
            "Enter" => Key::Enter,
            " " | "Spacebar" => Key::Space,
            "Escape" | "Esc" => Key::Escape,
            "Tab" => Key::Tab,
            other => Key::Other(other.to_string()),
        }
    }
}

impl FromStr for Key {
    type Err = Infallible;

    /// Parses human-written key names (`enter`, `space`, `esc`, `tab`), case
    /// insensitively. Anything else becomes [`Key::Other`].
    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let key = match name.to_ascii_lowercase().as_str() {
            "enter" | "return" => Key::Enter,
            "space" | " " => Key::Space,
            "escape" | "esc" => Key::Escape,
            "tab" => Key::Tab,
            _ => Key::Other(name.to_string()),
        };
        Ok(key)
    }
}

/// A keydown as seen by the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyInput {
    pub key: Key,
    pub shift: bool,
}

impl KeyInput {
    pub fn new(key: Key) -> Self {
        Self { key, shift: false }
    }

    pub fn with_shift(mut self, shift: bool) -> Self {
        self.shift = shift;
        self
    }

    pub fn tab() -> Self {
        Self::new(Key::Tab)
    }

    pub fn shift_tab() -> Self {
        Self::new(Key::Tab).with_shift(true)
    }

    pub fn escape() -> Self {
        Self::new(Key::Escape)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dom_key_mapping() {
        assert_eq!(Key::from_dom_key(" "), Key::Space);
        assert_eq!(Key::from_dom_key("Esc"), Key::Escape);
        assert_eq!(Key::from_dom_key("Tab"), Key::Tab);
        assert_eq!(Key::from_dom_key("a"), Key::Other("a".to_string()));
    }

    #[test]
    fn test_key_names() {
        assert_eq!("ESC".parse::<Key>().unwrap(), Key::Escape);
        assert_eq!("space".parse::<Key>().unwrap(), Key::Space);
        assert_eq!("ArrowDown".parse::<Key>().unwrap(), Key::Other("ArrowDown".to_string()));
    }
}
