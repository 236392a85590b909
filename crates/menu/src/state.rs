//! Transient controller state.

use std::fmt;

use serde::Serialize;

/// Whether the menu panel is open. Always derived from the panel's open
/// marker class; never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MenuState {
    Closed,
    Open,
}

impl MenuState {
    pub fn from_open(open: bool) -> Self {
        if open { MenuState::Open } else { MenuState::Closed }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, MenuState::Open)
    }
}

impl fmt::Display for MenuState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MenuState::Closed => f.write_str("closed"),
            MenuState::Open => f.write_str("open"),
        }
    }
}

/// Blocks re-entrant toggles while the open/close transition runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct AnimationLock {
    engaged: bool,
}

impl AnimationLock {
    pub fn is_engaged(&self) -> bool {
        self.engaged
    }

    /// Engages the lock. Returns `false` if it was already engaged.
    pub fn try_engage(&mut self) -> bool {
        if self.engaged {
            return false;
        }
        self.engaged = true;
        true
    }

    pub fn release(&mut self) {
        self.engaged = false;
    }
}

/// Ordered focus trap members, captured when the menu opens.
#[derive(Debug, Clone)]
pub struct FocusableSet<N> {
    nodes: Vec<N>,
}

impl<N> Default for FocusableSet<N> {
    fn default() -> Self {
        Self { nodes: Vec::new() }
    }
}

impl<N: Clone + PartialEq> FocusableSet<N> {
    pub fn new(nodes: Vec<N>) -> Self {
        Self { nodes }
    }

    pub fn first(&self) -> Option<&N> {
        self.nodes.first()
    }

    pub fn last(&self) -> Option<&N> {
        self.nodes.last()
    }

    /// First and last members, for wraparound.
    pub fn bounds(&self) -> Option<(N, N)> {
        Some((self.first()?.clone(), self.last()?.clone()))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &N> {
        self.nodes.iter()
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
    }
}

/// Vertical start position of the current touch gesture.
#[derive(Debug, Default, Clone, Copy)]
pub struct TouchTracker {
    start_y: Option<f64>,
}

impl TouchTracker {
    pub fn start(&mut self, y: f64) {
        self.start_y = Some(y);
    }

    /// Downward distance travelled since the gesture started.
    pub fn delta(&self, y: f64) -> Option<f64> {
        self.start_y.map(|start| y - start)
    }

    pub fn reset(&mut self) {
        self.start_y = None;
    }

    pub fn is_active(&self) -> bool {
        self.start_y.is_some()
    }
}

/// Serializable view of the controller and the markers it manages.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuSnapshot {
    pub state: MenuState,
    pub locked: bool,
    pub aria_expanded: Option<String>,
    pub trigger_active: bool,
    pub body_no_scroll: bool,
    pub document_listeners: bool,
    pub focusable_count: usize,
    pub focused: Option<String>,
}

impl fmt::Display for MenuSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "state={} locked={} aria-expanded={} active={} no-scroll={} listeners={} focusables={} focused={}",
            self.state,
            self.locked,
            self.aria_expanded.as_deref().unwrap_or("-"),
            self.trigger_active,
            self.body_no_scroll,
            self.document_listeners,
            self.focusable_count,
            self.focused.as_deref().unwrap_or("-"),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lock_engages_once() {
        let mut lock = AnimationLock::default();
        assert!(lock.try_engage());
        assert!(!lock.try_engage());
        lock.release();
        assert!(!lock.is_engaged());
        assert!(lock.try_engage());
    }

    #[test]
    fn test_touch_delta_requires_start() {
        let mut tracker = TouchTracker::default();
        assert_eq!(tracker.delta(10.0), None);
        tracker.start(100.0);
        assert_eq!(tracker.delta(151.0), Some(51.0));
        assert_eq!(tracker.delta(80.0), Some(-20.0));
        tracker.reset();
        assert!(!tracker.is_active());
    }

    #[test]
    fn test_focusable_bounds() {
        let set = FocusableSet::new(vec![1, 2, 3]);
        assert_eq!(set.bounds(), Some((1, 3)));
        assert!(FocusableSet::<u8>::default().bounds().is_none());

        let single = FocusableSet::new(vec![7]);
        assert_eq!(single.bounds(), Some((7, 7)));
    }
}
