//! Host-independent helpers shared by the navmenu controller and its hosts.
//!
//! Nothing in this crate knows about menus: the debouncer is a plain timer
//! holder, the selector module understands a small CSS subset, and the
//! fragment helper parses link targets.

pub mod debounce;
pub mod fragment;
pub mod selector;

pub use debounce::{Debouncer, Ticket};
pub use fragment::fragment_id;
pub use selector::{SelectorError, SelectorList, SelectorTarget};
