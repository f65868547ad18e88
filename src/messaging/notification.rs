// History notifications for the UI layer
//
// After every push/undo/redo the history republishes whether the Undo and
// Redo buttons should be enabled.

use serde::{Deserialize, Serialize};

/// Enabled state of the Undo/Redo affordances
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HistoryFlags {
    pub can_undo: bool,
    pub can_redo: bool,
}

impl HistoryFlags {
    pub fn new(can_undo: bool, can_redo: bool) -> Self {
        Self { can_undo, can_redo }
    }
}

/// Receiver of history flag updates
///
/// Called synchronously from inside `push`, `undo` and `redo`, after the
/// stacks have been updated.
pub trait HistoryListener: Send {
    fn history_changed(&mut self, flags: HistoryFlags);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_flags_disable_both_buttons() {
        let flags = HistoryFlags::default();
        assert!(!flags.can_undo);
        assert!(!flags.can_redo);
    }

    #[test]
    fn test_flags_serialize_for_the_ui() {
        let json = serde_json::to_string(&HistoryFlags::new(true, false)).unwrap();
        assert_eq!(json, r#"{"can_undo":true,"can_redo":false}"#);
    }
}
