// Scoped guards wrapped around compound command steps
//
// - Recording guard: history recording is suspended while the closure runs
//   and re-enabled on every exit path, so nested state changes never land on
//   the undo stack as separate entries.
// - Scale guard: the interactive scale is forced to the canonical value
//   before or after the closure depending on whether a toolbar is open.

use crate::command::error::CommandResult;
use crate::command::manager::CommandHistory;
use crate::command::state::EditorState;
use std::ops::{Deref, DerefMut};
use tracing::trace;

/// Borrow of the history with recording disabled
///
/// Recording is re-enabled when the pause is dropped, including during
/// unwinding. Like `enable_recording`, the release is unconditional: an
/// enclosing pause is not restored.
pub struct RecordingPause<'a> {
    history: &'a mut CommandHistory,
}

impl<'a> RecordingPause<'a> {
    pub fn new(history: &'a mut CommandHistory) -> Self {
        trace!("recording paused");
        history.disable_recording();
        Self { history }
    }
}

impl Deref for RecordingPause<'_> {
    type Target = CommandHistory;

    fn deref(&self) -> &CommandHistory {
        self.history
    }
}

impl DerefMut for RecordingPause<'_> {
    fn deref_mut(&mut self) -> &mut CommandHistory {
        self.history
    }
}

impl Drop for RecordingPause<'_> {
    fn drop(&mut self) {
        self.history.enable_recording();
        trace!("recording resumed");
    }
}

/// Run `f` with history recording suppressed
pub fn without_recording<R>(
    history: &mut CommandHistory,
    f: impl FnOnce(&mut CommandHistory) -> R,
) -> R {
    let mut pause = RecordingPause::new(history);
    f(&mut *pause)
}

/// Run `f` with the scale normalized to the canonical value
///
/// Toolbar open: `f` runs first, then the scale is reset, whether or not `f`
/// failed. Toolbar closed: the scale is reset, then `f` runs. The toolbar
/// flag is read once, before `f`.
pub fn with_scale_reset<R>(
    state: &mut EditorState,
    f: impl FnOnce(&mut EditorState) -> CommandResult<R>,
) -> CommandResult<R> {
    if state.toolbar_open {
        let result = f(state);
        state.reset_scale();
        trace!("scale reset after interactive step");
        result
    } else {
        state.reset_scale();
        trace!("scale reset before one-shot step");
        f(state)
    }
}
