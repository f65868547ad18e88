// CommandHistory - Manages undo/redo stacks

use crate::command::commands::{Command, CommandName};
use crate::command::error::CommandResult;
use crate::command::state::EditorState;
use crate::config::HistoryConfig;
use crate::messaging::notification::{HistoryFlags, HistoryListener};
use serde::Serialize;
use std::collections::VecDeque;
use tracing::{debug, trace, warn};

/// Command names held by each stack, oldest first
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistorySummary {
    pub undo: Vec<CommandName>,
    pub redo: Vec<CommandName>,
    pub recording: bool,
}

/// Manages undoable commands for one editing session
///
/// The history maintains two stacks:
/// - Undo stack: Commands that have been executed and can be undone
/// - Redo stack: Commands that have been undone and can be redone
///
/// History is linear: pushing a new command discards the redo stack. A
/// command is always in at most one of the two stacks.
///
/// # Ownership
/// There is one history per editing session. It is created with the session
/// and passed explicitly to whatever issues commands; "reset image" replaces
/// it with a fresh one.
///
/// # Recording
/// While recording is disabled, `push` drops commands without storing them.
/// `disable_recording` / `enable_recording` do not nest: the first enable
/// re-enables regardless of how many disables preceded it.
pub struct CommandHistory {
    /// Stack of commands that can be undone (most recent at the back)
    undo_stack: VecDeque<Command>,

    /// Stack of commands that can be redone (most recent at the back)
    redo_stack: VecDeque<Command>,

    recording: bool,

    /// Optional cap on the undo stack, oldest entries are evicted first
    max_depth: Option<usize>,

    listener: Option<Box<dyn HistoryListener>>,
}

impl CommandHistory {
    /// Create an unbounded history with recording enabled
    pub fn new() -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: VecDeque::new(),
            recording: true,
            max_depth: None,
            listener: None,
        }
    }

    /// Create a history keeping at most `max_depth` undo entries
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            max_depth: Some(max_depth),
            ..Self::new()
        }
    }

    pub fn from_config(config: &HistoryConfig) -> Self {
        Self {
            max_depth: config.max_depth,
            ..Self::new()
        }
    }

    /// Install the receiver of flag updates, replacing any previous one
    pub fn set_listener(&mut self, listener: Box<dyn HistoryListener>) {
        self.listener = Some(listener);
    }

    /// Remove and return the receiver of flag updates
    pub fn take_listener(&mut self) -> Option<Box<dyn HistoryListener>> {
        self.listener.take()
    }

    /// Record an already executed command
    ///
    /// Dropped silently while recording is disabled. Otherwise the command
    /// goes on top of the undo stack and the redo stack is cleared.
    pub fn push(&mut self, command: Command) {
        if !self.recording {
            trace!(command = %command.name(), "recording disabled, command dropped");
            return;
        }

        debug!(command = %command.name(), "push");
        self.undo_stack.push_back(command);

        // New timeline: whatever was undone can no longer be redone
        self.redo_stack.clear();

        if let Some(max_depth) = self.max_depth {
            while self.undo_stack.len() > max_depth {
                self.undo_stack.pop_front();
            }
        }

        self.publish();
    }

    /// Execute a command and record it
    ///
    /// # Errors
    /// Returns the command's error; nothing is recorded in that case.
    pub fn execute(&mut self, command: Command, state: &mut EditorState) -> CommandResult<()> {
        command.execute(state, self)?;
        self.push(command);
        Ok(())
    }

    /// Undo the last command
    ///
    /// Returns the name of the undone command, or `None` when there was
    /// nothing to undo.
    ///
    /// # Errors
    /// Returns an error if the command's undo fails. The command then stays on
    /// the undo stack and the state keeps whatever the failed undo produced.
    pub fn undo(&mut self, state: &mut EditorState) -> CommandResult<Option<CommandName>> {
        let Some(command) = self.undo_stack.pop_back() else {
            trace!("undo with empty stack");
            return Ok(None);
        };
        let name = command.name();

        if let Err(err) = command.undo(state, self) {
            warn!(command = %name, error = %err, "undo failed");
            self.undo_stack.push_back(command);
            return Err(err);
        }

        self.redo_stack.push_back(command);
        debug!(
            command = %name,
            undo = self.undo_stack.len(),
            redo = self.redo_stack.len(),
            "undo"
        );
        self.publish();
        Ok(Some(name))
    }

    /// Redo the last undone command
    ///
    /// Returns the name of the redone command, or `None` when there was
    /// nothing to redo.
    ///
    /// # Errors
    /// Returns an error if the command's execute fails. The command then stays
    /// on the redo stack.
    pub fn redo(&mut self, state: &mut EditorState) -> CommandResult<Option<CommandName>> {
        let Some(command) = self.redo_stack.pop_back() else {
            trace!("redo with empty stack");
            return Ok(None);
        };
        let name = command.name();

        if let Err(err) = command.execute(state, self) {
            warn!(command = %name, error = %err, "redo failed");
            self.redo_stack.push_back(command);
            return Err(err);
        }

        self.undo_stack.push_back(command);
        debug!(
            command = %name,
            undo = self.undo_stack.len(),
            redo = self.redo_stack.len(),
            "redo"
        );
        self.publish();
        Ok(Some(name))
    }

    pub fn disable_recording(&mut self) {
        self.recording = false;
    }

    pub fn enable_recording(&mut self) {
        self.recording = true;
    }

    pub fn is_recording(&self) -> bool {
        self.recording
    }

    /// Check if there are commands that can be undone
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Check if there are commands that can be redone
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn flags(&self) -> HistoryFlags {
        HistoryFlags::new(self.can_undo(), self.can_redo())
    }

    /// Name of the command that would be undone
    pub fn undo_name(&self) -> Option<CommandName> {
        self.undo_stack.back().map(Command::name)
    }

    /// Name of the command that would be redone
    pub fn redo_name(&self) -> Option<CommandName> {
        self.redo_stack.back().map(Command::name)
    }

    /// Get a description of the command that would be undone
    pub fn undo_description(&self) -> Option<String> {
        self.undo_stack.back().map(Command::description)
    }

    /// Get a description of the command that would be redone
    pub fn redo_description(&self) -> Option<String> {
        self.redo_stack.back().map(Command::description)
    }

    /// Get the number of commands in the undo stack
    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    /// Get the number of commands in the redo stack
    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn max_depth(&self) -> Option<usize> {
        self.max_depth
    }

    pub fn summary(&self) -> HistorySummary {
        HistorySummary {
            undo: self.undo_stack.iter().map(Command::name).collect(),
            redo: self.redo_stack.iter().map(Command::name).collect(),
            recording: self.recording,
        }
    }

    /// Send the current flags to the listener
    pub fn publish(&mut self) {
        let flags = self.flags();
        if let Some(listener) = self.listener.as_mut() {
            listener.history_changed(flags);
        }
    }
}

impl Default for CommandHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CommandHistory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandHistory")
            .field("undo_stack", &self.undo_stack)
            .field("redo_stack", &self.redo_stack)
            .field("recording", &self.recording)
            .field("max_depth", &self.max_depth)
            .field("has_listener", &self.listener.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::commands::{EffectCommand, FlipCommand, RotationCommand};
    use crate::command::error::CommandError;
    use crate::command::state::{EffectParam, EffectValue};
    use std::sync::{Arc, Mutex};

    /// Listener recording every update it receives
    #[derive(Clone, Default)]
    struct RecordingListener {
        updates: Arc<Mutex<Vec<HistoryFlags>>>,
    }

    impl HistoryListener for RecordingListener {
        fn history_changed(&mut self, flags: HistoryFlags) {
            self.updates.lock().unwrap().push(flags);
        }
    }

    fn rotate(prev_angle: f64, angle: f64) -> Command {
        RotationCommand::new(prev_angle, angle, 1.0, 1.0).into()
    }

    fn failing_flip() -> Command {
        FlipCommand::new("broken", |_| {
            Err(CommandError::ExecutionFailed("toggle handle missing".into()))
        })
        .into()
    }

    fn create_test_state() -> EditorState {
        EditorState::new()
    }

    #[test]
    fn test_push_command() {
        let mut history = CommandHistory::new();

        history.push(rotate(0.0, 90.0));

        assert_eq!(history.undo_count(), 1);
        assert_eq!(history.redo_count(), 0);
        assert!(history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn test_rotate_undo_redo_scenario() {
        let mut history = CommandHistory::new();
        let mut state = create_test_state();
        let listener = RecordingListener::default();
        history.set_listener(Box::new(listener.clone()));

        history.execute(rotate(0.0, 90.0), &mut state).unwrap();
        assert_eq!(history.flags(), HistoryFlags::new(true, false));
        assert_eq!(state.transform.angle, 90.0);

        let undone = history.undo(&mut state).unwrap();
        assert_eq!(undone, Some(CommandName::Rotate));
        assert_eq!(state.transform.angle, 0.0);
        assert_eq!(history.undo_count(), 0);
        assert_eq!(history.redo_count(), 1);
        assert_eq!(history.flags(), HistoryFlags::new(false, true));

        let redone = history.redo(&mut state).unwrap();
        assert_eq!(redone, Some(CommandName::Rotate));
        assert_eq!(state.transform.angle, 90.0);
        assert_eq!(history.undo_count(), 1);
        assert_eq!(history.redo_count(), 0);

        assert_eq!(
            *listener.updates.lock().unwrap(),
            vec![
                HistoryFlags::new(true, false),
                HistoryFlags::new(false, true),
                HistoryFlags::new(true, false),
            ]
        );
    }

    #[test]
    fn test_redo_stack_cleared_on_new_command() {
        let mut history = CommandHistory::new();
        let mut state = create_test_state();

        // push a, push b, undo, push c
        history.execute(rotate(0.0, 90.0), &mut state).unwrap();
        history.execute(rotate(90.0, 180.0), &mut state).unwrap();
        history.undo(&mut state).unwrap();
        history.execute(rotate(90.0, 45.0), &mut state).unwrap();

        assert!(!history.can_redo());
        assert_eq!(history.redo(&mut state).unwrap(), None);
        assert_eq!(state.transform.angle, 45.0);
        assert_eq!(history.undo_count(), 2);
    }

    #[test]
    fn test_undo_with_empty_stack_is_noop() {
        let mut history = CommandHistory::new();
        let mut state = create_test_state();
        let listener = RecordingListener::default();
        history.set_listener(Box::new(listener.clone()));

        assert_eq!(history.undo(&mut state).unwrap(), None);
        assert_eq!(history.redo(&mut state).unwrap(), None);
        assert!(listener.updates.lock().unwrap().is_empty());
    }

    #[test]
    fn test_push_while_disabled_is_dropped() {
        let mut history = CommandHistory::new();
        history.push(rotate(0.0, 90.0));
        history.undo(&mut create_test_state()).unwrap();

        history.disable_recording();
        history.disable_recording();
        for angle in [10.0, 20.0, 30.0] {
            history.push(rotate(0.0, angle));
        }
        assert_eq!(history.undo_count(), 0);
        assert_eq!(history.redo_count(), 1);

        // One enable is enough after two disables
        history.enable_recording();
        assert!(history.is_recording());
    }

    #[test]
    fn test_failed_undo_leaves_stacks_untouched() {
        let mut history = CommandHistory::new();
        let mut state = create_test_state();
        history.push(failing_flip());

        let err = history.undo(&mut state).unwrap_err();
        assert!(matches!(err, CommandError::ExecutionFailed(_)));
        assert_eq!(history.undo_count(), 1);
        assert_eq!(history.redo_count(), 0);
        assert_eq!(history.undo_name(), Some(CommandName::Flip));
        assert!(history.is_recording());
    }

    #[test]
    fn test_failed_execute_is_not_recorded() {
        let mut history = CommandHistory::new();
        let mut state = create_test_state();

        assert!(history.execute(failing_flip(), &mut state).is_err());
        assert_eq!(history.undo_count(), 0);
    }

    #[test]
    fn test_max_depth_evicts_oldest() {
        let mut history = CommandHistory::with_max_depth(3);
        let mut state = create_test_state();

        for i in 0..5 {
            let angle = f64::from(i) * 10.0;
            history.execute(rotate(angle, angle + 10.0), &mut state).unwrap();
        }

        assert_eq!(history.undo_count(), 3);
        for _ in 0..3 {
            history.undo(&mut state).unwrap();
        }
        // The two oldest rotations are gone for good
        assert_eq!(state.transform.angle, 20.0);
        assert!(!history.can_undo());
    }

    #[test]
    fn test_descriptions_and_summary() {
        let mut history = CommandHistory::new();
        let mut state = create_test_state();
        history.execute(rotate(0.0, 90.0), &mut state).unwrap();
        history
            .execute(
                EffectCommand::new(
                    vec![EffectValue::new(EffectParam::Blur, 0.0)],
                    vec![EffectValue::new(EffectParam::Blur, 0.5)],
                )
                .into(),
                &mut state,
            )
            .unwrap();
        history.undo(&mut state).unwrap();

        assert_eq!(history.undo_description().as_deref(), Some("Rotate 0° → 90°"));
        assert_eq!(history.redo_description().as_deref(), Some("Set blur to 0.50"));
        assert_eq!(
            history.summary(),
            HistorySummary {
                undo: vec![CommandName::Rotate],
                redo: vec![CommandName::Effect],
                recording: true,
            }
        );
    }
}
