// Command Pattern for Undo/Redo functionality
//
// Every undoable gesture of the editor goes through a `Command`.
//
// Architecture:
// - Command: closed enum over Crop, Effect, Flip and Rotate, each variant
//   owning the snapshots it needs to replay and revert itself
// - CommandHistory: undo/redo stacks, recording flag, flag publication
// - guards: scoped helpers suspending recording and normalizing the scale
//   around compound steps
// - EditorState: the mutable state commands act on, with the canvas handle
//   used to redraw
//
// Usage: build a command from before/after snapshots, execute it, then push
// it (or call `CommandHistory::execute`, which does both).

pub mod commands;
pub mod error;
pub mod guards;
pub mod manager;
pub mod state;

pub use commands::{Command, CommandName, CropCommand, EffectCommand, FlipCommand, RotationCommand};
pub use error::{CommandError, CommandResult};
pub use guards::{RecordingPause, with_scale_reset, without_recording};
pub use manager::{CommandHistory, HistorySummary};
pub use state::{EditorState, EffectParam, EffectValue, Effects, Transform};
