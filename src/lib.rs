// Image editor core - Library exports for tests and benchmarks

pub mod canvas;
pub mod color;
pub mod command;
pub mod config;
pub mod messaging;
pub mod session;

// Re-export commonly used types for convenience
pub use canvas::{Canvas, CanvasError, DisplayObject, ImageRef, ObjectId, ObjectKind};
pub use command::{
    Command, CommandError, CommandHistory, CommandName, CommandResult, CropCommand,
    EditorState, EffectCommand, EffectParam, EffectValue, Effects, FlipCommand,
    RotationCommand, Transform,
};
pub use config::{ConfigError, EditorConfig, HistoryConfig};
pub use messaging::{HistoryFlags, HistoryListener, create_flags_channel, latest_flags};
pub use session::EditorSession;
