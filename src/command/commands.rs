// Concrete command implementations
//
// Commands are a closed set: every undoable gesture of the editor is one of
// the variants of `Command`. Each variant owns the snapshots it needs and
// never borrows live state.

use crate::canvas::{DisplayObject, ImageRef};
use crate::command::error::CommandResult;
use crate::command::guards::{with_scale_reset, without_recording};
use crate::command::manager::CommandHistory;
use crate::command::state::{EditorState, EffectValue, Transform};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Tag identifying a command variant, for labels and telemetry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandName {
    Crop,
    Effect,
    Flip,
    Rotate,
}

impl fmt::Display for CommandName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CommandName::Crop => "crop",
            CommandName::Effect => "effect",
            CommandName::Flip => "flip",
            CommandName::Rotate => "rotate",
        };
        f.write_str(label)
    }
}

/// One undoable user action
///
/// `execute` applies the "after" state and `undo` applies the "before"
/// state. Both take the history so that compound steps can suspend
/// recording while they run.
#[derive(Debug)]
pub enum Command {
    Crop(CropCommand),
    Effect(EffectCommand),
    Flip(FlipCommand),
    Rotate(RotationCommand),
}

impl Command {
    pub fn name(&self) -> CommandName {
        match self {
            Command::Crop(_) => CommandName::Crop,
            Command::Effect(_) => CommandName::Effect,
            Command::Flip(_) => CommandName::Flip,
            Command::Rotate(_) => CommandName::Rotate,
        }
    }

    /// Apply the command
    ///
    /// # Errors
    /// Returns an error if the canvas or a caller-supplied toggle fails. The
    /// state is left as far as the command got.
    pub fn execute(
        &self,
        state: &mut EditorState,
        history: &mut CommandHistory,
    ) -> CommandResult<()> {
        match self {
            Command::Crop(cmd) => cmd.execute(state),
            Command::Effect(cmd) => cmd.execute(state),
            Command::Flip(cmd) => cmd.execute(state, history),
            Command::Rotate(cmd) => cmd.execute(state),
        }
    }

    /// Revert the command
    ///
    /// # Errors
    /// Same as [`Command::execute`].
    pub fn undo(&self, state: &mut EditorState, history: &mut CommandHistory) -> CommandResult<()> {
        match self {
            Command::Crop(cmd) => cmd.undo(state, history),
            Command::Effect(cmd) => cmd.undo(state),
            Command::Flip(cmd) => cmd.undo(state, history),
            Command::Rotate(cmd) => cmd.undo(state),
        }
    }

    /// Human-readable description (e.g. "Undo: Rotate 0° → 90°")
    pub fn description(&self) -> String {
        match self {
            Command::Crop(cmd) => format!("Crop to {}", cmd.image),
            Command::Effect(cmd) => match cmd.after.as_slice() {
                [single] => format!("Set {} to {:.2}", single.param.as_str(), single.value),
                values => format!("Adjust {} effects", values.len()),
            },
            Command::Flip(cmd) => format!("Flip {}", cmd.label),
            Command::Rotate(cmd) => format!("Rotate {}° → {}°", cmd.prev_angle, cmd.angle),
        }
    }
}

impl From<CropCommand> for Command {
    fn from(cmd: CropCommand) -> Self {
        Command::Crop(cmd)
    }
}

impl From<EffectCommand> for Command {
    fn from(cmd: EffectCommand) -> Self {
        Command::Effect(cmd)
    }
}

impl From<FlipCommand> for Command {
    fn from(cmd: FlipCommand) -> Self {
        Command::Flip(cmd)
    }
}

impl From<RotationCommand> for Command {
    fn from(cmd: RotationCommand) -> Self {
        Command::Rotate(cmd)
    }
}

/// Command replacing the image with an externally cropped raster
///
/// Everything a crop may disturb is captured when the command is built:
/// the previous image, transform, effect values and the annotation nodes
/// present on the canvas.
#[derive(Debug, Clone)]
pub struct CropCommand {
    image: ImageRef,
    prev_image: Option<ImageRef>,
    prev_transform: Transform,
    prev_effects: Vec<EffectValue>,
    prev_objects: Vec<DisplayObject>,
}

impl CropCommand {
    /// Create a new CropCommand
    ///
    /// # Arguments
    /// * `state` - State before the crop, snapshotted by value
    /// * `image` - The cropped raster
    /// * `prev_objects` - Canvas nodes present before the crop
    pub fn new(state: &EditorState, image: ImageRef, prev_objects: Vec<DisplayObject>) -> Self {
        Self {
            image,
            prev_image: state.image.clone(),
            prev_transform: state.transform,
            prev_effects: state.effects.snapshot(),
            prev_objects,
        }
    }

    pub fn image(&self) -> &ImageRef {
        &self.image
    }

    pub fn prev_image(&self) -> Option<&ImageRef> {
        self.prev_image.as_ref()
    }

    fn execute(&self, state: &mut EditorState) -> CommandResult<()> {
        state.image = Some(self.image.clone());
        if state.toolbar_open {
            state.reset_scale();
        }
        state.redraw()?;
        Ok(())
    }

    fn undo(&self, state: &mut EditorState, history: &mut CommandHistory) -> CommandResult<()> {
        state.image = self.prev_image.clone();
        state.attach_objects(&self.prev_objects)?;

        // Angle, flips and scale go back as one step that must not record
        without_recording(history, |_| {
            with_scale_reset(state, |state| {
                state.transform = self.prev_transform;
                Ok(())
            })
        })?;

        state.effects.apply(&self.prev_effects);
        state.redraw()?;
        Ok(())
    }
}

/// Command applying a batch of effect values
///
/// Build it with the values captured when the slider drag started and when
/// it stopped; the intermediate ticks are never recorded.
#[derive(Debug, Clone)]
pub struct EffectCommand {
    before: Vec<EffectValue>,
    after: Vec<EffectValue>,
}

impl EffectCommand {
    pub fn new(before: Vec<EffectValue>, after: Vec<EffectValue>) -> Self {
        Self { before, after }
    }

    pub fn before(&self) -> &[EffectValue] {
        &self.before
    }

    pub fn after(&self) -> &[EffectValue] {
        &self.after
    }

    fn execute(&self, state: &mut EditorState) -> CommandResult<()> {
        Self::apply(state, &self.after)
    }

    fn undo(&self, state: &mut EditorState) -> CommandResult<()> {
        Self::apply(state, &self.before)
    }

    fn apply(state: &mut EditorState, values: &[EffectValue]) -> CommandResult<()> {
        state.effects.apply(values);
        // One redraw for the whole batch
        state.redraw()?;
        Ok(())
    }
}

type Toggle = Box<dyn Fn(&mut EditorState) -> CommandResult<()> + Send>;

/// Command wrapping a self-inverse toggle such as "flip horizontal"
pub struct FlipCommand {
    label: &'static str,
    toggle: Toggle,
}

impl FlipCommand {
    /// Wrap a caller-supplied toggle
    ///
    /// The toggle must be its own inverse: running it twice leaves the state
    /// unchanged.
    pub fn new(
        label: &'static str,
        toggle: impl Fn(&mut EditorState) -> CommandResult<()> + Send + 'static,
    ) -> Self {
        Self {
            label,
            toggle: Box::new(toggle),
        }
    }

    /// Mirror along the vertical axis
    pub fn horizontal() -> Self {
        Self::new("horizontal", |state| {
            state.transform.flip_x = !state.transform.flip_x;
            Ok(())
        })
    }

    /// Mirror along the horizontal axis
    pub fn vertical() -> Self {
        Self::new("vertical", |state| {
            state.transform.flip_y = !state.transform.flip_y;
            Ok(())
        })
    }

    fn execute(&self, state: &mut EditorState, history: &mut CommandHistory) -> CommandResult<()> {
        self.run_toggle(state, history)
    }

    fn undo(&self, state: &mut EditorState, history: &mut CommandHistory) -> CommandResult<()> {
        self.run_toggle(state, history)
    }

    fn run_toggle(
        &self,
        state: &mut EditorState,
        history: &mut CommandHistory,
    ) -> CommandResult<()> {
        without_recording(history, |_| {
            // The toggle may touch the transform, so the scale is reset up
            // front and, with the toolbar open, once more afterwards
            state.reset_scale();
            with_scale_reset(state, |state| (self.toggle)(state))
        })?;
        state.redraw()?;
        Ok(())
    }
}

impl fmt::Debug for FlipCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlipCommand")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

/// Command setting the rotation angle and base scale
///
/// Angles are stored as given; wrapping into (-360, 360] is up to the caller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationCommand {
    prev_angle: f64,
    angle: f64,
    prev_scale: f64,
    scale: f64,
}

impl RotationCommand {
    pub fn new(prev_angle: f64, angle: f64, prev_scale: f64, scale: f64) -> Self {
        Self {
            prev_angle,
            angle,
            prev_scale,
            scale,
        }
    }

    pub fn angle(&self) -> f64 {
        self.angle
    }

    pub fn prev_angle(&self) -> f64 {
        self.prev_angle
    }

    fn execute(&self, state: &mut EditorState) -> CommandResult<()> {
        Self::apply(state, self.angle, self.scale)
    }

    fn undo(&self, state: &mut EditorState) -> CommandResult<()> {
        Self::apply(state, self.prev_angle, self.prev_scale)
    }

    fn apply(state: &mut EditorState, angle: f64, scale: f64) -> CommandResult<()> {
        with_scale_reset(state, |state| {
            state.transform.angle = angle;
            state.transform.scale = scale;
            Ok(())
        })?;
        state.redraw()?;
        Ok(())
    }
}
