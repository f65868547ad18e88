// EditorSession - Toolbar actions issuing commands against one history
//
// A session owns the state and the history of one editing session. UI
// controls call into it; each gesture becomes exactly one command.

use crate::canvas::ImageRef;
use crate::command::commands::{
    Command, CommandName, CropCommand, EffectCommand, FlipCommand, RotationCommand,
};
use crate::command::error::{CommandError, CommandResult};
use crate::command::manager::CommandHistory;
use crate::command::state::{CropRatio, EditorState, EffectParam, EffectValue};
use crate::config::EditorConfig;
use crate::messaging::notification::{HistoryFlags, HistoryListener};
use tracing::{debug, info};

/// Step applied by the rotate buttons, in degrees
pub const ROTATION_STEP: f64 = 90.0;

/// Bound of the angle slider; values past it wrap by one turn
pub const MAX_ANGLE: f64 = 360.0;

/// State, history and the pending slider gesture of one editing session
pub struct EditorSession {
    state: EditorState,
    history: CommandHistory,
    config: EditorConfig,
    /// Effect values captured when the current slider drag started
    pending_effects: Option<Vec<EffectValue>>,
}

impl EditorSession {
    pub fn new(config: EditorConfig) -> Self {
        let state = EditorState::with_effects(config.effects_defaults);
        Self::with_state(state, config)
    }

    /// Start a session on an existing state (e.g. with a canvas attached)
    pub fn with_state(state: EditorState, config: EditorConfig) -> Self {
        Self {
            state,
            history: CommandHistory::from_config(&config.history),
            config,
            pending_effects: None,
        }
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    /// Direct access for non-undoable changes (toolbar toggles, crop zone)
    pub fn state_mut(&mut self) -> &mut EditorState {
        &mut self.state
    }

    pub fn history(&self) -> &CommandHistory {
        &self.history
    }

    pub fn flags(&self) -> HistoryFlags {
        self.history.flags()
    }

    /// Install the receiver of Undo/Redo enable updates
    pub fn set_listener(&mut self, listener: Box<dyn HistoryListener>) {
        self.history.set_listener(listener);
    }

    /// Load a freshly uploaded image; history starts over
    pub fn open_image(&mut self, image: ImageRef) {
        self.state.image = Some(image);
        self.state.effects = self.config.effects_defaults;
        self.reset_image();
    }

    /// Run a command and record it
    ///
    /// # Errors
    /// Returns the command's error; nothing is recorded in that case.
    pub fn apply(&mut self, command: Command) -> CommandResult<()> {
        self.history.execute(command, &mut self.state)
    }

    pub fn rotate_left(&mut self) -> CommandResult<()> {
        let mut angle = self.state.transform.angle - ROTATION_STEP;
        if angle < -MAX_ANGLE {
            angle += MAX_ANGLE;
        }
        self.rotate_to(angle)
    }

    pub fn rotate_right(&mut self) -> CommandResult<()> {
        let mut angle = self.state.transform.angle + ROTATION_STEP;
        if angle > MAX_ANGLE {
            angle -= MAX_ANGLE;
        }
        self.rotate_to(angle)
    }

    /// Angle slider: set an absolute angle
    pub fn set_angle(&mut self, angle: f64) -> CommandResult<()> {
        if !(-MAX_ANGLE..=MAX_ANGLE).contains(&angle) {
            return Err(CommandError::InvalidState(format!(
                "angle {} outside [-{}, {}]",
                angle, MAX_ANGLE, MAX_ANGLE
            )));
        }
        self.rotate_to(angle)
    }

    fn rotate_to(&mut self, angle: f64) -> CommandResult<()> {
        let transform = self.state.transform;
        self.apply(
            RotationCommand::new(transform.angle, angle, transform.scale, transform.scale).into(),
        )
    }

    pub fn flip_x(&mut self) -> CommandResult<()> {
        self.apply(FlipCommand::horizontal().into())
    }

    pub fn flip_y(&mut self) -> CommandResult<()> {
        self.apply(FlipCommand::vertical().into())
    }

    /// Slider drag started: remember every effect value
    ///
    /// A second call before `finish_effect_adjustment` keeps the first
    /// snapshot, so a gesture is never split.
    pub fn begin_effect_adjustment(&mut self) {
        if self.pending_effects.is_none() {
            self.pending_effects = Some(self.state.effects.snapshot());
        }
    }

    /// Slider moved: update the live value without recording anything
    pub fn preview_effect(&mut self, param: EffectParam, value: f64) -> CommandResult<()> {
        self.state.effects.set(param, value);
        self.state.redraw()?;
        Ok(())
    }

    /// Slider drag stopped: record the whole gesture as one command
    ///
    /// Returns `false` when there was no gesture in progress or nothing
    /// changed.
    pub fn finish_effect_adjustment(&mut self) -> CommandResult<bool> {
        let Some(before) = self.pending_effects.take() else {
            return Ok(false);
        };
        let after = self.state.effects.snapshot();
        if before == after {
            debug!("effect gesture changed nothing, not recorded");
            return Ok(false);
        }

        self.commit_effects(before, after)?;
        Ok(true)
    }

    /// Color picker: set the tint from a hex string at full opacity, as one
    /// undoable step
    ///
    /// # Errors
    /// Fails on malformed hex without touching state or history.
    pub fn pick_tint(&mut self, hex: &str) -> CommandResult<()> {
        let mut picked = self.state.effects;
        picked.set_tint_hex(hex)?;
        picked.tint_opacity = 1.0;

        let current = &self.state.effects;
        let before = vec![
            EffectValue::new(EffectParam::TintColor, current.get(EffectParam::TintColor)),
            EffectValue::new(EffectParam::TintOpacity, current.tint_opacity),
        ];
        let after = vec![
            EffectValue::new(EffectParam::TintColor, picked.get(EffectParam::TintColor)),
            EffectValue::new(EffectParam::TintOpacity, picked.tint_opacity),
        ];
        self.commit_effects(before, after)
    }

    /// Apply `after`, record the change, then redraw
    ///
    /// The command is recorded before the redraw runs; a failed draw is
    /// reported with the command already on the undo stack.
    fn commit_effects(
        &mut self,
        before: Vec<EffectValue>,
        after: Vec<EffectValue>,
    ) -> CommandResult<()> {
        self.state.effects.apply(&after);
        self.history.push(EffectCommand::new(before, after).into());
        self.state.redraw()?;
        Ok(())
    }

    /// Crop panel ratio buttons; `"custom"` frees the ratio
    ///
    /// # Errors
    /// Returns `InvalidState` for a label that is not a preset.
    pub fn set_crop_ratio(&mut self, name: &str) -> CommandResult<()> {
        let ratio = CropRatio::preset(name)
            .ok_or_else(|| CommandError::InvalidState(format!("unknown crop ratio {:?}", name)))?;
        self.state.crop_zone.ratio = ratio;
        debug!(ratio = name, "crop ratio set");
        Ok(())
    }

    /// Crop panel width/height inputs; negative sizes clamp to zero
    pub fn set_crop_size(&mut self, width: f64, height: f64) {
        self.state.crop_zone.width = width.max(0.0);
        self.state.crop_zone.height = height.max(0.0);
    }

    /// Replace the image with an externally cropped raster and close the
    /// crop toolbar
    pub fn crop(&mut self, image: ImageRef) -> CommandResult<()> {
        let objects = self.state.canvas_objects();
        let command = CropCommand::new(&self.state, image, objects);
        self.apply(command.into())?;
        self.state.close_toolbar();
        Ok(())
    }

    /// Undo button
    ///
    /// # Errors
    /// See [`CommandHistory::undo`]; the UI is expected to log and move on.
    pub fn undo(&mut self) -> CommandResult<Option<CommandName>> {
        self.history.undo(&mut self.state)
    }

    /// Redo button
    pub fn redo(&mut self) -> CommandResult<Option<CommandName>> {
        self.history.redo(&mut self.state)
    }

    /// Put the transform back to defaults and start a new history
    ///
    /// The listener moves to the new history and is told that both buttons
    /// are now disabled.
    pub fn reset_image(&mut self) {
        self.state.reset_image();
        self.state.close_toolbar();
        self.pending_effects = None;

        let listener = self.history.take_listener();
        self.history = CommandHistory::from_config(&self.config.history);
        if let Some(listener) = listener {
            self.history.set_listener(listener);
        }
        self.history.publish();
        info!("image reset, history cleared");
    }
}

impl std::fmt::Debug for EditorSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorSession")
            .field("state", &self.state)
            .field("history", &self.history)
            .field("pending_effects", &self.pending_effects.is_some())
            .finish()
    }
}
