// EditorState - Centralized mutable state for the image editor
//
// This struct holds every parameter that commands can modify, plus the
// handle to the rendering collaborator used to redraw after a change.

use crate::canvas::{Canvas, CanvasError, DisplayObject, ImageRef};
use crate::color::{self, MAX_PACKED_RGB};
use serde::{Deserialize, Serialize};

/// Reference zoom level that interactive transforms normalize to
pub const CANONICAL_SCALE: f64 = 1.0;

/// Geometric transform applied to the displayed image
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// Rotation in degrees, conventionally within (-360, 360]
    pub angle: f64,
    /// Interactive zoom on top of the fit-to-view baseline
    pub scale: f64,
    pub flip_x: bool,
    pub flip_y: bool,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            angle: 0.0,
            scale: CANONICAL_SCALE,
            flip_x: false,
            flip_y: false,
        }
    }
}

/// Identifier of a color/adjustment parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EffectParam {
    Brightness,
    Contrast,
    Saturation,
    TintColor,
    TintOpacity,
    Invert,
    Hue,
    Noise,
    Blur,
    Pixelate,
}

impl EffectParam {
    /// Every parameter, in the order snapshots list them
    pub const ALL: [EffectParam; 10] = [
        EffectParam::Brightness,
        EffectParam::Contrast,
        EffectParam::Saturation,
        EffectParam::TintColor,
        EffectParam::TintOpacity,
        EffectParam::Invert,
        EffectParam::Hue,
        EffectParam::Noise,
        EffectParam::Blur,
        EffectParam::Pixelate,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EffectParam::Brightness => "brightness",
            EffectParam::Contrast => "contrast",
            EffectParam::Saturation => "saturation",
            EffectParam::TintColor => "tintColor",
            EffectParam::TintOpacity => "tintOpacity",
            EffectParam::Invert => "invert",
            EffectParam::Hue => "hue",
            EffectParam::Noise => "noise",
            EffectParam::Blur => "blur",
            EffectParam::Pixelate => "pixelate",
        }
    }
}

/// One `{parameterId, numericValue}` pair of an effect snapshot
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EffectValue {
    pub param: EffectParam,
    pub value: f64,
}

impl EffectValue {
    pub fn new(param: EffectParam, value: f64) -> Self {
        Self { param, value }
    }
}

/// Current values of all color effects
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Effects {
    pub brightness: f64,
    pub contrast: f64,
    pub saturation: f64,
    /// Packed 0xRRGGBB
    pub tint_color: u32,
    pub tint_opacity: f64,
    pub invert: f64,
    pub hue: f64,
    pub noise: f64,
    pub blur: f64,
    /// Block size in pixels, 1 means no pixelation
    pub pixelate: f64,
}

impl Default for Effects {
    fn default() -> Self {
        Self {
            brightness: 0.0,
            contrast: 0.0,
            saturation: 0.0,
            tint_color: 0x000000,
            tint_opacity: 0.0,
            invert: 0.0,
            hue: 0.0,
            noise: 0.0,
            blur: 0.0,
            pixelate: 1.0,
        }
    }
}

impl Effects {
    /// Read a parameter as a number (tint color as its packed value)
    pub fn get(&self, param: EffectParam) -> f64 {
        match param {
            EffectParam::Brightness => self.brightness,
            EffectParam::Contrast => self.contrast,
            EffectParam::Saturation => self.saturation,
            EffectParam::TintColor => f64::from(self.tint_color),
            EffectParam::TintOpacity => self.tint_opacity,
            EffectParam::Invert => self.invert,
            EffectParam::Hue => self.hue,
            EffectParam::Noise => self.noise,
            EffectParam::Blur => self.blur,
            EffectParam::Pixelate => self.pixelate,
        }
    }

    /// Write a parameter from a number
    pub fn set(&mut self, param: EffectParam, value: f64) {
        match param {
            EffectParam::Brightness => self.brightness = value,
            EffectParam::Contrast => self.contrast = value,
            EffectParam::Saturation => self.saturation = value,
            EffectParam::TintColor => self.tint_color = color::packed_from_channel(value),
            EffectParam::TintOpacity => self.tint_opacity = value,
            EffectParam::Invert => self.invert = value,
            EffectParam::Hue => self.hue = value,
            EffectParam::Noise => self.noise = value,
            EffectParam::Blur => self.blur = value,
            EffectParam::Pixelate => self.pixelate = value,
        }
    }

    /// Copy every parameter into an ordered list of pairs
    pub fn snapshot(&self) -> Vec<EffectValue> {
        EffectParam::ALL
            .iter()
            .map(|&param| EffectValue::new(param, self.get(param)))
            .collect()
    }

    /// Write a list of pairs in order; later pairs win on duplicates
    pub fn apply(&mut self, values: &[EffectValue]) {
        for value in values {
            self.set(value.param, value.value);
        }
    }

    /// Set the tint from a hex string as the color picker does
    pub fn set_tint_hex(&mut self, hex: &str) -> Result<(), color::ColorError> {
        self.tint_color = color::parse_hex(hex)? & MAX_PACKED_RGB;
        Ok(())
    }

    pub fn tint_hex(&self) -> String {
        let (r, g, b) = color::unpack_rgb(self.tint_color);
        color::rgb_to_hex(r, g, b)
    }
}

/// Tool panel currently shown in the toolbar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ToolMode {
    #[default]
    None,
    Crop,
    Adjust,
    Effects,
}

/// Fixed aspect ratio for the crop zone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropRatio {
    pub width: u32,
    pub height: u32,
}

impl CropRatio {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Ratios offered by the crop panel; `None` is free-form
    pub const PRESETS: [(&'static str, Option<CropRatio>); 8] = [
        ("custom", None),
        ("1:1", Some(CropRatio::new(1, 1))),
        ("3:2", Some(CropRatio::new(3, 2))),
        ("4:3", Some(CropRatio::new(4, 3))),
        ("5:4", Some(CropRatio::new(5, 4))),
        ("7:5", Some(CropRatio::new(7, 5))),
        ("14:9", Some(CropRatio::new(14, 9))),
        ("16:9", Some(CropRatio::new(16, 9))),
    ];

    /// Look a preset up by its label
    pub fn preset(name: &str) -> Option<Option<CropRatio>> {
        Self::PRESETS
            .iter()
            .find(|(label, _)| *label == name)
            .map(|(_, ratio)| *ratio)
    }
}

/// Crop rectangle being edited
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CropZone {
    pub width: f64,
    pub height: f64,
    pub ratio: Option<CropRatio>,
}

/// Central state of the editor that can be modified by commands
///
/// This struct acts as the single source of truth for the editing session.
/// Commands modify it and ask the attached canvas to redraw.
pub struct EditorState {
    /// Currently displayed raster, `None` before the first upload
    pub image: Option<ImageRef>,

    pub transform: Transform,

    pub effects: Effects,

    pub crop_zone: CropZone,

    /// Panel shown in the toolbar
    pub mode: ToolMode,

    /// Whether an editing toolbar is open
    pub toolbar_open: bool,

    /// Rendering collaborator, absent until the stage is mounted
    canvas: Option<Box<dyn Canvas>>,
}

impl EditorState {
    /// Create a new EditorState with default values and no canvas
    pub fn new() -> Self {
        Self::with_effects(Effects::default())
    }

    /// Create a state whose effects start from the given values
    pub fn with_effects(effects: Effects) -> Self {
        Self {
            image: None,
            transform: Transform::default(),
            effects,
            crop_zone: CropZone::default(),
            mode: ToolMode::None,
            toolbar_open: false,
            canvas: None,
        }
    }

    /// Attach the rendering collaborator
    pub fn attach_canvas(&mut self, canvas: Box<dyn Canvas>) {
        self.canvas = Some(canvas);
    }

    /// Detach and return the rendering collaborator
    pub fn detach_canvas(&mut self) -> Option<Box<dyn Canvas>> {
        self.canvas.take()
    }

    pub fn has_canvas(&self) -> bool {
        self.canvas.is_some()
    }

    /// Nodes currently on the canvas, empty when no canvas is attached
    pub fn canvas_objects(&self) -> Vec<DisplayObject> {
        self.canvas
            .as_ref()
            .map(|canvas| canvas.objects())
            .unwrap_or_default()
    }

    /// Re-attach annotation nodes; image nodes are skipped since the raster
    /// is driven by `image`
    pub fn attach_objects(&mut self, objects: &[DisplayObject]) -> Result<(), CanvasError> {
        if let Some(canvas) = self.canvas.as_mut() {
            for object in objects.iter().filter(|object| !object.is_image()) {
                canvas.attach(object.clone())?;
            }
        }
        Ok(())
    }

    /// Ask the canvas to draw once; a no-op without a canvas
    pub fn redraw(&mut self) -> Result<(), CanvasError> {
        match self.canvas.as_mut() {
            Some(canvas) => canvas.batch_draw(),
            None => Ok(()),
        }
    }

    /// Force the interactive scale back to the canonical value
    pub fn reset_scale(&mut self) {
        self.transform.scale = CANONICAL_SCALE;
    }

    /// Open, switch or close the toolbar for `mode`
    ///
    /// Selecting the active mode closes the toolbar; selecting another mode
    /// while open switches to it; selecting any mode while closed opens it.
    pub fn toggle_toolbar(&mut self, mode: ToolMode) {
        if self.mode == mode || !self.toolbar_open {
            self.toolbar_open = !self.toolbar_open;
        }
        self.mode = if self.mode == mode { ToolMode::None } else { mode };
    }

    pub fn close_toolbar(&mut self) {
        self.toolbar_open = false;
        self.mode = ToolMode::None;
    }

    /// Put the transform back to its defaults, keeping image and effects
    pub fn reset_image(&mut self) {
        self.transform = Transform::default();
    }

    pub fn reset_effects(&mut self) {
        self.effects = Effects::default();
    }
}

impl Default for EditorState {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EditorState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorState")
            .field("image", &self.image)
            .field("transform", &self.transform)
            .field("effects", &self.effects)
            .field("crop_zone", &self.crop_zone)
            .field("mode", &self.mode)
            .field("toolbar_open", &self.toolbar_open)
            .field("has_canvas", &self.canvas.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let state = EditorState::new();
        assert_eq!(state.image, None);
        assert_eq!(state.transform.scale, 1.0);
        assert_eq!(state.transform.angle, 0.0);
        assert_eq!(state.effects.pixelate, 1.0);
        assert_eq!(state.effects.tint_hex(), "#000000");
        assert!(!state.toolbar_open);
        assert_eq!(state.mode, ToolMode::None);
    }

    #[test]
    fn test_effect_snapshot_covers_every_param() {
        let effects = Effects::default();
        let snapshot = effects.snapshot();
        assert_eq!(snapshot.len(), EffectParam::ALL.len());
        assert_eq!(snapshot[0], EffectValue::new(EffectParam::Brightness, 0.0));
        assert_eq!(snapshot[9], EffectValue::new(EffectParam::Pixelate, 1.0));
    }

    #[test]
    fn test_effect_snapshot_apply_restores() {
        let mut effects = Effects::default();
        effects.brightness = 0.3;
        effects.set_tint_hex("#336699").unwrap();
        let snapshot = effects.snapshot();

        let mut other = Effects::default();
        other.apply(&snapshot);
        assert_eq!(other, effects);
        assert_eq!(other.tint_hex(), "#336699");
    }

    #[test]
    fn test_toggle_toolbar() {
        let mut state = EditorState::new();

        state.toggle_toolbar(ToolMode::Crop);
        assert!(state.toolbar_open);
        assert_eq!(state.mode, ToolMode::Crop);

        // Switching panels keeps the toolbar open
        state.toggle_toolbar(ToolMode::Effects);
        assert!(state.toolbar_open);
        assert_eq!(state.mode, ToolMode::Effects);

        // Same panel again closes it
        state.toggle_toolbar(ToolMode::Effects);
        assert!(!state.toolbar_open);
        assert_eq!(state.mode, ToolMode::None);
    }

    #[test]
    fn test_reset_image() {
        let mut state = EditorState::new();
        state.transform = Transform {
            angle: 90.0,
            scale: 2.5,
            flip_x: true,
            flip_y: true,
        };
        state.reset_image();
        assert_eq!(state.transform, Transform::default());
    }

    #[test]
    fn test_crop_presets() {
        assert_eq!(CropRatio::preset("custom"), Some(None));
        assert_eq!(CropRatio::preset("16:9"), Some(Some(CropRatio::new(16, 9))));
        assert_eq!(CropRatio::preset("2:1"), None);
    }

    #[test]
    fn test_redraw_without_canvas_is_noop() {
        let mut state = EditorState::new();
        assert!(state.redraw().is_ok());
        assert!(state.canvas_objects().is_empty());
    }
}
