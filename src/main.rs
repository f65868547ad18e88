use image_editor_core::{
    Canvas, CanvasError, CommandResult, DisplayObject, EditorConfig, EditorSession, EditorState,
    EffectParam, ImageRef, ObjectKind, create_flags_channel, latest_flags,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const FLAGS_CHANNEL_CAPACITY: usize = 64;

/// Stand-in for the host scene graph: logs draws and keeps a node list
struct LoggingCanvas {
    objects: Vec<DisplayObject>,
    draws: usize,
}

impl Canvas for LoggingCanvas {
    fn batch_draw(&mut self) -> Result<(), CanvasError> {
        self.draws += 1;
        info!(draw = self.draws, nodes = self.objects.len(), "batch draw");
        Ok(())
    }

    fn attach(&mut self, object: DisplayObject) -> Result<(), CanvasError> {
        if !self.objects.iter().any(|existing| existing.id == object.id) {
            self.objects.push(object);
        }
        Ok(())
    }

    fn objects(&self) -> Vec<DisplayObject> {
        self.objects.clone()
    }
}

/// Perform one scripted toolbar gesture
fn run_step(session: &mut EditorSession, label: &str) -> CommandResult<()> {
    match label {
        "rotate right" => session.rotate_right(),
        "flip x" => session.flip_x(),
        "brightness drag" => {
            session.begin_effect_adjustment();
            for tick in 1..=5 {
                session.preview_effect(EffectParam::Brightness, f64::from(tick) * 0.05)?;
            }
            session.finish_effect_adjustment().map(|_| ())
        }
        "tint pick" => session.pick_tint("#ff8800"),
        "crop" => session.crop(ImageRef::new("blob:cropped")),
        "undo" => session.undo().map(|_| ()),
        "redo" => session.redo().map(|_| ()),
        _ => Ok(()),
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = EditorConfig::default_path()
        .map(|path| EditorConfig::load_or_default(&path))
        .unwrap_or_default();

    let mut state = EditorState::with_effects(config.effects_defaults);
    state.attach_canvas(Box::new(LoggingCanvas {
        objects: vec![
            DisplayObject::new(ObjectKind::Image),
            DisplayObject::new(ObjectKind::Text),
        ],
        draws: 0,
    }));

    let mut session = EditorSession::with_state(state, config);
    let (sender, mut flags_rx) = create_flags_channel(FLAGS_CHANNEL_CAPACITY);
    session.set_listener(Box::new(sender));
    session.open_image(ImageRef::new("blob:upload"));

    let steps = [
        "rotate right",
        "flip x",
        "brightness drag",
        "tint pick",
        "crop",
        "undo",
        "undo",
        "redo",
    ];

    for label in steps {
        if let Err(err) = run_step(&mut session, label) {
            error!(step = label, error = %err, "step failed");
            continue;
        }
        let flags = latest_flags(&mut flags_rx).unwrap_or_else(|| session.flags());
        info!(
            step = label,
            can_undo = flags.can_undo,
            can_redo = flags.can_redo,
            angle = session.state().transform.angle,
            brightness = session.state().effects.brightness,
            "step done"
        );
    }

    match serde_json::to_string_pretty(&session.history().summary()) {
        Ok(summary) => println!("{}", summary),
        Err(err) => error!(error = %err, "failed to serialize history summary"),
    }
}
