use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use image_editor_core::{
    Canvas, CanvasError, Command, CommandHistory, DisplayObject, EditorState, EffectCommand,
    EffectParam, Effects, FlipCommand, RotationCommand, create_flags_channel, latest_flags,
};

/// Canvas that only counts draws, so the numbers measure the engine
#[derive(Default)]
struct NullCanvas {
    draws: u64,
}

impl Canvas for NullCanvas {
    fn batch_draw(&mut self) -> Result<(), CanvasError> {
        self.draws += 1;
        Ok(())
    }

    fn attach(&mut self, _object: DisplayObject) -> Result<(), CanvasError> {
        Ok(())
    }

    fn objects(&self) -> Vec<DisplayObject> {
        Vec::new()
    }
}

fn create_state() -> EditorState {
    let mut state = EditorState::new();
    state.attach_canvas(Box::new(NullCanvas::default()));
    state
}

fn rotate(step: usize) -> Command {
    let angle = (step % 4) as f64 * 90.0;
    RotationCommand::new(angle, angle + 90.0, 1.0, 1.0).into()
}

/// Recording cost: push onto a bounded and an unbounded history
fn bench_push(c: &mut Criterion) {
    let mut group = c.benchmark_group("history_push");

    for max_depth in [None, Some(100)] {
        let label = match max_depth {
            Some(depth) => format!("depth_{}", depth),
            None => "unbounded".to_string(),
        };
        group.bench_with_input(BenchmarkId::from_parameter(label), &max_depth, |b, &depth| {
            b.iter(|| {
                let mut history = match depth {
                    Some(depth) => CommandHistory::with_max_depth(depth),
                    None => CommandHistory::new(),
                };
                for step in 0..1_000 {
                    history.push(rotate(step));
                }
                black_box(history.undo_count());
            });
        });
    }
    group.finish();
}

/// Undo then redo the whole stack
fn bench_undo_redo_cycle(c: &mut Criterion) {
    let mut group = c.benchmark_group("undo_redo_cycle");

    for depth in [10usize, 100, 1_000] {
        let mut state = create_state();
        let mut history = CommandHistory::new();
        for step in 0..depth {
            let command = if step % 2 == 0 {
                rotate(step)
            } else {
                FlipCommand::horizontal().into()
            };
            history.execute(command, &mut state).ok();
        }

        group.bench_with_input(BenchmarkId::from_parameter(depth), &depth, |b, _| {
            b.iter(|| {
                while let Ok(Some(name)) = history.undo(&mut state) {
                    black_box(name);
                }
                while let Ok(Some(name)) = history.redo(&mut state) {
                    black_box(name);
                }
            });
        });
    }
    group.finish();
}

/// Applying a full effect snapshot, the heaviest per-command payload
fn bench_effect_execute(c: &mut Criterion) {
    let mut state = create_state();
    let mut history = CommandHistory::new();
    let mut target = Effects::default();
    for (i, param) in EffectParam::ALL.iter().enumerate() {
        target.set(*param, i as f64 * 0.1);
    }
    let command: Command =
        EffectCommand::new(Effects::default().snapshot(), target.snapshot()).into();

    c.bench_function("effect_execute_undo", |b| {
        b.iter(|| {
            command.execute(&mut state, &mut history).ok();
            command.undo(&mut state, &mut history).ok();
            black_box(state.effects.hue);
        });
    });
}

/// Flag publication through the UI channel
fn bench_flags_channel(c: &mut Criterion) {
    let mut state = create_state();
    let mut history = CommandHistory::new();
    let (sender, mut flags_rx) = create_flags_channel(64);
    history.set_listener(Box::new(sender));

    c.bench_function("flags_publish_and_drain", |b| {
        b.iter(|| {
            history
                .execute(FlipCommand::vertical().into(), &mut state)
                .ok();
            history.undo(&mut state).ok();
            black_box(latest_flags(&mut flags_rx));
        });
    });
}

criterion_group!(
    benches,
    bench_push,
    bench_undo_redo_cycle,
    bench_effect_execute,
    bench_flags_channel
);

criterion_main!(benches);
