use std::collections::VecDeque;
use std::io::{self, BufRead};
use std::sync::{mpsc, Arc};
use std::thread;

use anyhow::Context;
use engine_logging::{engine_error, engine_info};
use medibot_core::{update, AppState, Effect, Msg};
use medibot_engine::{EngineHandle, UnsupportedRecognizer};

use super::config;
use super::effects::{AppEventSink, EffectRunner};
use super::input::line_to_msgs;
use super::render::TerminalRenderer;

/// Everything the main loop reacts to.
#[derive(Debug)]
pub enum AppEvent {
    /// A line typed on stdin.
    Line(String),
    /// A message produced by the engine.
    Msg(Msg),
    /// Stdin reached end of file.
    InputClosed,
}

pub fn run_app() -> anyhow::Result<()> {
    let config_path = config::config_path();
    let config = config::load(&config_path)
        .with_context(|| format!("loading configuration from {}", config_path.display()))?;
    engine_logging::initialize(&config.log_settings()?);
    engine_info!(
        "medibot starting endpoint={} config={:?}",
        config.endpoint,
        config_path
    );

    let (event_tx, event_rx) = mpsc::channel::<AppEvent>();
    let sink = Arc::new(AppEventSink::new(event_tx.clone()));
    // Terminals have no speech engine; /voice reports the capability as missing.
    let engine = EngineHandle::new(config.engine_config(), Arc::new(UnsupportedRecognizer), sink);
    let runner = EffectRunner::new(engine);

    spawn_stdin_reader(event_tx);

    let mut renderer = TerminalRenderer::new(io::stdout(), config.booking_url.clone());
    let mut state = AppState::new();
    renderer.render_header().context("writing to terminal")?;
    renderer
        .render(&state.view())
        .context("writing to terminal")?;

    while let Ok(event) = event_rx.recv() {
        let inbox = match event {
            AppEvent::Line(line) => line_to_msgs(&state.view(), &line),
            AppEvent::Msg(msg) => vec![msg],
            AppEvent::InputClosed => vec![Msg::SessionClosed],
        };

        let mut notified = false;
        let mut queue = VecDeque::from(inbox);
        while let Some(msg) = queue.pop_front() {
            let (next, effects) = update(std::mem::take(&mut state), msg);
            state = next;

            let output = runner.run(effects);
            for effect in &output.presentation {
                notified |= matches!(effect, Effect::NotifyUser { .. });
                renderer.apply(effect).context("writing to terminal")?;
            }
            queue.extend(output.follow_ups);
        }

        if state.consume_dirty() || notified {
            renderer
                .render(&state.view())
                .context("writing to terminal")?;
        }
        if state.is_closed() {
            break;
        }
    }

    engine_info!("medibot exiting");
    Ok(())
}

fn spawn_stdin_reader(tx: mpsc::Sender<AppEvent>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(err) => {
                    engine_error!("Reading stdin failed: {}", err);
                    break;
                }
            };
            if tx.send(AppEvent::Line(line)).is_err() {
                return;
            }
        }
        let _ = tx.send(AppEvent::InputClosed);
    });
}
