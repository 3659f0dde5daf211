use std::sync::Arc;

use services::{QuizEngine, StageChange, TimerHandle};
use storage::{HttpPoolLoader, JsonDirLoader, PoolLoader};
use tokio::io::{AsyncWriteExt, Stdout};
use tokio::sync::mpsc::UnboundedReceiver;
use ui::vm::QuizScreenVm;
use ui::{QuizIntent, map_quiz_screen, render_screen};

mod args;
mod input;
mod logging;

use args::{Args, PoolSource, print_usage};
use input::{InputGate, InputLine, spawn_stdin_reader};

const SEPARATOR: &str = "----------------------------------------";

async fn draw(stdout: &mut Stdout, screen: &QuizScreenVm) -> std::io::Result<()> {
    let text = format!("{SEPARATOR}\n{}", render_screen(screen));
    stdout.write_all(text.as_bytes()).await?;
    stdout.flush().await
}

/// Resolves with the handle once its deadline passes; never resolves without one.
async fn advance_due(pending: Option<TimerHandle>) -> TimerHandle {
    match pending {
        Some(handle) => {
            handle.elapsed().await;
            handle
        }
        None => std::future::pending().await,
    }
}

fn build_loader(
    source: PoolSource,
    http_timeout: std::time::Duration,
) -> Result<Arc<dyn PoolLoader>, Box<dyn std::error::Error>> {
    let loader: Arc<dyn PoolLoader> = match source {
        PoolSource::Dir(dir) => {
            tracing::info!(dir = %dir.display(), "loading questions from directory");
            Arc::new(JsonDirLoader::new(dir))
        }
        PoolSource::Url(url) => {
            tracing::info!(%url, "loading questions over http");
            Arc::new(HttpPoolLoader::new(&url)?.with_timeout(http_timeout))
        }
    };
    Ok(loader)
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let parsed = Args::parse(std::env::args().skip(1), |key| std::env::var(key).ok()).map_err(
        |e| {
            eprintln!("{e}");
            print_usage();
            e
        },
    )?;
    let Some(parsed) = parsed else {
        print_usage();
        return Ok(());
    };

    logging::init_tracing();

    let loader = build_loader(parsed.source, parsed.http_timeout)?;
    let mut stdout = tokio::io::stdout();
    let mut input = spawn_stdin_reader();

    draw(&mut stdout, &QuizScreenVm::Loading).await?;
    let mut engine = QuizEngine::start(loader, parsed.config).await;
    let gate = InputGate::opened_now();
    draw(&mut stdout, &map_quiz_screen(&engine.view())).await?;

    let result = event_loop(&mut engine, &mut stdout, &mut input, gate).await;
    engine.dispose();
    result?;
    Ok(())
}

/// Dispatch input lines and auto-advance deadlines to the engine, one at a time.
///
/// Lines typed while a pool was loading are dropped.
async fn event_loop(
    engine: &mut QuizEngine,
    stdout: &mut Stdout,
    input: &mut UnboundedReceiver<InputLine>,
    mut gate: InputGate,
) -> std::io::Result<()> {
    loop {
        let pending = engine.pending_advance();
        tokio::select! {
            handle = advance_due(pending) => {
                if engine.fire(handle) {
                    draw(stdout, &map_quiz_screen(&engine.view())).await?;
                }
            }
            line = input.recv() => {
                let Some(line) = line else {
                    return Ok(());
                };
                if !gate.admits(&line) {
                    tracing::debug!(input = %line.text.trim(), "input typed during load dropped");
                    continue;
                }
                let Some(intent) = QuizIntent::parse(&line.text) else {
                    tracing::debug!(input = %line.text.trim(), "unrecognized input");
                    continue;
                };
                match intent {
                    QuizIntent::Quit => return Ok(()),
                    QuizIntent::Select(index) => {
                        engine.select_answer(index);
                    }
                    QuizIntent::Restart => {
                        engine.restart();
                    }
                    QuizIntent::Continue => {
                        if engine.outcome().is_some_and(|o| o.stage.next().is_some()) {
                            draw(stdout, &QuizScreenVm::Loading).await?;
                        }
                        if let StageChange::Advanced(_) = engine.advance_stage().await {
                            gate.reopen();
                        }
                    }
                }
                draw(stdout, &map_quiz_screen(&engine.view())).await?;
            }
        }
    }
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
