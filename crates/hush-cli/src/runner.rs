//! Interactive session loop.
//!
//! One thread owns the session and the pacer and polls both at their next
//! deadline. A helper thread reads stdin lines and forwards them as
//! [`Intent`]s; it never touches engine state. When stdin closes the loop
//! keeps running on deadlines alone.

use std::io::{BufRead, IsTerminal, Write};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::Instant;

use hush_core::format::format_clock;
use hush_core::storage::Database;
use hush_core::{
    system_clock, BreathingPattern, Config, MeditationType, NewSession, Pacer, Session,
    SessionState,
};
use tracing::{debug, warn};

use crate::render::{Frame, Renderer};

/// Cancelled sessions shorter than this are not recorded.
const MIN_RECORDED_SECS: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Start,
    TogglePause,
    Cancel,
}

impl Intent {
    pub fn parse(line: &str) -> Option<Self> {
        match line.trim().to_ascii_lowercase().as_str() {
            "" | "s" | "start" => Some(Intent::Start),
            "p" | "pause" | "r" | "resume" => Some(Intent::TogglePause),
            "q" | "quit" | "x" => Some(Intent::Cancel),
            _ => None,
        }
    }
}

/// What to run.
#[derive(Debug, Clone)]
pub struct SessionPlan {
    pub kind: MeditationType,
    pub duration_secs: u64,
    pub pattern: BreathingPattern,
    pub intro: bool,
    /// Show a round counter of this many pattern cycles.
    pub rounds: Option<u64>,
}

fn spawn_input() -> Receiver<Intent> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if let Some(intent) = Intent::parse(&line) {
                if tx.send(intent).is_err() {
                    break;
                }
            }
        }
    });
    rx
}

/// Block until `deadline` or the next intent, whichever comes first.
///
/// Once stdin has closed `input` becomes `None`; a loop with no deadline and
/// no input would never wake, so that case reads as a cancel.
fn wait(input: &mut Option<Receiver<Intent>>, deadline: Option<Instant>) -> Option<Intent> {
    let Some(rx) = input.as_ref() else {
        match deadline {
            Some(d) => thread::sleep(d.saturating_duration_since(Instant::now())),
            None => return Some(Intent::Cancel),
        }
        return None;
    };

    let received = match deadline {
        Some(d) => rx.recv_timeout(d.saturating_duration_since(Instant::now())),
        None => rx.recv().map_err(|_| RecvTimeoutError::Disconnected),
    };
    match received {
        Ok(intent) => Some(intent),
        Err(RecvTimeoutError::Timeout) => None,
        Err(RecvTimeoutError::Disconnected) => {
            debug!("stdin closed");
            *input = None;
            None
        }
    }
}

fn earliest(a: Option<Instant>, b: Option<Instant>) -> Option<Instant> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    }
}

fn print_intro(plan: &SessionPlan) {
    println!();
    println!("  {}", plan.kind);
    println!();
    println!("  Meditation is simpler than you think:");
    println!("    1. Sit comfortably");
    println!("    2. Notice your breath");
    println!("    3. When your mind wanders, gently return");
    println!();
    println!(
        "  {} for {}. Type p + ENTER to pause or resume, q + ENTER to stop.",
        plan.pattern.name(),
        format_clock(plan.duration_secs as f64)
    );
    println!("  [Press ENTER to start]");
}

/// Run a session to completion or cancellation, then record it.
pub fn run(plan: SessionPlan) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let interactive = std::io::stdout().is_terminal();
    let renderer = Renderer::new(config.theme.theme(), interactive);

    let clock = system_clock();
    let mut session = Session::with_clock(plan.duration_secs, clock.clone(), ());
    let mut pacer = Pacer::new(plan.pattern.clone(), clock);
    let mut input = Some(spawn_input());

    if plan.intro {
        session.prepare();
        print_intro(&plan);
        loop {
            match wait(&mut input, None) {
                Some(Intent::Start) => break,
                Some(Intent::Cancel) if input.is_some() => {
                    println!("Session cancelled.");
                    return Ok(());
                }
                // stdin closed before anyone pressed ENTER: just begin.
                Some(Intent::Cancel) => break,
                _ => {}
            }
        }
    }

    session.start();
    pacer.start();
    if !interactive {
        println!("{} started ({}).", plan.kind, format_clock(plan.duration_secs as f64));
    }

    let title = plan.kind.as_str();
    let mut out = std::io::stdout();
    loop {
        if interactive {
            let cursor = pacer.cursor();
            let frame = Frame {
                title,
                state: session.state(),
                phase: cursor.phase(pacer.pattern()),
                cursor,
                remaining_secs: session.remaining_secs(),
                round: plan
                    .rounds
                    .map(|total| ((pacer.cycles_completed() + 1).min(total), total)),
            };
            write!(out, "\r\x1b[2K{}", renderer.line(&frame))?;
            out.flush()?;
        }

        if session.state() == SessionState::Complete {
            break;
        }

        let deadline = earliest(session.next_deadline(), pacer.next_deadline());
        match wait(&mut input, deadline) {
            Some(Intent::TogglePause) => {
                if session.pause() {
                    pacer.pause();
                } else if session.resume() {
                    pacer.resume();
                }
            }
            Some(Intent::Cancel) => {
                session.stop();
                break;
            }
            Some(Intent::Start) | None => {}
        }

        session.tick();
        pacer.tick();
    }
    pacer.stop();
    if interactive {
        println!();
    }

    record(&session, plan.kind);

    if session.is_full_completion() {
        println!();
        println!("Session complete.");
        println!("{}, {}", plan.kind, format_clock(session.elapsed_secs()));
    } else {
        println!();
        println!("Session ended after {}.", format_clock(session.elapsed_secs()));
    }
    Ok(())
}

/// Persist a finished session. Failures are reported but do not fail the run.
fn record(session: &Session, kind: MeditationType) {
    let Some(entry) = NewSession::from_session(session, kind) else {
        return;
    };
    if !entry.completed && session.elapsed_secs() < MIN_RECORDED_SECS {
        debug!("session too short to record");
        return;
    }
    match Database::open().and_then(|db| db.insert_session(&entry)) {
        Ok(_) => {}
        Err(e) => {
            warn!(error = %e, "could not record session");
            eprintln!("warning: session not saved: {e}");
        }
    }
}
