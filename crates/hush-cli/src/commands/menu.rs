//! Numbered menu shown when `hs` runs without a subcommand.

use std::io::{self, BufRead, Write};

use crate::commands::{config, session, stats};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MainChoice {
    Breathe,
    Break,
    BoxBreathing,
    Stats,
    Settings,
    Quit,
}

const MAIN_ITEMS: [(MainChoice, &str); 6] = [
    (MainChoice::Breathe, "Breath Awareness   guided breathing with a visual pacer"),
    (MainChoice::Break, "Mindful Break      a short mindfulness pause"),
    (MainChoice::BoxBreathing, "Box Breathing      inhale, hold, exhale, hold"),
    (MainChoice::Stats, "View Stats         see your meditation history"),
    (MainChoice::Settings, "Settings           view configuration"),
    (MainChoice::Quit, "Quit"),
];

const DURATIONS: [(u64, &str); 5] = [
    (60, "1 minute"),
    (180, "3 minutes"),
    (300, "5 minutes"),
    (600, "10 minutes"),
    (900, "15 minutes"),
];

const ROUNDS: [(u32, &str); 4] = [(2, "2 rounds"), (4, "4 rounds"), (6, "6 rounds"), (8, "8 rounds")];

/// 1-based selection from `count` items. Blank or invalid input is `None`.
fn parse_choice(line: &str, count: usize) -> Option<usize> {
    let n: usize = line.trim().parse().ok()?;
    (1..=count).contains(&n).then(|| n - 1)
}

/// Print a numbered list and read until a valid choice or end of input.
fn prompt<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    title: &str,
    labels: &[&str],
) -> io::Result<Option<usize>> {
    writeln!(out)?;
    writeln!(out, "  {title}")?;
    for (i, label) in labels.iter().enumerate() {
        writeln!(out, "  {}. {label}", i + 1)?;
    }
    loop {
        write!(out, "  > ")?;
        out.flush()?;
        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            writeln!(out)?;
            return Ok(None);
        }
        match parse_choice(&line, labels.len()) {
            Some(choice) => return Ok(Some(choice)),
            None => writeln!(out, "  Pick 1-{}.", labels.len())?,
        }
    }
}

/// Ask for one main-menu action; info screens return to the menu.
fn choose<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> io::Result<Option<MainChoice>> {
    let labels: Vec<&str> = MAIN_ITEMS.iter().map(|(_, label)| *label).collect();
    Ok(prompt(input, out, "hush", &labels)?.map(|i| MAIN_ITEMS[i].0))
}

fn pick_duration<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> io::Result<Option<u64>> {
    let labels: Vec<&str> = DURATIONS.iter().map(|(_, label)| *label).collect();
    Ok(prompt(input, out, "How long?", &labels)?.map(|i| DURATIONS[i].0))
}

fn pick_rounds<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> io::Result<Option<u32>> {
    let labels: Vec<&str> = ROUNDS.iter().map(|(_, label)| *label).collect();
    Ok(prompt(input, out, "How many rounds?", &labels)?.map(|i| ROUNDS[i].0))
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let stdin = io::stdin();
    let mut out = io::stdout();

    loop {
        // The lock is released before a session starts; the session's own
        // input reader needs stdin.
        let mut input = stdin.lock();
        let Some(choice) = choose(&mut input, &mut out)? else {
            return Ok(());
        };
        match choice {
            MainChoice::Breathe => {
                let Some(secs) = pick_duration(&mut input, &mut out)? else {
                    return Ok(());
                };
                drop(input);
                return session::breathe_for(secs, session::default_pattern()?, true);
            }
            MainChoice::Break => {
                let Some(secs) = pick_duration(&mut input, &mut out)? else {
                    return Ok(());
                };
                drop(input);
                return session::break_for(secs, true);
            }
            MainChoice::BoxBreathing => {
                let Some(rounds) = pick_rounds(&mut input, &mut out)? else {
                    return Ok(());
                };
                drop(input);
                return session::box_breathing(rounds, true);
            }
            MainChoice::Stats => stats::run(false)?,
            MainChoice::Settings => config::run(config::ConfigAction::List)?,
            MainChoice::Quit => return Ok(()),
        }
    }
}
