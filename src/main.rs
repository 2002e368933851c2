mod display;

use std::collections::HashMap;
use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{mpsc, Mutex};
use std::thread;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    style::Color,
    terminal, ExecutableCommand,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

use display::Viewport;
use space_invaders::compute::{init_state, set_controls, tick};
use space_invaders::config::{Difficulty, SessionParams};
use space_invaders::constants::TICK_MS;
use space_invaders::entities::{Controls, GameEvent, GameStatus};
use space_invaders::snapshot::Snapshot;

const FRAME: Duration = Duration::from_millis(33); // ≈30 FPS

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames.  Covers terminals that don't emit key-release events:
/// the OS key-repeat rate is ≥ 15 Hz, so a window of 4 frames (≈133 ms) is
/// always refreshed before expiry.
const HOLD_WINDOW: u64 = 4;

#[derive(Parser, Debug)]
#[command(about = "Space Invaders in the terminal: clear the wave, then beat the boss")]
struct Opts {
    /// Start straight into a match at this difficulty, skipping the menu.
    #[arg(long, value_enum)]
    difficulty: Option<Difficulty>,
    /// Custom session parameters (JSON); skips the menu.
    #[arg(long, conflicts_with = "difficulty")]
    params: Option<PathBuf>,
    /// Fixed RNG seed for reproducible enemy fire.  Defaults to the clock.
    #[arg(long)]
    seed: Option<u64>,
    /// Where to write the log; the terminal itself is taken by the game.
    #[arg(long, default_value = "invaders.log")]
    log_file: PathBuf,
}

/// Returns true if `key` was seen within the last `HOLD_WINDOW` frames.
fn is_held(key_frame: &HashMap<KeyCode, u64>, key: &KeyCode, frame: u64) -> bool {
    key_frame
        .get(key)
        .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
        .unwrap_or(false)
}

fn viewport() -> std::io::Result<Viewport> {
    let (width, height) = terminal::size()?;
    Ok(Viewport { width, height })
}

/// Block until one of the given keys is pressed; returns its index.
fn wait_for(rx: &mpsc::Receiver<Event>, keys: &[&[KeyCode]]) -> Option<usize> {
    loop {
        let Ok(event) = rx.recv() else {
            return None;
        };
        if let Event::Key(KeyEvent {
            code,
            kind: KeyEventKind::Press,
            ..
        }) = event
        {
            if let Some(i) = keys.iter().position(|group| group.contains(&code)) {
                return Some(i);
            }
        }
    }
}

fn quit_keys() -> &'static [KeyCode] {
    &[KeyCode::Char('q'), KeyCode::Char('Q'), KeyCode::Esc]
}

// ── Session setup ─────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
struct Session {
    label: String,
    params: SessionParams,
}

impl Session {
    fn preset(difficulty: Difficulty) -> Self {
        Session {
            label: difficulty.label().to_string(),
            params: difficulty.params(),
        }
    }
}

// ── Screens ───────────────────────────────────────────────────────────────────

enum MenuChoice {
    Play,
    Instructions,
    Quit,
}

fn main_menu<W: Write>(out: &mut W, rx: &mpsc::Receiver<Event>) -> Result<MenuChoice> {
    let body = vec![
        "[1] Start Game".to_string(),
        "[2] Instructions".to_string(),
        "[Q] Quit".to_string(),
    ];
    display::draw_screen(
        out,
        viewport()?,
        "★  SPACE  INVADERS  ★",
        Color::Cyan,
        &body,
        "Press a key to choose",
    )?;
    let choice = wait_for(
        rx,
        &[&[KeyCode::Char('1'), KeyCode::Enter], &[KeyCode::Char('2')], quit_keys()],
    );
    Ok(match choice {
        Some(0) => MenuChoice::Play,
        Some(1) => MenuChoice::Instructions,
        _ => MenuChoice::Quit,
    })
}

/// `None` means "back to the main menu".
fn select_difficulty<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
) -> Result<Option<Difficulty>> {
    let mut body: Vec<String> = Difficulty::ALL
        .iter()
        .enumerate()
        .map(|(i, d)| {
            let p = d.params();
            format!(
                "[{}] {:<10}  boss health {:>2}, enemy fire every {:>3} ms",
                i + 1,
                d.label(),
                p.boss_health,
                p.enemy_fire_ms
            )
        })
        .collect();
    body.push(String::new());
    body.push("[B] Back".to_string());
    display::draw_screen(
        out,
        viewport()?,
        "Select difficulty",
        Color::Yellow,
        &body,
        "",
    )?;

    let choice = wait_for(
        rx,
        &[
            &[KeyCode::Char('1')],
            &[KeyCode::Char('2')],
            &[KeyCode::Char('3')],
            &[KeyCode::Char('4')],
            &[KeyCode::Char('b'), KeyCode::Char('B'), KeyCode::Esc],
        ],
    );
    Ok(choice.and_then(|i| Difficulty::ALL.get(i).copied()))
}

fn instructions<W: Write>(out: &mut W, rx: &mpsc::Receiver<Event>) -> Result<()> {
    let body = [
        "Destroy every invader before the formation reaches you.",
        "Once the wave is cleared the boss arrives: it fires three",
        "bullets at a time and takes many hits to bring down.",
        "",
        "You have three ships.  A hit costs one, and a new ship",
        "arrives after a short pause.  Lose them all and it's over.",
        "",
        "← → / A D : Move     SPACE : Shoot",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect::<Vec<_>>();
    display::draw_screen(
        out,
        viewport()?,
        "How to play",
        Color::Cyan,
        &body,
        "[B] Back",
    )?;
    wait_for(rx, &[&[KeyCode::Char('b'), KeyCode::Char('B'), KeyCode::Esc, KeyCode::Enter]]);
    Ok(())
}

enum AfterMatch {
    Again,
    Menu,
    Quit,
}

fn end_screen<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    won: bool,
) -> Result<AfterMatch> {
    let (title, color, again) = if won {
        ("★  CONGRATULATIONS — YOU WIN  ★", Color::Yellow, "[P] Play again")
    } else {
        ("✖  GAME  OVER  ✖", Color::Red, "[R] Retry")
    };
    let body = vec![again.to_string(), "[M] Return to menu".to_string(), "[Q] Quit".to_string()];
    display::draw_screen(out, viewport()?, title, color, &body, "")?;

    let again_keys: &[KeyCode] = if won {
        &[KeyCode::Char('p'), KeyCode::Char('P')]
    } else {
        &[KeyCode::Char('r'), KeyCode::Char('R')]
    };
    let choice = wait_for(
        rx,
        &[again_keys, &[KeyCode::Char('m'), KeyCode::Char('M')], quit_keys()],
    );
    Ok(match choice {
        Some(0) => AfterMatch::Again,
        Some(1) => AfterMatch::Menu,
        _ => AfterMatch::Quit,
    })
}

// ── Game loop ─────────────────────────────────────────────────────────────────

enum MatchResult {
    Won,
    Lost,
    Quit,
}

/// Input model: instead of acting on each key event individually, we maintain
/// a `key_frame` map that records the frame number of the last press/repeat
/// event for every key.  Each frame the keys still "fresh" become the held
/// `Controls` the simulation reads.
///
/// Timing model: the simulation advances in fixed `TICK_MS` steps; wall-clock
/// time since the last frame is accumulated and consumed in whole steps, so
/// the game runs at the same speed whatever the render rate.
fn game_loop<W: Write>(
    out: &mut W,
    session: &Session,
    seed: u64,
    rx: &mpsc::Receiver<Event>,
) -> Result<MatchResult> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut state = init_state(session.params);
    info!(difficulty = %session.label, seed, params = ?session.params, "match started");

    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut frame: u64 = 0;
    let step = Duration::from_millis(TICK_MS as u64);
    let mut backlog = Duration::ZERO;
    let mut last = Instant::now();

    loop {
        let frame_start = Instant::now();
        frame += 1;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(ev) = rx.try_recv() {
            let Event::Key(KeyEvent {
                code,
                kind,
                modifiers,
                ..
            }) = ev
            else {
                continue;
            };
            match kind {
                KeyEventKind::Press => {
                    key_frame.insert(code, frame);
                    match code {
                        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                            info!("match abandoned");
                            return Ok(MatchResult::Quit);
                        }
                        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                            return Ok(MatchResult::Quit);
                        }
                        _ => {}
                    }
                }
                KeyEventKind::Repeat => {
                    key_frame.insert(code, frame);
                }
                KeyEventKind::Release => {
                    key_frame.remove(&code);
                }
            }
        }

        let held = |keys: &[KeyCode]| keys.iter().any(|k| is_held(&key_frame, k, frame));
        let controls = Controls {
            left: held(&[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')]),
            right: held(&[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')]),
            fire: held(&[KeyCode::Char(' ')]),
        };
        state = set_controls(&state, controls);

        // ── Advance the simulation in fixed steps ─────────────────────────────
        let now = Instant::now();
        backlog += now - last;
        last = now;
        while backlog >= step {
            backlog -= step;
            state = tick(&state, &mut rng);
            for event in &state.events {
                match event {
                    GameEvent::MatchWon | GameEvent::MatchLost => {}
                    other => debug!(frame = state.frame, event = ?other, "game event"),
                }
            }
            if state.status != GameStatus::Playing {
                break;
            }
        }

        display::render(out, viewport()?, &Snapshot::of(&state), &session.label)?;

        match state.status {
            GameStatus::Won => return Ok(MatchResult::Won),
            GameStatus::Lost => return Ok(MatchResult::Lost),
            GameStatus::Playing => {}
        }

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            std::thread::sleep(FRAME - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create log file: {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::filter::EnvFilter::from_default_env())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default()
}

fn main() -> Result<()> {
    let opts = Opts::parse();
    init_logging(&opts.log_file)?;

    // Resolve the session before touching the terminal so errors print normally.
    let direct = match (&opts.params, opts.difficulty) {
        (Some(path), _) => Some(Session {
            label: "Custom".to_string(),
            params: SessionParams::load(path)
                .with_context(|| format!("invalid session parameters: {}", path.display()))?,
        }),
        (None, Some(difficulty)) => Some(Session::preset(difficulty)),
        (None, None) => None,
    };

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Kitty-protocol terminals support this; others fall back gracefully.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break; // receiver dropped → program exiting
            }
        }
    });

    let result = run(&mut out, &rx, direct, opts.seed);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}

fn run<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    mut next: Option<Session>,
    seed: Option<u64>,
) -> Result<()> {
    loop {
        let session = match next.take() {
            Some(session) => session,
            None => match main_menu(out, rx)? {
                MenuChoice::Quit => break,
                MenuChoice::Instructions => {
                    instructions(out, rx)?;
                    continue;
                }
                MenuChoice::Play => match select_difficulty(out, rx)? {
                    Some(difficulty) => Session::preset(difficulty),
                    None => continue,
                },
            },
        };

        let won = match game_loop(out, &session, seed.unwrap_or_else(clock_seed), rx)? {
            MatchResult::Quit => break,
            MatchResult::Won => true,
            MatchResult::Lost => false,
        };

        match end_screen(out, rx, won)? {
            AfterMatch::Quit => break,
            AfterMatch::Menu => {}
            // Winning leads back to difficulty selection, a loss retries as-is.
            AfterMatch::Again if won => {
                if let Some(difficulty) = select_difficulty(out, rx)? {
                    next = Some(Session::preset(difficulty));
                }
            }
            AfterMatch::Again => next = Some(session),
        }
    }
    Ok(())
}
