//! Line-oriented terminal front end.
//!
//! Type a card number to turn it over, `r` to restart, `m` to toggle mute,
//! `t <secs>` to change the round length, `q` to quit. Wall-clock time
//! between commands is fed to the controller before each command runs.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use memory_match::{
    format_clock, Card, CardId, ControllerPhase, GameRng, JsonFilePreferences, RoundConfig,
    RoundController, RoundObserver, ThemeCatalog, ThemeChoice,
};

#[derive(Parser)]
#[command(about = "Play a round of memory match in the terminal")]
struct Args {
    /// Pairs to deal
    #[arg(long, default_value_t = memory_match::core::DEFAULT_PAIRS)]
    pairs: usize,

    /// Round length in seconds
    #[arg(long, default_value_t = memory_match::core::DEFAULT_DURATION_SECS)]
    seconds: u32,

    /// Theme key (animals, fruits, sweets, sea) or "random"
    #[arg(long, default_value = "random")]
    theme: String,

    /// RNG seed for a reproducible board
    #[arg(long)]
    seed: Option<u64>,

    /// Milliseconds a mismatched pair stays face up
    #[arg(long, default_value_t = memory_match::core::DEFAULT_CONCEAL_DELAY_MS)]
    conceal_ms: u64,

    /// Preference file for the mute flag
    #[arg(long)]
    prefs: Option<PathBuf>,
}

/// Prints round events as text lines.
struct TerminalObserver;

impl RoundObserver for TerminalObserver {
    fn on_board_ready(&mut self, cards: &[Card]) {
        println!("New board: {} cards", cards.len());
    }

    fn on_match(&mut self, first: &Card, second: &Card) {
        println!("Match! {} and {}", first.id.index(), second.id.index());
    }

    fn on_mismatch(&mut self, first: &Card, second: &Card) {
        println!("No match: {} and {}", first.id.index(), second.id.index());
    }

    fn on_score_changed(&mut self, score: u32) {
        println!("Score: {score}");
    }

    fn on_round_won(&mut self, final_score: u32) {
        println!("Victory! Final score {final_score}. Press r to play again.");
    }

    fn on_round_timed_out(&mut self, final_score: u32) {
        println!("Time's up! Final score {final_score}. Press r to play again.");
    }

    fn on_timer_started(&mut self, seconds: u32) {
        println!("Clock: {}", format_clock(seconds));
    }

    fn on_mute_changed(&mut self, muted: bool) {
        println!("{}", if muted { "Muted" } else { "Sound on" });
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(env_filter)
        .init();
}

fn render(controller: &RoundController<TerminalObserver>) {
    let Some(theme) = controller.theme() else {
        return;
    };
    let width = (controller.cards().len() as f64).sqrt().ceil().max(1.0) as usize;

    for row in controller.cards().chunks(width) {
        let line: Vec<String> = row
            .iter()
            .map(|card| {
                let face = if card.revealed {
                    theme.glyph(card.symbol).unwrap_or("?")
                } else {
                    "❓"
                };
                format!("{:>2}:{face}", card.id.index())
            })
            .collect();
        println!("{}", line.join("  "));
    }

    if let Some(round) = controller.round_state() {
        println!(
            "[{}] {}  score {}  pairs {} / {}",
            theme.name(),
            format_clock(round.time_remaining),
            round.score,
            round.matched_pairs,
            round.total_pairs
        );
    }
}

/// Run one command. Returns false to quit.
fn handle(controller: &mut RoundController<TerminalObserver>, line: &str) -> memory_match::Result<bool> {
    let mut words = line.split_whitespace();
    match words.next() {
        None => {}
        Some("q") => return Ok(false),
        Some("r") => {
            controller.restart_round()?;
        }
        Some("m") => {
            controller.toggle_muted()?;
        }
        Some("t") => match words.next().and_then(|w| w.parse().ok()) {
            Some(secs) => controller.set_round_duration(secs)?,
            None => println!("usage: t <seconds>"),
        },
        Some(word) => match word.parse::<u16>() {
            Ok(index) => {
                controller.select_card(CardId::new(index));
            }
            Err(_) => println!("commands: <card number>, r, m, t <secs>, q"),
        },
    }
    Ok(true)
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let args = Args::parse();

    let catalog = ThemeCatalog::builtin();
    let theme = if args.theme == "random" {
        ThemeChoice::Random
    } else {
        ThemeChoice::Fixed(catalog.require(&args.theme)?.clone())
    };
    let config = RoundConfig::new(theme)
        .with_pairs(args.pairs)
        .with_duration_secs(args.seconds)
        .with_conceal_delay_ms(args.conceal_ms);

    let rng = args.seed.map_or_else(GameRng::from_entropy, GameRng::new);
    let mut controller = RoundController::with_rng(TerminalObserver, rng).with_catalog(catalog);
    if let Some(path) = args.prefs {
        controller = controller.with_preferences(JsonFilePreferences::new(path));
    }

    controller.start_round(config).context("invalid round configuration")?;
    render(&controller);

    let stdin = io::stdin();
    let mut last = Instant::now();
    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        let now = Instant::now();
        let elapsed = u64::try_from(now.duration_since(last).as_millis()).unwrap_or(u64::MAX);
        last = now;
        controller.advance(elapsed);

        let keep_going = match handle(&mut controller, line.trim()) {
            Ok(keep_going) => keep_going,
            Err(err) => {
                println!("error: {err}");
                true
            }
        };
        if !keep_going {
            break;
        }
        if controller.phase() != ControllerPhase::Idle {
            render(&controller);
        }
    }

    Ok(())
}
