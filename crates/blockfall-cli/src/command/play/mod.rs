use std::{cell::RefCell, rc::Rc, time::Duration};

use anyhow::Context as _;
use blockfall_engine::{Board, GameSession, PieceSeed, SessionConfig};
use rand::Rng as _;

use self::{report::PlayReport, screens::TitleScreen};
use crate::tui::{Runtime, ScreenSwitcher};

mod input;
mod report;
mod screens;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    /// Frames (game ticks) per second
    #[clap(
        long,
        default_value_t = DEFAULT_FPS,
        value_parser = clap::value_parser!(u32).range(1..=240)
    )]
    pub(crate) fps: u32,
    /// Seed of the piece sequence as 32 hex digits [default: random]
    #[clap(long)]
    seed: Option<PieceSeed>,
    /// Board width in cells
    #[clap(long, default_value_t = Board::STANDARD_WIDTH)]
    width: u16,
    /// Board height in cells
    #[clap(long, default_value_t = Board::STANDARD_HEIGHT)]
    height: u16,
}

const DEFAULT_FPS: u32 = 25;

impl Default for PlayArg {
    fn default() -> Self {
        Self {
            fps: DEFAULT_FPS,
            seed: None,
            width: Board::STANDARD_WIDTH,
            height: Board::STANDARD_HEIGHT,
        }
    }
}

/// Everything a game screen needs to start a session.
#[derive(Debug, Clone)]
struct GameSetup {
    config: SessionConfig,
    fps: u32,
    report: Rc<RefCell<PlayReport>>,
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let PlayArg {
        fps,
        seed,
        width,
        height,
    } = *arg;

    let seed = seed.unwrap_or_else(|| rand::rng().random());
    let config = SessionConfig {
        width,
        height,
        seed: Some(seed),
    };
    // Catch a bad board size before the terminal is taken over.
    GameSession::new(config, Duration::ZERO)
        .with_context(|| format!("cannot play on a {width}x{height} board"))?;

    let report = Rc::new(RefCell::new(PlayReport::default()));
    let setup = GameSetup {
        config,
        fps,
        report: Rc::clone(&report),
    };
    let mut app = ScreenSwitcher::new(Box::new(TitleScreen::new(setup)));
    Runtime::new()
        .run(&mut app)
        .context("terminal UI failed")?;

    eprintln!("seed: {seed}");
    for (i, game) in report.borrow().games().iter().enumerate() {
        eprintln!("game {}: {game}", i + 1);
    }

    Ok(())
}
