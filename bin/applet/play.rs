use anyhow::{Context, Error as Anyhow};
use clap::Parser;
use lib::backgammon::{Color, Coords, Position};
use tracing::{info, instrument};

/// Plays moves and reports the analysis of the resulting position.
#[derive(Debug, Parser)]
#[clap(disable_help_flag = true, disable_version_flag = true)]
pub struct Play {
    /// The color to play.
    #[clap(short, long, default_value_t = Color::White)]
    color: Color,

    /// The position as a state string.
    #[clap(short, long, default_value_t)]
    pos: Position,

    /// The moves to play as `origin:face`, the origin `-1` standing for the bar.
    #[clap(allow_hyphen_values = true)]
    moves: Vec<Coords>,
}

impl Play {
    #[instrument(level = "trace", skip(self), err)]
    pub fn execute(mut self) -> Result<(), Anyhow> {
        for Coords(origin, face) in self.moves {
            let m = self
                .pos
                .play(self.color, origin, face)
                .with_context(|| format!("failed to play `{origin}:{face}`"))?;

            info!(color = %self.color, %m, hit = m.is_hit());
        }

        println!("{}", self.pos);

        for c in Color::iter() {
            info!(
                color = %c,
                pips = self.pos.pip_count(c),
                bar = self.pos.board().bar(c),
                home = self.pos.board().home(c),
                may_bearoff = self.pos.may_bearoff(c),
                blots = self.pos.blots(c).len(),
                primes = self.pos.primes(c).len(),
            );
        }

        info!(disengaged = self.pos.is_disengaged(), winner = ?self.pos.winner());

        Ok(())
    }
}
