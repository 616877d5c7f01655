use anyhow::Error as Anyhow;
use clap::Parser;
use lib::backgammon::{Color, Position, Roll};
use lib::search::sequences;
use tracing::{info, instrument};

/// Lists every distinct way of playing a roll.
#[derive(Debug, Parser)]
#[clap(disable_help_flag = true, disable_version_flag = true)]
pub struct Moves {
    /// The color to play.
    #[clap(short, long, default_value_t = Color::White)]
    color: Color,

    /// The roll to play, e.g. `3-1`.
    roll: Roll,

    /// The position as a state string.
    #[clap(default_value_t)]
    pos: Position,
}

impl Moves {
    #[instrument(level = "trace", skip(self), err)]
    pub fn execute(mut self) -> Result<(), Anyhow> {
        let sequences = sequences(&mut self.pos, self.color, self.roll)?;
        info!(color = %self.color, roll = %self.roll, plays = sequences.len());

        for s in sequences {
            let mut next = self.pos.clone();
            s.apply(&mut next)?;
            println!("{s}\t{next}");
        }

        Ok(())
    }
}
