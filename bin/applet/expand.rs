use anyhow::Error as Anyhow;
use clap::Parser;
use lib::backgammon::{Color, Position};
use lib::search::{Expander, Options};
use std::time::Instant;
use tracing::{info, instrument};

/// Counts the nodes of the game tree below a position.
#[derive(Debug, Parser)]
#[clap(disable_help_flag = true, disable_version_flag = true)]
pub struct Expand {
    /// The expander configuration.
    #[clap(short, long, default_value_t)]
    options: Options,

    /// How many plies to expand.
    #[clap(short, long, default_value_t = 1)]
    depth: u8,

    /// The color to play first.
    #[clap(short, long, default_value_t = Color::White)]
    color: Color,

    /// The position to expand as a state string.
    #[clap(default_value_t)]
    pos: Position,
}

impl Expand {
    #[instrument(level = "trace", skip(self), err)]
    pub fn execute(self) -> Result<(), Anyhow> {
        let expander = Expander::with_options(self.options);
        let timer = Instant::now();
        let nodes = expander.count(&self.pos, self.color, self.depth)?;
        let elapsed = timer.elapsed();

        info!(
            depth = self.depth,
            nodes,
            time = ?elapsed,
            nps = %(nodes as f64 / elapsed.as_secs_f64()).round(),
        );

        Ok(())
    }
}
