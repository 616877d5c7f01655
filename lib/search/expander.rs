use crate::backgammon::{Color, MoveError, Position, Roll};
use crate::search::{sequences, Options};
use rayon::{prelude::*, ThreadPool, ThreadPoolBuilder};
use tracing::{instrument, warn};

#[derive(Debug)]
enum Executor {
    Parallel(ThreadPool),
    Sequential,
}

/// Counts the nodes of the game tree, over every roll and every way of playing it.
///
/// Colors alternate at every level and games that are won end their branch.
#[derive(Debug)]
pub struct Expander {
    executor: Executor,
}

impl Default for Expander {
    fn default() -> Self {
        Self::new()
    }
}

impl Expander {
    /// Constructs [`Expander`] with the default [`Options`].
    pub fn new() -> Self {
        Self::with_options(Options::default())
    }

    /// Constructs [`Expander`] with the given [`Options`].
    pub fn with_options(options: Options) -> Self {
        let executor = match options.threads.get() {
            1 => Executor::Sequential,
            n => match ThreadPoolBuilder::new().num_threads(n).build() {
                Ok(pool) => Executor::Parallel(pool),
                Err(e) => {
                    warn!(threads = n, error = %e, "falling back to sequential expansion");
                    Executor::Sequential
                }
            },
        };

        Expander { executor }
    }

    /// The number of leaves `depth` plies below a position, the first ply played by `c`.
    #[instrument(level = "debug", skip(self, pos), fields(pos = %pos), ret, err)]
    pub fn count(&self, pos: &Position, c: Color, depth: u8) -> Result<u64, MoveError> {
        if depth == 0 || pos.winner().is_some() {
            return Ok(1);
        }

        match &self.executor {
            Executor::Sequential => expand(&mut pos.clone(), c, depth),
            Executor::Parallel(pool) => pool.install(|| {
                Roll::iter()
                    .collect::<Vec<_>>()
                    .into_par_iter()
                    .map(|roll| -> Result<u64, MoveError> {
                        let mut pos = pos.clone();
                        let mut nodes = 0;
                        for s in sequences(&mut pos, c, roll)? {
                            s.apply(&mut pos)?;
                            nodes += expand(&mut pos, !c, depth - 1)?;
                            s.undo(&mut pos)?;
                        }

                        Ok(nodes)
                    })
                    .sum()
            }),
        }
    }
}

fn expand(pos: &mut Position, c: Color, depth: u8) -> Result<u64, MoveError> {
    if depth == 0 || pos.winner().is_some() {
        return Ok(1);
    }

    let mut nodes = 0;
    for roll in Roll::iter() {
        for s in sequences(pos, c, roll)? {
            s.apply(pos)?;
            nodes += expand(pos, !c, depth - 1)?;
            s.undo(pos)?;
        }
    }

    Ok(nodes)
}
