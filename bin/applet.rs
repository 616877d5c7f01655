use anyhow::Error as Anyhow;
use clap::Subcommand;
use derive_more::From;

mod expand;
mod moves;
mod play;

#[derive(From, Subcommand)]
pub enum Applet {
    Expand(expand::Expand),
    Moves(moves::Moves),
    Play(play::Play),
}

impl Applet {
    pub fn execute(self) -> Result<(), Anyhow> {
        match self {
            Applet::Expand(a) => Ok(a.execute()?),
            Applet::Moves(a) => Ok(a.execute()?),
            Applet::Play(a) => Ok(a.execute()?),
        }
    }
}
