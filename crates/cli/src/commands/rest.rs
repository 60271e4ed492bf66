use anyhow::Result;
use clap::Parser;

use rules_core::ActorId;

use crate::report;
use crate::session::Session;

/// Rest for the night: restore slots, innate uses and focus points
#[derive(Parser)]
pub struct Rest {
    /// Actor id
    #[arg(value_name = "ACTOR")]
    actor: String,
}

impl Rest {
    pub async fn execute(self, session: &mut Session) -> Result<()> {
        let prepared = session.runtime.rest(&ActorId::from(self.actor)).await?;
        report::print_actor(&prepared, false);
        session.print_notices();
        Ok(())
    }
}

/// Regain focus points
#[derive(Parser)]
pub struct Refocus {
    /// Actor id
    #[arg(value_name = "ACTOR")]
    actor: String,

    /// Restore the whole pool
    #[arg(short, long)]
    all: bool,
}

impl Refocus {
    pub async fn execute(self, session: &mut Session) -> Result<()> {
        let prepared = session
            .runtime
            .refocus(&ActorId::from(self.actor), self.all)
            .await?;
        match prepared.source.focus {
            Some(focus) => println!("focus {}/{}", focus.value, focus.max),
            None => println!("no focus pool"),
        }
        session.print_notices();
        Ok(())
    }
}
