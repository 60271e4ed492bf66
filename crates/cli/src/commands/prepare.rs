use anyhow::Result;
use clap::Parser;

use rules_core::ActorId;

use crate::report;
use crate::session::Session;

/// Run a preparation pass and print the derived data
#[derive(Parser)]
pub struct Prepare {
    /// Actor id
    #[arg(value_name = "ACTOR")]
    actor: String,

    /// Also list the actor's roll options
    #[arg(short, long)]
    options: bool,

    /// Print the prepared actor's fingerprint
    #[arg(short, long)]
    fingerprint: bool,
}

impl Prepare {
    pub async fn execute(self, session: &mut Session) -> Result<()> {
        let prepared = session.runtime.prepare(&ActorId::from(self.actor)).await?;
        report::print_actor(&prepared, self.options);
        if self.fingerprint {
            println!("fingerprint {}", hex::encode(prepared.fingerprint()));
        }
        Ok(())
    }
}
