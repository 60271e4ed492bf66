use anyhow::{Context, Result};
use clap::Parser;

use rules_core::encounter::TurnChange;

use crate::session::Session;

/// Run the scenario in `encounter.ron` for a number of turns
#[derive(Parser)]
pub struct RunEncounter {
    /// Turns to advance after the first one
    #[arg(short, long, default_value_t = 3)]
    turns: u32,

    /// Seconds of world time to pass after each round
    #[arg(long, default_value_t = 6)]
    round_seconds: i64,

    /// End the encounter afterwards
    #[arg(short, long)]
    end: bool,
}

impl RunEncounter {
    pub async fn execute(self, session: &mut Session) -> Result<()> {
        let spec = session
            .encounter
            .clone()
            .context("No encounter.ron in the data directory")?;
        let runtime = session.runtime.clone();

        runtime.create_encounter(spec.combatants()).await?;
        let change = runtime.start_encounter().await?;
        print_turn(session, &change).await;

        for _ in 0..self.turns {
            let change = runtime.next_turn().await?;
            if change.new_round {
                runtime.advance_time(self.round_seconds).await?;
            }
            print_turn(session, &change).await;
        }

        if self.end {
            runtime.end_encounter().await?;
            println!("encounter ended");
        }
        session.print_notices();
        Ok(())
    }
}

async fn print_turn(session: &mut Session, change: &TurnChange) {
    let Some(combatant) = &change.started else {
        return;
    };
    let encounter = session.runtime.encounter().await;
    let actor = encounter
        .as_ref()
        .and_then(|encounter| encounter.combatant(combatant))
        .map(|c| c.actor.clone());
    let hp = match &actor {
        Some(actor) => session
            .runtime
            .prepared(actor)
            .await
            .map(|prepared| format!(" hp {}/{}", prepared.source.hp.value, prepared.source.hp.max))
            .unwrap_or_default(),
        None => String::new(),
    };
    println!("round {} turn {combatant}{hp}", change.round);
    session.print_notices();
}
