use anyhow::Result;
use clap::Parser;

use rules_core::spellcasting::CastOptions;
use rules_core::{ActorId, EntryId, ItemId};

use crate::report;
use crate::session::Session;

/// Cast a spell through a spellcasting entry
#[derive(Parser)]
pub struct Cast {
    /// Actor id
    #[arg(value_name = "ACTOR")]
    actor: String,

    /// Spellcasting entry id
    #[arg(value_name = "ENTRY")]
    entry: String,

    /// Spell item id
    #[arg(value_name = "SPELL")]
    spell: String,

    /// Cast at this level instead of the spell's own
    #[arg(short, long)]
    level: Option<u8>,

    /// Prepared slot index to expend
    #[arg(short, long)]
    slot: Option<usize>,

    /// Repeat the cast this many times
    #[arg(short, long, default_value_t = 1)]
    times: u32,
}

impl Cast {
    pub async fn execute(self, session: &mut Session) -> Result<()> {
        let actor = ActorId::from(self.actor);
        let entry = EntryId::from(self.entry);
        let spell = ItemId::from(self.spell);
        let options = CastOptions {
            level: self.level,
            slot: self.slot,
            ..CastOptions::default()
        };

        for _ in 0..self.times {
            let cast = session
                .runtime
                .cast(&actor, &entry, &spell, options)
                .await?;
            println!("{}", if cast { "cast" } else { "blocked" });
            session.print_notices();
        }

        if let Some(prepared) = session.runtime.prepared(&actor).await {
            report::print_spell_levels(&prepared, &entry);
        }
        Ok(())
    }
}

/// Cast the spell stored in a scroll or wand
#[derive(Parser)]
pub struct CastConsumable {
    /// Actor id
    #[arg(value_name = "ACTOR")]
    actor: String,

    /// Consumable item id
    #[arg(value_name = "ITEM")]
    item: String,
}

impl CastConsumable {
    pub async fn execute(self, session: &mut Session) -> Result<()> {
        let cast = session
            .runtime
            .cast_consumable(&ActorId::from(self.actor), &ItemId::from(self.item))
            .await?;
        println!("{}", if cast { "cast" } else { "not cast" });
        session.print_notices();
        Ok(())
    }
}
