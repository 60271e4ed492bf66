//! Plain-text rendering of prepared actors.
use rules_core::effects::Remaining;
use rules_core::options::ALL_DOMAIN;
use rules_core::{EntryId, PreparedActor};

pub fn print_actor(actor: &PreparedActor, options: bool) {
    let source = &actor.source;
    println!(
        "{} [{}] level {} hp {}/{}",
        source.name,
        actor.kind(),
        source.level,
        source.hp.value,
        source.hp.max
    );
    if let Some(tiebreak) = actor.initiative_tiebreak {
        println!("  initiative tiebreak: {tiebreak}");
    }

    for statistic in actor.statistics.values() {
        println!(
            "  {:<16} {:+} (DC {})  {}",
            statistic.slug,
            statistic.total(),
            statistic.dc_value(),
            statistic.check.breakdown()
        );
    }

    for entry in actor.spellcasting.iter() {
        println!(
            "  spellcasting {} ({}): attack {:+} DC {}",
            entry.source.name,
            entry.id(),
            entry.attack(),
            entry.dc()
        );
        print_spell_levels(actor, entry.id());
    }

    for effect in &actor.effects {
        let remaining = match effect.remaining.remaining {
            Remaining::Finite(seconds) => format!("{seconds}s"),
            Remaining::Infinite => "unlimited".to_string(),
        };
        let state = if effect.remaining.expired { "expired" } else { "active" };
        println!("  effect {} ({state}, {remaining})", effect.slug);
    }

    if options {
        for option in actor.roll_options(&[ALL_DOMAIN]) {
            println!("  option {option}");
        }
    }
}

pub fn print_spell_levels(actor: &PreparedActor, entry: &EntryId) {
    let Some(entry) = actor.spellcasting.get(entry) else {
        return;
    };
    for level in entry.spell_levels(&actor.source) {
        let uses = level
            .uses
            .map(|uses| match uses.value {
                Some(value) => format!(" {value}/{}", uses.max),
                None => format!(" max {}", uses.max),
            })
            .unwrap_or_default();
        let spells: Vec<String> = level
            .active
            .iter()
            .map(|slot| match slot {
                Some(spell) => {
                    let name = actor
                        .source
                        .item(&spell.spell)
                        .map(|item| item.name.as_str())
                        .unwrap_or("?");
                    if spell.expended {
                        format!("{name} (expended)")
                    } else {
                        name.to_string()
                    }
                }
                None => "(empty)".to_string(),
            })
            .collect();
        let label = if level.is_cantrip {
            "cantrips".to_string()
        } else {
            format!("level {}", level.level)
        };
        println!("    {label}{uses}: {}", spells.join(", "));
    }
}
