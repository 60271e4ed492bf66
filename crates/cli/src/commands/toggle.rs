use anyhow::Result;
use clap::Parser;

use rules_core::{ActorId, ToggleRequest};

use crate::session::Session;

/// Flip a roll-option toggle
#[derive(Parser)]
pub struct Toggle {
    /// Actor id
    #[arg(value_name = "ACTOR")]
    actor: String,

    /// Roll option domain
    #[arg(value_name = "DOMAIN")]
    domain: String,

    /// Roll option
    #[arg(value_name = "OPTION")]
    option: String,

    /// Item authoring the toggle
    #[arg(short, long)]
    item: Option<String>,

    /// Value to set instead of flipping the current one
    #[arg(short, long)]
    value: Option<bool>,
}

impl Toggle {
    pub async fn execute(self, session: &mut Session) -> Result<()> {
        let mut request = ToggleRequest::new(self.domain, self.option);
        if let Some(item) = self.item {
            request = request.on_item(item);
        }
        if let Some(value) = self.value {
            request = request.with_value(value);
        }

        match session
            .runtime
            .toggle(&ActorId::from(self.actor), &request)
            .await?
        {
            Some(value) => println!("{}:{} = {value}", request.domain, request.option),
            None => println!("no toggleable rule element for {}:{}", request.domain, request.option),
        }
        session.print_notices();
        Ok(())
    }
}
