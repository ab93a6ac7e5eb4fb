use std::io::{BufRead, IsTerminal, Write};

use clap::Subcommand;
use countdown_core::{Config, CountdownCard, EventStore, GeminiExpander, ManualEntry, PromptExpander};

use crate::render::{card_block, invalid_block, CardJson};

#[derive(Subcommand)]
pub enum EventAction {
    /// Add a deadline
    Add {
        /// Event title
        #[arg(long)]
        title: String,
        /// Target date (YYYY-MM-DD)
        #[arg(long)]
        date: String,
        /// Target time, local (HH:MM or HH:MM:SS)
        #[arg(long)]
        time: String,
        /// Optional description
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Generate deadlines from a free-text request
    Generate {
        /// What to generate, e.g. "my semester exams in May"
        #[arg(required = true, num_args = 1..)]
        prompt: Vec<String>,
    },
    /// List deadlines, newest first
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one deadline as JSON
    Show {
        id: String,
    },
    /// Delete a deadline
    Remove {
        id: String,
    },
    /// Delete every deadline
    Clear {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

pub fn run(action: EventAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = EventStore::open()?;

    match action {
        EventAction::Add {
            title,
            date,
            time,
            description,
        } => {
            let entry = ManualEntry {
                title,
                date,
                time,
                description,
            };
            let record = entry.validate()?;
            let id = record.id.clone();
            store.add(record)?;
            println!("{id}");
        }
        EventAction::Generate { prompt } => {
            let prompt = prompt.join(" ");
            let config = Config::load_or_default();
            let records = match GeminiExpander::from_config(&config.expander) {
                Ok(expander) => {
                    let rt = tokio::runtime::Runtime::new()?;
                    rt.block_on(expander.expand(&prompt))
                }
                Err(e) => {
                    tracing::warn!("prompt expander unavailable: {e}");
                    Vec::new()
                }
            };
            let added = store.extend(records)?;
            for record in store.list().iter().take(added) {
                println!("{}  {}  {}", record.id, record.time, record.title);
            }
            eprintln!("{added} event(s) added");
        }
        EventAction::List { json } => {
            let config = Config::load_or_default();
            let cards: Vec<_> = store
                .list()
                .iter()
                .map(|e| (e, CountdownCard::new(e.clone())))
                .collect();

            if json {
                let rows: Vec<_> = cards
                    .iter()
                    .map(|(e, card)| CardJson::new(e, card.as_ref().ok().map(|c| c.frame())))
                    .collect();
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else if cards.is_empty() {
                println!("No deadlines yet. Add one with `countdown event add`.");
            } else {
                let color = std::io::stdout().is_terminal();
                for (event, card) in &cards {
                    match card {
                        Ok(card) => print!("{}", card_block(card, card.frame(), &config.display, color)),
                        Err(e) => print!("{}", invalid_block(event, &e.to_string())),
                    }
                    println!();
                }
            }
        }
        EventAction::Show { id } => {
            let event = store.get(&id).ok_or_else(|| format!("no event with id '{id}'"))?;
            let card = CountdownCard::new(event.clone()).ok();
            let row = CardJson::new(event, card.as_ref().map(|c| c.frame()));
            println!("{}", serde_json::to_string_pretty(&row)?);
        }
        EventAction::Remove { id } => {
            if store.remove(&id)? {
                println!("removed {id}");
            } else {
                println!("no event with id '{id}'");
            }
        }
        EventAction::Clear { yes } => {
            if store.is_empty() {
                println!("nothing to clear");
                return Ok(());
            }
            if !yes && !confirm(&format!("Delete all {} events?", store.len()))? {
                println!("aborted");
                return Ok(());
            }
            let removed = store.clear()?;
            println!("removed {removed} event(s)");
        }
    }
    Ok(())
}

fn confirm(question: &str) -> Result<bool, Box<dyn std::error::Error>> {
    print!("{question} [y/N] ");
    std::io::stdout().flush()?;
    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}
