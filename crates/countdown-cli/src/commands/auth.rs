use std::io::{IsTerminal, Read};

use clap::Subcommand;
use countdown_core::expander::keyring_store::{self, API_KEY_ENTRY};

#[derive(Subcommand)]
pub enum AuthAction {
    /// Store the prompt expander API key in the OS keyring
    SetKey {
        /// API key; read from stdin when omitted
        key: Option<String>,
    },
    /// Remove the stored API key
    ClearKey,
    /// Show where the API key would be taken from
    Status,
}

pub fn run(action: AuthAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        AuthAction::SetKey { key } => {
            let key = match key {
                Some(key) => key,
                None => {
                    if std::io::stdin().is_terminal() {
                        eprintln!("paste the API key and press Ctrl-D:");
                    }
                    let mut buf = String::new();
                    std::io::stdin().read_to_string(&mut buf)?;
                    buf
                }
            };
            let key = key.trim();
            if key.is_empty() {
                return Err("API key is empty".into());
            }
            keyring_store::set(API_KEY_ENTRY, key)?;
            println!("API key stored");
        }
        AuthAction::ClearKey => {
            keyring_store::delete(API_KEY_ENTRY)?;
            println!("API key removed");
        }
        AuthAction::Status => {
            let from_env = ["GEMINI_API_KEY", "API_KEY"]
                .into_iter()
                .find(|var| std::env::var(var).is_ok_and(|v| !v.trim().is_empty()));
            if let Some(var) = from_env {
                println!("configured (environment: {var})");
            } else {
                match keyring_store::get(API_KEY_ENTRY) {
                    Ok(Some(_)) => println!("configured (keyring)"),
                    Ok(None) => println!("not configured"),
                    Err(e) => println!("not configured ({e})"),
                }
            }
        }
    }
    Ok(())
}
