use std::collections::HashMap;
use std::io::{IsTerminal, Write};
use std::time::Duration;

use clap::Args;
use countdown_core::storage::DisplayConfig;
use countdown_core::{CardTicker, Config, CountdownCard, EventRecord, EventStore};

use crate::render::{card_block, invalid_block, CardJson};

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

#[derive(Args)]
pub struct WatchArgs {
    /// Print a single frame and exit
    #[arg(long)]
    pub once: bool,
    /// Print frames as JSON (one array per line)
    #[arg(long)]
    pub json: bool,
}

/// One on-screen card with its refresh task.
struct LiveCard {
    card: CountdownCard,
    ticker: CardTicker,
}

/// Cards currently shown, in store order.
#[derive(Default)]
struct Board {
    live: Vec<LiveCard>,
    invalid: Vec<(EventRecord, String)>,
}

impl Board {
    /// Bring the board in line with `events`. Cards whose record is unchanged
    /// keep their ticker; cards whose record is gone are dropped, which stops
    /// their ticker.
    fn sync(&mut self, events: &[EventRecord], period: Duration) {
        let mut previous: HashMap<String, LiveCard> = self
            .live
            .drain(..)
            .map(|lc| (lc.card.event().id.clone(), lc))
            .collect();
        self.invalid.clear();

        for event in events {
            match previous.remove(&event.id) {
                Some(lc) if lc.card.event() == event => self.live.push(lc),
                _ => match CountdownCard::new(event.clone()) {
                    Ok(card) => {
                        let ticker = CardTicker::spawn(card.clone(), period);
                        self.live.push(LiveCard { card, ticker });
                    }
                    Err(e) => self.invalid.push((event.clone(), e.to_string())),
                },
            }
        }
        if !previous.is_empty() {
            tracing::debug!(count = previous.len(), "stopping tickers for removed cards");
        }
    }

    fn draw(&self, display: &DisplayConfig, json: bool, color: bool) -> Result<String, serde_json::Error> {
        if json {
            let frames: Vec<_> = self.live.iter().map(|lc| lc.ticker.current()).collect();
            let mut rows: Vec<_> = self
                .live
                .iter()
                .zip(&frames)
                .map(|(lc, frame)| CardJson::new(lc.card.event(), Some(frame)))
                .collect();
            rows.extend(self.invalid.iter().map(|(e, _)| CardJson::new(e, None)));
            return serde_json::to_string(&rows).map(|s| s + "\n");
        }

        if self.live.is_empty() && self.invalid.is_empty() {
            return Ok("No deadlines yet. Add one with `countdown event add`.\n".into());
        }
        let mut out = String::new();
        for lc in &self.live {
            out.push_str(&card_block(&lc.card, &lc.ticker.current(), display, color));
            out.push('\n');
        }
        for (event, reason) in &self.invalid {
            out.push_str(&invalid_block(event, reason));
            out.push('\n');
        }
        Ok(out)
    }
}

pub fn run(args: WatchArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(watch(args, config))
}

async fn watch(args: WatchArgs, config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let period = Duration::from_millis(config.display.tick_ms);
    let color = !args.json && std::io::stdout().is_terminal();

    let mut board = Board::default();
    board.sync(EventStore::open()?.list(), period);

    if args.once {
        print!("{}", board.draw(&config.display, args.json, color)?);
        return Ok(());
    }

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    loop {
        tokio::select! {
            _ = interval.tick() => {
                // Other processes may have edited the store since the last frame.
                match EventStore::open() {
                    Ok(store) => board.sync(store.list(), period),
                    Err(e) => tracing::warn!("failed to reload events: {e}"),
                }
                let frame = board.draw(&config.display, args.json, color)?;
                let mut stdout = std::io::stdout().lock();
                if !args.json {
                    stdout.write_all(CLEAR_SCREEN.as_bytes())?;
                }
                stdout.write_all(frame.as_bytes())?;
                stdout.flush()?;
            }
            _ = &mut ctrl_c => break,
        }
    }
    Ok(())
}
