use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

use crate::api::LiveDrawFetcher;
use crate::config::Config;
use crate::database::{get_latest_draws, load_snapshot, open_database, save_snapshot};
use crate::games::Game;
use crate::merge::merge_results;
use crate::types::{DrawRecord, GameFetchResult};

/// Everything a command needs, built once in `main` and handed down.
pub struct AppContext {
    pub config: Config,
    pub fetcher: LiveDrawFetcher,
    pub db: Connection,
}

impl AppContext {
    pub fn new(config: Config) -> Result<Self> {
        let fetcher = LiveDrawFetcher::from_config(&config)?;
        let db = open_database(&config.database_url)?;
        Ok(Self { config, fetcher, db })
    }

    pub fn with_parts(config: Config, fetcher: LiveDrawFetcher, db: Connection) -> Self {
        Self { config, fetcher, db }
    }

    pub async fn fetch(&self) -> GameFetchResult {
        self.fetcher.fetch_live_lottery_data().await
    }

    /// Fetches, merges with the stored snapshot and writes the merge back.
    /// A game absent from this cycle keeps its stored draws.
    pub async fn sync(&mut self) -> Result<GameFetchResult> {
        let live = self.fetch().await;
        self.store_live(&live)
    }

    pub fn store_live(&mut self, live: &GameFetchResult) -> Result<GameFetchResult> {
        let archived = load_snapshot(&self.db)?;
        let merged = merge_results(&archived, live);
        let saved = save_snapshot(&mut self.db, &merged)?;
        info!("💾 Saved {} draws across {} games", saved, merged.len());
        Ok(merged)
    }

    pub fn stored_draws(&self, game: Game, limit: Option<u32>) -> Result<Vec<DrawRecord>> {
        get_latest_draws(&self.db, game, limit)
    }
}
