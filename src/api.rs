use anyhow::{Context, Result};
use chrono::{Datelike, Local};
use futures::future::join_all;
use reqwest::Client;
use std::time::Duration;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::FetchError;
use crate::games::Game;
use crate::normalize::normalize_body;
use crate::strategy::{RequestStrategy, default_chain, first_success};
use crate::types::{DrawRecord, GameFetchResult};
use crate::utils::{cache_bust_timestamp, format_month_for_api};

/// The calendar span requested from the API: January to December of one year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AcquisitionWindow {
    pub year: i32,
}

impl AcquisitionWindow {
    pub fn for_year(year: i32) -> Self {
        Self { year }
    }

    pub fn current() -> Self {
        Self::for_year(Local::now().year())
    }

    pub fn start_month(&self) -> String {
        format_month_for_api(self.year, 1)
    }

    pub fn end_month(&self) -> String {
        format_month_for_api(self.year, 12)
    }
}

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub api_base: String,
    pub page_size: u32,
    pub timeout: Duration,
    pub games: Vec<Game>,
}

impl FetchSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            api_base: config.api_base.clone(),
            page_size: config.page_size,
            timeout: config.request_timeout,
            games: Game::ALL.to_vec(),
        }
    }
}

pub struct LiveDrawFetcher {
    strategies: Vec<Box<dyn RequestStrategy>>,
    settings: FetchSettings,
}

impl LiveDrawFetcher {
    pub fn new(strategies: Vec<Box<dyn RequestStrategy>>, settings: FetchSettings) -> Self {
        Self {
            strategies,
            settings,
        }
    }

    /// The production fetcher: relay, encoded relay, then direct, over one
    /// shared HTTP client.
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .user_agent("Mozilla/5.0")
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self::new(
            default_chain(config, client),
            FetchSettings::from_config(config),
        ))
    }

    /// One acquisition cycle for the current year. Never fails: games whose
    /// fetch failed are simply missing from the result.
    pub async fn fetch_live_lottery_data(&self) -> GameFetchResult {
        self.fetch_window(AcquisitionWindow::current(), cache_bust_timestamp())
            .await
    }

    pub async fn fetch_window(&self, window: AcquisitionWindow, timestamp: i64) -> GameFetchResult {
        info!(
            "📡 Fetching live draws ({} ~ {}) for {} games",
            window.start_month(),
            window.end_month(),
            self.settings.games.len()
        );

        let tasks = self
            .settings
            .games
            .iter()
            .map(|game| self.fetch_game(*game, window, timestamp));
        let outcomes = join_all(tasks).await;

        let mut live_data = GameFetchResult::new();
        for (game, outcome) in self.settings.games.iter().zip(outcomes) {
            match outcome {
                Ok(draws) if draws.is_empty() => {
                    warn!("⚠ {} returned no draws this cycle", game);
                }
                Ok(draws) => {
                    live_data.insert(*game, draws);
                }
                Err(e) => {
                    warn!("❌ {} fetch failed: {}", game, e);
                }
            }
        }

        info!(
            "🎯 Live fetch finished: {}/{} games",
            live_data.len(),
            self.settings.games.len()
        );
        live_data
    }

    /// Runs the strategy chain for one game. An attempt only wins when its
    /// body holds this game's records; an answer without them moves the chain
    /// on. If the chain runs out and some strategy did answer with no records,
    /// the game has nothing this cycle and the result is empty.
    pub async fn fetch_game(
        &self,
        game: Game,
        window: AcquisitionWindow,
        timestamp: i64,
    ) -> Result<Vec<DrawRecord>, FetchError> {
        let target = self.target_url(game, window, timestamp);

        let outcome = first_success(&self.strategies, &target, self.settings.timeout, |body| {
            normalize_body(game, body)
        })
        .await;

        match outcome {
            Ok((strategy, draws)) => {
                info!("✅ {} → {} draws via {}", game, draws.len(), strategy);
                Ok(draws)
            }
            Err(FetchError::Exhausted(failures))
                if failures
                    .iter()
                    .any(|f| matches!(*f.error, FetchError::NoRecords(_))) =>
            {
                info!("📭 {} has no records upstream this cycle", game);
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }

    pub fn target_url(&self, game: Game, window: AcquisitionWindow, timestamp: i64) -> String {
        format!(
            "{}/{}?period&startMonth={}&endMonth={}&pageNum=1&pageSize={}&_t={}",
            self.settings.api_base,
            game.api_route(),
            window.start_month(),
            window.end_month(),
            self.settings.page_size,
            timestamp
        )
    }
}
