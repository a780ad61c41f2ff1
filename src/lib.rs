pub mod api;
pub mod config;
pub mod context;
pub mod database;
pub mod error;
pub mod games;
pub mod merge;
pub mod normalize;
pub mod strategy;
pub mod types;
pub mod utils;

pub use api::{AcquisitionWindow, FetchSettings, LiveDrawFetcher};
pub use context::AppContext;
pub use error::{AttemptFailure, FetchError};
pub use games::{Game, GameKind};
pub use strategy::{HttpStrategy, RequestStrategy, Route, first_success};
pub use types::{DrawRecord, GameFetchResult, Period};
