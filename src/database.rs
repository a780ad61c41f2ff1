use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::{Connection, params};
use std::fs;
use std::path::Path;
use tracing::info;

use crate::games::Game;
use crate::types::{DrawRecord, GameFetchResult, Period};

pub fn ensure_parent_dir(database_url: &str) -> Result<()> {
    if let Some(parent) = Path::new(database_url).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
    }
    Ok(())
}

pub fn open_database(database_url: &str) -> Result<Connection> {
    ensure_parent_dir(database_url)?;
    let conn = Connection::open(database_url)
        .with_context(|| format!("Failed to open database {}", database_url))?;
    create_tables(&conn)?;
    info!("📁 Snapshot store ready at {}", database_url);
    Ok(conn)
}

pub fn create_tables(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS draws (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            game TEXT NOT NULL,
            period TEXT NOT NULL,
            period_num INTEGER,
            period_label TEXT NOT NULL,
            draw_date TEXT NOT NULL,
            numbers TEXT NOT NULL,
            numbers_by_size TEXT,
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
            UNIQUE (game, period)
        )",
        [],
    )?;
    Ok(())
}

/// Stores one draw; a draw already stored for the same game and period is
/// replaced.
pub fn save_draw(conn: &Connection, game: Game, draw: &DrawRecord) -> Result<()> {
    let by_size = draw
        .numbers_by_size
        .as_ref()
        .map(serde_json::to_string)
        .transpose()?;

    conn.execute(
        "INSERT INTO draws (game, period, period_num, period_label, draw_date, numbers, numbers_by_size)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
         ON CONFLICT (game, period) DO UPDATE SET
            period_num = excluded.period_num,
            period_label = excluded.period_label,
            draw_date = excluded.draw_date,
            numbers = excluded.numbers,
            numbers_by_size = excluded.numbers_by_size",
        params![
            game.code(),
            serde_json::to_string(&draw.period)?,
            draw.period.as_number(),
            draw.period.to_string(),
            draw.date.format("%Y-%m-%d").to_string(),
            serde_json::to_string(&draw.numbers)?,
            by_size,
        ],
    )?;
    Ok(())
}

pub fn save_snapshot(conn: &mut Connection, snapshot: &GameFetchResult) -> Result<usize> {
    let tx = conn.transaction()?;
    let mut saved = 0;
    for (game, draws) in snapshot {
        for draw in draws {
            save_draw(&tx, *game, draw)?;
            saved += 1;
        }
    }
    tx.commit()?;
    Ok(saved)
}

/// Draws for one game, newest first. Draws on the same date are ordered by
/// period, numerically when it is a number.
pub fn get_latest_draws(conn: &Connection, game: Game, limit: Option<u32>) -> Result<Vec<DrawRecord>> {
    let mut stmt = conn.prepare(
        "SELECT period, draw_date, numbers, numbers_by_size
         FROM draws
         WHERE game = ?1
         ORDER BY draw_date DESC, period_num DESC, period_label DESC
         LIMIT ?2",
    )?;
    let limit = limit.map(i64::from).unwrap_or(-1);
    let rows = stmt.query_map(params![game.code(), limit], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, Option<String>>(3)?,
        ))
    })?;

    let mut draws = Vec::new();
    for row in rows {
        let (period, date, numbers, by_size) = row?;
        draws.push(row_to_draw(&period, &date, &numbers, by_size.as_deref())?);
    }
    Ok(draws)
}

fn row_to_draw(period: &str, date: &str, numbers: &str, by_size: Option<&str>) -> Result<DrawRecord> {
    Ok(DrawRecord {
        period: serde_json::from_str::<Period>(period)
            .with_context(|| format!("Corrupt stored period {:?}", period))?,
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .with_context(|| format!("Corrupt stored date {:?}", date))?,
        numbers: serde_json::from_str(numbers)?,
        numbers_by_size: by_size.map(serde_json::from_str).transpose()?,
    })
}

/// Every stored game, newest draw first within each.
pub fn load_snapshot(conn: &Connection) -> Result<GameFetchResult> {
    let mut snapshot = GameFetchResult::new();
    for game in Game::ALL {
        let draws = get_latest_draws(conn, game, None)?;
        if !draws.is_empty() {
            snapshot.insert(game, draws);
        }
    }
    Ok(snapshot)
}

pub fn count_draws(conn: &Connection, game: Game) -> Result<u32> {
    let count: u32 = conn.query_row(
        "SELECT COUNT(*) FROM draws WHERE game = ?1",
        [game.code()],
        |row| row.get(0),
    )?;
    Ok(count)
}
