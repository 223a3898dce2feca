use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::Deserialize;

use crate::error::TreeError;
use crate::merkle_tree::AllocationRecord;

#[derive(Debug, Deserialize)]
struct LeaderboardRow {
    player: String,
    score: f64,
}

/// Parses a leaderboard JSON file, an array of `{ "player", "score" }`
/// rows, into validated allocation records. Row order is preserved: it is
/// the leaf order of the committed tree.
pub fn parse_leaderboard_json<P: AsRef<Path>>(path: P) -> Result<Vec<AllocationRecord>, TreeError> {
    let file = File::open(path)?;
    let rows: Vec<LeaderboardRow> = serde_json::from_reader(BufReader::new(file))
        .map_err(|err| TreeError::MalformedRecord(err.to_string()))?;
    rows_to_records(rows)
}

/// Same as [`parse_leaderboard_json`], but over an in-memory string.
pub fn parse_leaderboard_str(data: &str) -> Result<Vec<AllocationRecord>, TreeError> {
    let rows: Vec<LeaderboardRow> = serde_json::from_str(data)
        .map_err(|err| TreeError::MalformedRecord(err.to_string()))?;
    rows_to_records(rows)
}

fn rows_to_records(rows: Vec<LeaderboardRow>) -> Result<Vec<AllocationRecord>, TreeError> {
    rows.into_iter()
        .map(|row| AllocationRecord::from_score(&row.player, row.score))
        .collect()
}
