//! Shared input/output helpers: JSON documents come from a file or stdin and
//! go to stdout or a file.

use std::io::Read;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use taskdeck_core::{Board, TaskStore};

pub type CliResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

/// Read a whole document from `path`, or stdin when `path` is `None` or `-`.
pub fn read_input(path: Option<&Path>) -> CliResult<String> {
    match path {
        Some(p) if p.as_os_str() != "-" => std::fs::read_to_string(p)
            .map_err(|e| format!("cannot read {}: {e}", p.display()).into()),
        _ => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

/// Parse a JSON document from `path` or stdin.
pub fn read_json<T: DeserializeOwned>(path: Option<&Path>) -> CliResult<T> {
    let raw = read_input(path)?;
    if raw.trim().is_empty() {
        return Err("empty input: expected a JSON document".into());
    }
    Ok(serde_json::from_str(&raw)?)
}

/// Pretty-print `value` to `path`, or stdout when `path` is `None` or `-`.
pub fn write_json<T: Serialize>(value: &T, path: Option<&Path>) -> CliResult {
    let json = serde_json::to_string_pretty(value)?;
    match path {
        Some(p) if p.as_os_str() != "-" => {
            std::fs::write(p, format!("{json}\n"))
                .map_err(|e| format!("cannot write {}: {e}", p.display()))?;
        }
        _ => println!("{json}"),
    }
    Ok(())
}

/// Load a board; empty input is an empty board.
pub fn load_store(path: Option<&Path>) -> CliResult<TaskStore> {
    let raw = read_input(path)?;
    if raw.trim().is_empty() {
        return Ok(TaskStore::new());
    }
    let board: Board = serde_json::from_str(&raw)?;
    Ok(TaskStore::from_board(board)?)
}

/// `--now` value, or the current time.
pub fn parse_now(now: Option<&str>) -> CliResult<DateTime<Utc>> {
    match now {
        Some(raw) => Ok(DateTime::parse_from_rfc3339(raw)
            .map_err(|e| format!("invalid --now '{raw}': {e}"))?
            .with_timezone(&Utc)),
        None => Ok(Utc::now()),
    }
}

/// Comma-separated list, trimmed, empty items dropped.
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_comma_lists() {
        assert_eq!(split_list(" a, b ,,c "), vec!["a", "b", "c"]);
        assert!(split_list("").is_empty());
    }

    #[test]
    fn parses_now() {
        let now = parse_now(Some("2026-10-19T07:00:00-07:00")).unwrap();
        assert_eq!(now.to_rfc3339(), "2026-10-19T14:00:00+00:00");
        assert!(parse_now(Some("yesterday")).is_err());
    }
}
