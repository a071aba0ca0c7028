//! Console Module
//!
//! Line-oriented command interface for driving a cache from a terminal.
//! Parsing and execution are separate so both can be tested without I/O.

use std::time::Duration;

use thiserror::Error;

use crate::cache::ExpiringCache;

// == Parse Error ==
/// A console line that could not be turned into a command.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParseError {
    #[error("Empty command")]
    Empty,

    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Wrong number of arguments for {0}")]
    WrongArity(&'static str),

    #[error("Invalid TTL: {0}")]
    InvalidTtl(String),
}

// == Command ==
/// A parsed console command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Set {
        key: String,
        value: String,
        ttl: Option<Duration>,
    },
    Get(String),
    Del(String),
    Exists(String),
    Rename(String, String),
    Copy(String, String),
    /// Values of live entries whose key matches a `%` pattern
    Like(String),
    Ttl(String),
    Count,
    FlushAll,
    Quit,
}

impl Command {
    /// Parses a whitespace-separated command line. Command names are
    /// case-insensitive.
    ///
    /// `SET key value [ttl_secs]` - a TTL of 0 stores without expiry, an
    /// omitted TTL uses the cache default.
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        let mut parts = line.split_whitespace();
        let name = parts.next().ok_or(ParseError::Empty)?.to_ascii_uppercase();
        let args: Vec<&str> = parts.collect();

        let command = match (name.as_str(), args.as_slice()) {
            ("SET", [key, value]) => Command::Set {
                key: key.to_string(),
                value: value.to_string(),
                ttl: None,
            },
            ("SET", [key, value, ttl]) => Command::Set {
                key: key.to_string(),
                value: value.to_string(),
                ttl: Some(parse_ttl(ttl)?),
            },
            ("SET", _) => return Err(ParseError::WrongArity("SET")),
            ("GET", [key]) => Command::Get(key.to_string()),
            ("DEL", [key]) => Command::Del(key.to_string()),
            ("EXISTS", [key]) => Command::Exists(key.to_string()),
            ("RENAME", [key, new_key]) => Command::Rename(key.to_string(), new_key.to_string()),
            ("COPY", [key, new_key]) => Command::Copy(key.to_string(), new_key.to_string()),
            ("LIKE", [pattern]) => Command::Like(pattern.to_string()),
            ("TTL", [key]) => Command::Ttl(key.to_string()),
            ("COUNT", []) => Command::Count,
            ("FLUSHALL", []) => Command::FlushAll,
            ("QUIT", []) | ("EXIT", []) => Command::Quit,
            ("GET", _) => return Err(ParseError::WrongArity("GET")),
            ("DEL", _) => return Err(ParseError::WrongArity("DEL")),
            ("EXISTS", _) => return Err(ParseError::WrongArity("EXISTS")),
            ("RENAME", _) => return Err(ParseError::WrongArity("RENAME")),
            ("COPY", _) => return Err(ParseError::WrongArity("COPY")),
            ("LIKE", _) => return Err(ParseError::WrongArity("LIKE")),
            ("TTL", _) => return Err(ParseError::WrongArity("TTL")),
            ("COUNT", _) => return Err(ParseError::WrongArity("COUNT")),
            ("FLUSHALL", _) => return Err(ParseError::WrongArity("FLUSHALL")),
            ("QUIT", _) | ("EXIT", _) => return Err(ParseError::WrongArity("QUIT")),
            _ => return Err(ParseError::UnknownCommand(name.clone())),
        };
        Ok(command)
    }
}

fn parse_ttl(raw: &str) -> Result<Duration, ParseError> {
    raw.parse::<u64>()
        .map(Duration::from_secs)
        .map_err(|_| ParseError::InvalidTtl(raw.to_string()))
}

// == Execute ==
/// Runs a command against the cache and renders the reply line.
///
/// `Quit` renders as `BYE`; stopping the read loop is up to the caller.
pub fn execute(cache: &ExpiringCache<String>, command: Command) -> String {
    match command {
        Command::Set { key, value, ttl } => {
            cache.set(key, value, ttl);
            "OK".to_string()
        }
        Command::Get(key) => cache.get(&key).unwrap_or_else(|| "(nil)".to_string()),
        Command::Del(key) => render_unit(cache.delete(&key)),
        Command::Exists(key) => (cache.exists(&key) as u8).to_string(),
        Command::Rename(key, new_key) => render_unit(cache.rename(&key, &new_key)),
        Command::Copy(key, new_key) => render_unit(cache.copy(&key, &new_key)),
        Command::Like(pattern) => match cache.get_like_key(&pattern) {
            Some(mut values) => {
                values.sort();
                values.join("\n")
            }
            None => "(empty)".to_string(),
        },
        Command::Ttl(key) => match cache.get_item(&key) {
            Some(item) => match item.ttl_remaining() {
                Some(remaining) => format!("{}ms", remaining.as_millis()),
                None => "never".to_string(),
            },
            None => "(nil)".to_string(),
        },
        Command::Count => cache.count().to_string(),
        Command::FlushAll => {
            cache.flush_all();
            "OK".to_string()
        }
        Command::Quit => "BYE".to_string(),
    }
}

fn render_unit(result: crate::error::Result<()>) -> String {
    match result {
        Ok(()) => "OK".to_string(),
        Err(err) => format!("ERR {}", err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache() -> ExpiringCache<String> {
        ExpiringCache::without_reclamation(Duration::ZERO)
    }

    fn run(cache: &ExpiringCache<String>, line: &str) -> String {
        execute(cache, Command::parse(line).unwrap())
    }

    #[test]
    fn test_parse_set_variants() {
        assert_eq!(
            Command::parse("set k v").unwrap(),
            Command::Set {
                key: "k".to_string(),
                value: "v".to_string(),
                ttl: None
            }
        );
        assert_eq!(
            Command::parse("SET k v 10").unwrap(),
            Command::Set {
                key: "k".to_string(),
                value: "v".to_string(),
                ttl: Some(Duration::from_secs(10))
            }
        );
        assert_eq!(
            Command::parse("SET k v soon"),
            Err(ParseError::InvalidTtl("soon".to_string()))
        );
        assert_eq!(Command::parse("SET k"), Err(ParseError::WrongArity("SET")));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(Command::parse("   "), Err(ParseError::Empty));
        assert_eq!(
            Command::parse("HSET a b"),
            Err(ParseError::UnknownCommand("HSET".to_string()))
        );
        assert_eq!(Command::parse("RENAME a"), Err(ParseError::WrongArity("RENAME")));
        assert_eq!(Command::parse("count now"), Err(ParseError::WrongArity("COUNT")));
        assert_eq!(
            Command::parse("KEYS user:%"),
            Err(ParseError::UnknownCommand("KEYS".to_string()))
        );
        assert_eq!(
            Command::parse("like user:%").unwrap(),
            Command::Like("user:%".to_string())
        );
    }

    #[test]
    fn test_execute_session() {
        let cache = cache();

        assert_eq!(run(&cache, "SET user:1 alice"), "OK");
        assert_eq!(run(&cache, "SET user:2 bob 0"), "OK");
        assert_eq!(run(&cache, "GET user:1"), "alice");
        assert_eq!(run(&cache, "GET user:9"), "(nil)");
        assert_eq!(run(&cache, "EXISTS user:2"), "1");
        assert_eq!(run(&cache, "LIKE user:%"), "alice\nbob");
        assert_eq!(run(&cache, "LIKE nobody%"), "(empty)");
        assert_eq!(run(&cache, "TTL user:2"), "never");
        assert_eq!(run(&cache, "COUNT"), "2");

        assert_eq!(
            run(&cache, "RENAME user:1 user:1"),
            "ERR The new key can not be the same as the old one: user:1"
        );
        assert_eq!(
            run(&cache, "RENAME user:1 user:2"),
            "ERR A key with the new name already exists: user:2"
        );
        assert_eq!(run(&cache, "COPY user:1 admin"), "OK");
        assert_eq!(run(&cache, "DEL user:1"), "OK");
        assert_eq!(run(&cache, "DEL user:1"), "ERR Key not found: user:1");
        assert_eq!(run(&cache, "GET admin"), "alice");

        assert_eq!(run(&cache, "FLUSHALL"), "OK");
        assert_eq!(run(&cache, "COUNT"), "0");
        assert_eq!(run(&cache, "quit"), "BYE");
    }

    #[test]
    fn test_execute_ttl_reports_remaining() {
        let cache = cache();
        run(&cache, "SET temp v 60");

        let reply = run(&cache, "TTL temp");
        let millis: u64 = reply.trim_end_matches("ms").parse().unwrap();
        assert!(millis <= 60_000 && millis > 59_000);
    }
}
