//! Command handler and trace replay loop

use std::fmt;
use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use hotlru::{SharedCache, StatsSnapshot};
use serde::Serialize;
use tracing::{debug, warn};

use crate::command::Command;

/// Reply to one command
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    Ok,
    Value(Option<String>),
    Integer(usize),
    Stats(StatsSnapshot),
    Error(String),
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Response::Ok => write!(f, "OK"),
            Response::Value(Some(value)) => write!(f, "{}", value),
            Response::Value(None) => write!(f, "(nil)"),
            Response::Integer(n) => write!(f, "{}", n),
            Response::Stats(s) => write!(
                f,
                "hits={} misses={} inserts={} updates={} evictions={} hit_ratio={:.4}",
                s.hits, s.misses, s.inserts, s.updates, s.evictions, s.hit_ratio
            ),
            Response::Error(msg) => write!(f, "ERR {}", msg),
        }
    }
}

/// End-of-run report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub commands: u64,
    pub errors: u64,
    pub len: usize,
    pub capacity: usize,
    pub stats: StatsSnapshot,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "commands:  {}", self.commands)?;
        writeln!(f, "errors:    {}", self.errors)?;
        writeln!(f, "entries:   {}/{}", self.len, self.capacity)?;
        writeln!(f, "hits:      {}", self.stats.hits)?;
        writeln!(f, "misses:    {}", self.stats.misses)?;
        writeln!(f, "inserts:   {}", self.stats.inserts)?;
        writeln!(f, "updates:   {}", self.stats.updates)?;
        writeln!(f, "evictions: {}", self.stats.evictions)?;
        write!(f, "hit ratio: {:.2}%", self.stats.hit_ratio * 100.0)
    }
}

pub struct CommandHandler {
    cache: SharedCache<String, String>,
    commands: u64,
    errors: u64,
}

impl CommandHandler {
    pub fn new(cache: SharedCache<String, String>) -> Self {
        Self {
            cache,
            commands: 0,
            errors: 0,
        }
    }

    /// Handle one input line; `None` for blank lines and comments
    pub fn handle_line(&mut self, line: &str) -> Option<Response> {
        match Command::parse(line) {
            Ok(Some(cmd)) => {
                self.commands += 1;
                Some(self.handle(cmd))
            }
            Ok(None) => None,
            Err(e) => {
                self.commands += 1;
                self.errors += 1;
                warn!("Parse error: {}", e);
                Some(Response::Error(e.to_string()))
            }
        }
    }

    pub fn handle(&self, cmd: Command) -> Response {
        match cmd {
            Command::Put { key, value } => {
                self.cache.put(key, value);
                Response::Ok
            }
            Command::Get { key } => Response::Value(self.cache.get(&key)),
            Command::Del { key } => {
                Response::Integer(usize::from(self.cache.remove(&key).is_some()))
            }
            Command::Len => Response::Integer(self.cache.len()),
            Command::Stats => Response::Stats(self.cache.stats().snapshot()),
            Command::Clear => {
                self.cache.clear();
                Response::Ok
            }
        }
    }

    pub fn summary(&self) -> Summary {
        Summary {
            commands: self.commands,
            errors: self.errors,
            len: self.cache.len(),
            capacity: self.cache.capacity(),
            stats: self.cache.stats().snapshot(),
        }
    }
}

/// Feed every line of `input` through the handler, echoing replies to `out`
/// unless `quiet` is set
pub fn replay<R: BufRead, W: Write>(
    handler: &mut CommandHandler,
    input: R,
    out: &mut W,
    quiet: bool,
) -> Result<Summary> {
    for (lineno, line) in input.lines().enumerate() {
        let line = line.with_context(|| format!("failed to read line {}", lineno + 1))?;
        if let Some(response) = handler.handle_line(&line) {
            if !quiet {
                writeln!(out, "{}", response)?;
            }
        }
    }

    let summary = handler.summary();
    debug!(commands = summary.commands, errors = summary.errors, "replay finished");
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handler(capacity: usize) -> CommandHandler {
        CommandHandler::new(SharedCache::new(capacity).unwrap())
    }

    fn run(capacity: usize, trace: &str) -> (String, Summary) {
        let mut h = handler(capacity);
        let mut out = Vec::new();
        let summary = replay(&mut h, trace.as_bytes(), &mut out, false).unwrap();
        (String::from_utf8(out).unwrap(), summary)
    }

    #[test]
    fn test_replay_evicts_lru() {
        let trace = "\
# capacity 2
PUT A 1
PUT B 2
GET A
PUT C 3
GET B
GET A
GET C
LEN
";
        let (out, summary) = run(2, trace);

        assert_eq!(out, "OK\nOK\n1\nOK\n(nil)\n1\n3\n2\n");
        assert_eq!(summary.commands, 8);
        assert_eq!(summary.errors, 0);
        assert_eq!(summary.len, 2);
        assert_eq!(summary.stats.evictions, 1);
        assert_eq!(summary.stats.hits, 3);
        assert_eq!(summary.stats.misses, 1);
    }

    #[test]
    fn test_replay_errors_are_not_fatal() {
        let (out, summary) = run(1, "BOGUS\nPUT X 1\nGET\nPUT Y 2\nGET X\nGET Y\n");

        assert_eq!(
            out,
            "ERR unknown command 'BOGUS'\nOK\nERR wrong number of arguments for 'get' command\nOK\n(nil)\n2\n"
        );
        assert_eq!(summary.errors, 2);
        assert_eq!(summary.commands, 6);
    }

    #[test]
    fn test_del_and_clear() {
        let h = handler(4);

        assert_eq!(
            h.handle(Command::Put {
                key: "k".to_string(),
                value: "v".to_string(),
            }),
            Response::Ok
        );
        assert_eq!(h.handle(Command::Del { key: "k".to_string() }), Response::Integer(1));
        assert_eq!(h.handle(Command::Del { key: "k".to_string() }), Response::Integer(0));

        h.handle(Command::Get { key: "k".to_string() });
        h.handle(Command::Clear);
        assert_eq!(h.handle(Command::Len), Response::Integer(0));
        match h.handle(Command::Stats) {
            Response::Stats(s) => assert_eq!(s.misses, 0),
            other => panic!("unexpected response: {:?}", other),
        }
    }

    #[test]
    fn test_quiet_replay_writes_nothing() {
        let mut h = handler(2);
        let mut out = Vec::new();
        let summary = replay(&mut h, "PUT a 1\nGET a\n".as_bytes(), &mut out, true).unwrap();

        assert!(out.is_empty());
        assert_eq!(summary.stats.hits, 1);
    }

    #[test]
    fn test_summary_formats() {
        let (_, summary) = run(2, "PUT a 1\nGET a\nGET b\n");

        let text = summary.to_string();
        assert!(text.contains("entries:   1/2"));
        assert!(text.contains("hit ratio: 50.00%"));

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["capacity"], 2);
        assert_eq!(json["stats"]["misses"], 1);
    }
}
