//! Line-oriented command parsing

use thiserror::Error;

/// One replayable cache command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Put { key: String, value: String },
    Get { key: String },
    Del { key: String },
    Len,
    Stats,
    Clear,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command '{0}'")]
    Unknown(String),

    #[error("wrong number of arguments for '{0}' command")]
    WrongArity(&'static str),
}

impl Command {
    /// Parse one line. Blank lines and `#` comments yield `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Self>, CommandError> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }

        let (verb, rest) = split_word(line);
        let command = match verb.to_uppercase().as_str() {
            "PUT" | "SET" => {
                let (key, value) = split_word(rest);
                if key.is_empty() || value.is_empty() {
                    return Err(CommandError::WrongArity("put"));
                }
                Command::Put {
                    key: key.to_string(),
                    value: value.to_string(),
                }
            }
            "GET" => Command::Get {
                key: single_arg(rest, "get")?,
            },
            "DEL" => Command::Del {
                key: single_arg(rest, "del")?,
            },
            "LEN" => no_args(rest, "len", Command::Len)?,
            "STATS" => no_args(rest, "stats", Command::Stats)?,
            "CLEAR" => no_args(rest, "clear", Command::Clear)?,
            _ => return Err(CommandError::Unknown(verb.to_string())),
        };

        Ok(Some(command))
    }
}

fn split_word(s: &str) -> (&str, &str) {
    match s.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim_start()),
        None => (s, ""),
    }
}

fn single_arg(rest: &str, name: &'static str) -> Result<String, CommandError> {
    match split_word(rest) {
        (key, "") if !key.is_empty() => Ok(key.to_string()),
        _ => Err(CommandError::WrongArity(name)),
    }
}

fn no_args(rest: &str, name: &'static str, command: Command) -> Result<Command, CommandError> {
    if rest.is_empty() {
        Ok(command)
    } else {
        Err(CommandError::WrongArity(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_put_keeps_spaces_in_value() {
        let cmd = Command::parse("PUT user:1 Alice Smith").unwrap();
        assert_eq!(
            cmd,
            Some(Command::Put {
                key: "user:1".to_string(),
                value: "Alice Smith".to_string(),
            })
        );
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(
            Command::parse("  get k  ").unwrap(),
            Some(Command::Get { key: "k".to_string() })
        );
        assert_eq!(
            Command::parse("set k v").unwrap(),
            Some(Command::Put {
                key: "k".to_string(),
                value: "v".to_string(),
            })
        );
        assert_eq!(Command::parse("Len").unwrap(), Some(Command::Len));
    }

    #[test]
    fn test_parse_skips_blank_and_comments() {
        assert_eq!(Command::parse("").unwrap(), None);
        assert_eq!(Command::parse("   ").unwrap(), None);
        assert_eq!(Command::parse("# warmup").unwrap(), None);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            Command::parse("FETCH k"),
            Err(CommandError::Unknown("FETCH".to_string()))
        );
        assert_eq!(Command::parse("PUT k"), Err(CommandError::WrongArity("put")));
        assert_eq!(Command::parse("GET"), Err(CommandError::WrongArity("get")));
        assert_eq!(Command::parse("GET a b"), Err(CommandError::WrongArity("get")));
        assert_eq!(Command::parse("DEL"), Err(CommandError::WrongArity("del")));
        assert_eq!(Command::parse("LEN 3"), Err(CommandError::WrongArity("len")));
    }
}
