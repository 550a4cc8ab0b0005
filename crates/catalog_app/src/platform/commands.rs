use catalog_core::{EnrichmentStatus, RecordId, SortColumn, ALL_SENTINEL};

pub const HELP: &str = "\
commands:
  search <text>              filter by name (empty clears)
  genre <value|all>          filter by genre
  status <value|all>         filter by enrichment status
  sort name|release_date     cycle a column: ascending, descending, off
  show <id>                  load one game with its description
  list                       print the current table
  help                       this text
  quit                       exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Search(String),
    Genre(String),
    Status(String),
    Sort(SortColumn),
    Show(RecordId),
    List,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("unknown command '{0}' (try 'help')")]
    Unknown(String),
    #[error("'{0}' needs an argument")]
    MissingArgument(&'static str),
    #[error("cannot sort by '{0}' (name or release_date)")]
    InvalidSortColumn(String),
    #[error("unknown status '{0}'")]
    InvalidStatus(String),
    #[error("'{0}' is not a game id")]
    InvalidId(String),
}

/// Parses one input line. Blank lines yield `None`.
pub fn parse(line: &str) -> Option<Result<Command, CommandError>> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };
    Some(parse_verb(verb, rest))
}

fn parse_verb(verb: &str, rest: &str) -> Result<Command, CommandError> {
    match verb {
        "search" | "s" => Ok(Command::Search(rest.to_string())),
        "genre" | "g" => required(rest, "genre").map(|value| Command::Genre(value.to_string())),
        "status" => {
            let value = required(rest, "status")?;
            let known = value == ALL_SENTINEL
                || EnrichmentStatus::ALL
                    .iter()
                    .any(|status| status.as_str() == value);
            if known {
                Ok(Command::Status(value.to_string()))
            } else {
                Err(CommandError::InvalidStatus(value.to_string()))
            }
        }
        "sort" => {
            let value = required(rest, "sort")?;
            SortColumn::parse(value)
                .map(Command::Sort)
                .ok_or_else(|| CommandError::InvalidSortColumn(value.to_string()))
        }
        "show" => {
            let value = required(rest, "show")?;
            value
                .parse()
                .map(Command::Show)
                .map_err(|_| CommandError::InvalidId(value.to_string()))
        }
        "list" | "ls" => Ok(Command::List),
        "help" | "?" => Ok(Command::Help),
        "quit" | "q" | "exit" => Ok(Command::Quit),
        other => Err(CommandError::Unknown(other.to_string())),
    }
}

fn required<'a>(value: &'a str, verb: &'static str) -> Result<&'a str, CommandError> {
    if value.is_empty() {
        Err(CommandError::MissingArgument(verb))
    } else {
        Ok(value)
    }
}
