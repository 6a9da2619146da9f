use crate::ui::{ColumnFilter, ListError};
use std::str::FromStr;
use thiserror::Error;

pub const HELP: &str = "\
Navigation:  go <location> | home | conversations | alerts | back | refresh
Lists:       open <n> | first | prev | next | last | size <10|25|50> | action <n>
             search <text> | clear | sort <column> | filter <column> <text|min..max> | unfilter <column>
Alerts:      open P<n> | open R<n>
Other:       help | quit";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Go(String),
    Back,
    Refresh,
    Open(String),
    First,
    Prev,
    Next,
    Last,
    Size(u32),
    Action(usize),
    Search(String),
    Clear,
    Sort(String),
    Filter { column: String, filter: ColumnFilter },
    Unfilter(String),
    Help,
    Quit,
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Unknown command: {0}")]
    Unknown(String),
    #[error("`{0}` needs an argument")]
    MissingArgument(&'static str),
    #[error("Not a number: {0}")]
    InvalidNumber(String),
    #[error("`{0}` does nothing on this screen")]
    NotHere(&'static str),
    #[error("Nothing matches {0}")]
    NoSuchItem(String),
    #[error(transparent)]
    List(#[from] ListError),
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Go(_) => "go",
            Command::Back => "back",
            Command::Refresh => "refresh",
            Command::Open(_) => "open",
            Command::First => "first",
            Command::Prev => "prev",
            Command::Next => "next",
            Command::Last => "last",
            Command::Size(_) => "size",
            Command::Action(_) => "action",
            Command::Search(_) => "search",
            Command::Clear => "clear",
            Command::Sort(_) => "sort",
            Command::Filter { .. } => "filter",
            Command::Unfilter(_) => "unfilter",
            Command::Help => "help",
            Command::Quit => "quit",
        }
    }
}

fn required<'a>(arg: &'a str, command: &'static str) -> Result<&'a str, CommandError> {
    if arg.is_empty() {
        Err(CommandError::MissingArgument(command))
    } else {
        Ok(arg)
    }
}

fn number<T: FromStr>(arg: &str, command: &'static str) -> Result<T, CommandError> {
    required(arg, command)?
        .parse()
        .map_err(|_| CommandError::InvalidNumber(arg.to_string()))
}

/// `a..b`, `a..` or `..b` with numeric bounds; anything else is a text filter.
fn parse_filter(value: &str) -> ColumnFilter {
    if let Some((min, max)) = value.split_once("..") {
        let bound = |s: &str| -> Result<Option<f64>, ()> {
            let s = s.trim();
            if s.is_empty() {
                Ok(None)
            } else {
                s.parse().map(Some).map_err(|_| ())
            }
        };
        if let (Ok(min), Ok(max)) = (bound(min), bound(max))
            && (min.is_some() || max.is_some())
        {
            return ColumnFilter::Range { min, max };
        }
    }
    ColumnFilter::Contains(value.to_string())
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        Ok(match word.to_lowercase().as_str() {
            "go" => Command::Go(required(rest, "go")?.to_string()),
            "home" => Command::Go("/".to_string()),
            "conversations" => Command::Go("/conversations".to_string()),
            "alerts" => Command::Go("/alerts".to_string()),
            "back" => Command::Back,
            "refresh" | "reload" => Command::Refresh,
            "open" => Command::Open(required(rest, "open")?.to_string()),
            "first" => Command::First,
            "prev" | "previous" => Command::Prev,
            "next" => Command::Next,
            "last" => Command::Last,
            "size" => Command::Size(number(rest, "size")?),
            "action" => Command::Action(number(rest, "action")?),
            "search" => Command::Search(required(rest, "search")?.to_string()),
            "clear" => Command::Clear,
            "sort" => Command::Sort(required(rest, "sort")?.to_string()),
            "filter" => {
                let (column, value) = required(rest, "filter")?
                    .split_once(char::is_whitespace)
                    .ok_or(CommandError::MissingArgument("filter"))?;
                Command::Filter {
                    column: column.to_string(),
                    filter: parse_filter(value.trim()),
                }
            }
            "unfilter" => Command::Unfilter(required(rest, "unfilter")?.to_string()),
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            _ => return Err(CommandError::Unknown(word.to_string())),
        })
    }
}
