use casino_predictor::Game;
use std::fmt;

/// Most rounds a single `sim` command may play.
pub const MAX_SIM_COUNT: usize = 100;

/// A parsed shell command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Help,
    Games,
    Stats,
    Quit,
    Tables(Game),
    Simulate {
        game: Game,
        table: Option<String>,
        count: usize,
    },
    Predict {
        game: Game,
        table: Option<String>,
    },
    History {
        game: Game,
        table: Option<String>,
    },
    Reset {
        game: Game,
        table: String,
    },
    /// Bare `chat`: every following line is a question until `back`.
    ChatMode,
    Chat(String),
}

/// Errors that can occur during command parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Command needs a game and none was given.
    MissingGame(&'static str),
    /// Game name outside the known four.
    InvalidGame(String),
    /// `reset` without a table.
    MissingTable,
    /// Round count that is not a number in 1..=100.
    InvalidCount(String),
    /// `history` only exists for roulette and blackjack.
    HistoryUnsupported(Game),
    /// Extra words after a complete command.
    UnexpectedArgument(String),
    /// Unrecognized command.
    UnrecognizedCommand(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingGame(usage) => write!(f, "Missing game. Usage: {}", usage),
            Self::InvalidGame(game) => write!(
                f,
                "Invalid game '{}'. Choose roulette, blackjack, poker or jackpot",
                game
            ),
            Self::MissingTable => {
                write!(f, "Reset requires a table (e.g., 'reset roulette table_1')")
            }
            Self::InvalidCount(value) => write!(
                f,
                "Invalid round count '{}'. Must be between 1 and {}",
                value, MAX_SIM_COUNT
            ),
            Self::HistoryUnsupported(game) => write!(
                f,
                "No history view for {}. Use 'history roulette' or 'history blackjack'",
                game
            ),
            Self::UnexpectedArgument(arg) => write!(f, "Unexpected argument '{}'", arg),
            Self::UnrecognizedCommand(cmd) => write!(
                f,
                "Unrecognized command '{}'. Type 'help' to see available commands",
                cmd
            ),
        }
    }
}

impl std::error::Error for ParseError {}

/// Parse a command line into a [`ShellCommand`].
///
/// Command words are case-insensitive; the text after `chat` is kept verbatim.
///
/// ```
/// use cp_shell::commands::{ShellCommand, parse_command};
/// use casino_predictor::Game;
///
/// assert_eq!(parse_command("games"), Ok(ShellCommand::Games));
/// assert_eq!(
///     parse_command("sim roulette table_2 5"),
///     Ok(ShellCommand::Simulate {
///         game: Game::Roulette,
///         table: Some("table_2".to_string()),
///         count: 5,
///     })
/// );
/// ```
pub fn parse_command(input: &str) -> Result<ShellCommand, ParseError> {
    let trimmed = input.trim();
    let parts: Vec<&str> = trimmed.split_ascii_whitespace().collect();
    let Some(first) = parts.first() else {
        return Err(ParseError::UnrecognizedCommand(String::new()));
    };
    let keyword = first.to_ascii_lowercase();
    let args = &parts[1..];

    match keyword.as_str() {
        "help" | "?" => no_args(args, ShellCommand::Help),
        "games" => no_args(args, ShellCommand::Games),
        "stats" => no_args(args, ShellCommand::Stats),
        "quit" | "exit" => no_args(args, ShellCommand::Quit),
        "tables" => {
            let game = parse_game(args.first(), "tables <game>")?;
            no_args(&args[1..], ShellCommand::Tables(game))
        }
        "sim" | "simulate" => parse_simulate(args),
        "predict" => {
            let game = parse_game(args.first(), "predict <game> [table]")?;
            let table = args.get(1).map(|t| t.to_string());
            no_args(args.get(2..).unwrap_or_default(), ShellCommand::Predict { game, table })
        }
        "history" => {
            let game = parse_game(args.first(), "history roulette|blackjack [table]")?;
            if !matches!(game, Game::Roulette | Game::Blackjack) {
                return Err(ParseError::HistoryUnsupported(game));
            }
            let table = args.get(1).map(|t| t.to_string());
            no_args(args.get(2..).unwrap_or_default(), ShellCommand::History { game, table })
        }
        "reset" => {
            let game = parse_game(args.first(), "reset <game> <table>")?;
            let table = args.get(1).ok_or(ParseError::MissingTable)?.to_string();
            no_args(&args[2..], ShellCommand::Reset { game, table })
        }
        "chat" => {
            let message = trimmed[first.len()..].trim();
            if message.is_empty() {
                Ok(ShellCommand::ChatMode)
            } else {
                Ok(ShellCommand::Chat(message.to_string()))
            }
        }
        _ => Err(ParseError::UnrecognizedCommand(trimmed.to_string())),
    }
}

fn no_args(rest: &[&str], command: ShellCommand) -> Result<ShellCommand, ParseError> {
    match rest.first() {
        Some(arg) => Err(ParseError::UnexpectedArgument(arg.to_string())),
        None => Ok(command),
    }
}

fn parse_game(word: Option<&&str>, usage: &'static str) -> Result<Game, ParseError> {
    let word = word.ok_or(ParseError::MissingGame(usage))?;
    word.parse()
        .map_err(|_| ParseError::InvalidGame(word.to_string()))
}

/// Parse "sim <game> [table] [count]". A lone number after the game is the count.
fn parse_simulate(args: &[&str]) -> Result<ShellCommand, ParseError> {
    let game = parse_game(args.first(), "sim <game> [table] [count]")?;
    let rest = args.get(1..).unwrap_or_default();

    let (table, count_word, extra) = match rest {
        [] => (None, None, None),
        [word] if word.chars().all(|c| c.is_ascii_digit()) => (None, Some(*word), None),
        [table] => (Some(*table), None, None),
        [table, count, extra @ ..] => (Some(*table), Some(*count), extra.first()),
    };
    if let Some(extra) = extra {
        return Err(ParseError::UnexpectedArgument(extra.to_string()));
    }

    let count = match count_word {
        Some(word) => word
            .parse::<usize>()
            .ok()
            .filter(|n| (1..=MAX_SIM_COUNT).contains(n))
            .ok_or_else(|| ParseError::InvalidCount(word.to_string()))?,
        None => 1,
    };

    Ok(ShellCommand::Simulate {
        game,
        table: table.map(str::to_string),
        count,
    })
}
