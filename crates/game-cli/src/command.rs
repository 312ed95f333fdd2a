use prediction_game::Direction;

/// One line of player input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Predict(Direction),
    NextDay,
    Reset,
    Quit,
    Help,
    /// Anything else, treated as a ticker when no game is running
    Text(String),
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        match trimmed.to_lowercase().as_str() {
            "n" | "next" => Command::NextDay,
            "r" | "reset" => Command::Reset,
            "q" | "quit" | "exit" => Command::Quit,
            "?" | "h" | "help" => Command::Help,
            other => match other.parse::<Direction>() {
                Ok(direction) => Command::Predict(direction),
                Err(_) => Command::Text(trimmed.to_string()),
            },
        }
    }
}

pub const HELP: &str = "Commands: [u]p, [d]own, [n]ext day, [r]eset, [q]uit";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("u"), Command::Predict(Direction::Up));
        assert_eq!(Command::parse(" DOWN\n"), Command::Predict(Direction::Down));
        assert_eq!(Command::parse("n"), Command::NextDay);
        assert_eq!(Command::parse("Reset"), Command::Reset);
        assert_eq!(Command::parse("q"), Command::Quit);
        assert_eq!(Command::parse("?"), Command::Help);
        assert_eq!(Command::parse(" msft "), Command::Text("msft".to_string()));
        assert_eq!(Command::parse(""), Command::Text(String::new()));
    }
}
