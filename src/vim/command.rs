use thiserror::Error;

/// Commands accepted on the `:` line of the wizard
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Next,
    Back,
    Skip,
    Expand,
    Refresh,
    Encrypt,
    Help,
    Quit,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CommandError {
    #[error("Unknown command: {0}")]
    Unknown(String),
}

pub fn parse_command(input: &str) -> Result<Command, CommandError> {
    let input = input.trim().to_lowercase();
    let cmd = input.split_whitespace().next().unwrap_or("");

    match cmd {
        "next" | "n" => Ok(Command::Next),
        "back" | "prev" | "b" => Ok(Command::Back),
        "skip" | "s" => Ok(Command::Skip),
        "expand" | "submit" | "x" => Ok(Command::Expand),
        "refresh" | "r" => Ok(Command::Refresh),
        "encrypt" | "e" => Ok(Command::Encrypt),
        "help" | "h" | "?" => Ok(Command::Help),
        "q" | "quit" | "exit" | "cancel" => Ok(Command::Quit),
        "" => Err(CommandError::Unknown("empty command".to_string())),
        other => Err(CommandError::Unknown(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_aliases() {
        assert_eq!(parse_command("n"), Ok(Command::Next));
        assert_eq!(parse_command("  Expand "), Ok(Command::Expand));
        assert_eq!(parse_command("skip now"), Ok(Command::Skip));
        assert_eq!(parse_command("quit"), Ok(Command::Quit));
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(
            parse_command("reboot"),
            Err(CommandError::Unknown("reboot".to_string()))
        );
        assert!(parse_command("").is_err());
    }
}
