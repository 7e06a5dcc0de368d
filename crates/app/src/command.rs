//! Line commands of the terminal front-end.

use campaign_core::Pubkey;
use thiserror::Error;

use crate::update::Msg;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Dispatch(Msg),
    Show,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command `{0}`, try `help`")]
    Unknown(String),
    #[error("`{0}` needs a campaign address")]
    MissingAddress(&'static str),
    #[error("invalid campaign address `{0}`")]
    InvalidAddress(String),
}

pub const HELP: &str = "\
commands:
  connect                 connect the wallet
  name <text>             set the campaign name
  description <text>      set the campaign description
  create                  create a campaign from the name and description
  list                    fetch all campaigns
  donate <address>        donate 0.2 SOL to a campaign
  withdraw <address>      withdraw 0.2 SOL from your campaign
  show                    render the current view
  quit                    exit";

/// Parse one input line. Empty lines re-render the view.
pub fn parse_command(line: &str) -> Result<Command, CommandError> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word {
        "" | "show" => Command::Show,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        "connect" => Command::Dispatch(Msg::ConnectClicked),
        "name" => Command::Dispatch(Msg::NameChanged(rest.to_string())),
        "description" => Command::Dispatch(Msg::DescriptionChanged(rest.to_string())),
        "create" => Command::Dispatch(Msg::CreateClicked),
        "list" | "refresh" => Command::Dispatch(Msg::RefreshClicked),
        "donate" => Command::Dispatch(Msg::DonateClicked(address("donate", rest)?)),
        "withdraw" => Command::Dispatch(Msg::WithdrawClicked(address("withdraw", rest)?)),
        other => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(command)
}

fn address(command: &'static str, arg: &str) -> Result<Pubkey, CommandError> {
    if arg.is_empty() {
        return Err(CommandError::MissingAddress(command));
    }
    arg.parse()
        .map_err(|_| CommandError::InvalidAddress(arg.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_fields_keep_inner_spaces() {
        assert_eq!(
            parse_command("name  Fix the roof "),
            Ok(Command::Dispatch(Msg::NameChanged("Fix the roof".into())))
        );
        assert_eq!(
            parse_command("description"),
            Ok(Command::Dispatch(Msg::DescriptionChanged(String::new())))
        );
    }

    #[test]
    fn test_address_commands() {
        let key = Pubkey::new([6u8; 32]);
        assert_eq!(
            parse_command(&format!("donate {key}")),
            Ok(Command::Dispatch(Msg::DonateClicked(key)))
        );
        assert_eq!(
            parse_command(&format!("withdraw {key}")),
            Ok(Command::Dispatch(Msg::WithdrawClicked(key)))
        );
        assert_eq!(parse_command("donate"), Err(CommandError::MissingAddress("donate")));
        assert!(matches!(
            parse_command("withdraw not-a-key"),
            Err(CommandError::InvalidAddress(_))
        ));
    }

    #[test]
    fn test_plain_commands() {
        assert_eq!(parse_command("connect"), Ok(Command::Dispatch(Msg::ConnectClicked)));
        assert_eq!(parse_command("create"), Ok(Command::Dispatch(Msg::CreateClicked)));
        assert_eq!(parse_command("list"), Ok(Command::Dispatch(Msg::RefreshClicked)));
        assert_eq!(parse_command(""), Ok(Command::Show));
        assert_eq!(parse_command("quit"), Ok(Command::Quit));
        assert_eq!(parse_command("fly"), Err(CommandError::Unknown("fly".into())));
    }
}
