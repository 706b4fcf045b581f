use crate::cli::commands::{bound_message, close, open, report};
use crate::collab::LocalBoard;
use crate::config::Config;
use crate::core::Coordinator;
use crate::core::liveness::{Heartbeat, snapshot_probe};
use crate::errors::{AppError, AppResult};
use crate::models::ids::{MessageId, UserId};
use crate::models::signal::Signal;
use crate::ui::messages::{info, warning};
use std::io::{self, BufRead};
use std::time::Duration;

enum Command {
    Add(UserId, String),
    Remove(UserId, String),
}

fn parse_line(line: &str) -> AppResult<Option<Command>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let mut parts = line.split_whitespace();
    let (Some(verb), Some(user), Some(token), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(AppError::Other(format!(
            "expected `add|remove <user> <token>`, got '{line}'"
        )));
    };
    let user: UserId = user
        .parse()
        .map_err(|_| AppError::Other(format!("invalid user id '{user}'")))?;

    match verb {
        "add" => Ok(Some(Command::Add(user, token.to_string()))),
        "remove" => Ok(Some(Command::Remove(user, token.to_string()))),
        other => Err(AppError::Other(format!("unknown action '{other}'"))),
    }
}

fn apply(coord: &mut Coordinator<LocalBoard>, message: MessageId, command: Command) -> AppResult<()> {
    let signal = match command {
        Command::Add(user, token) => {
            coord.platform_mut().add_reaction(message, user, &token)?;
            Signal::added(user, message, token)
        }
        Command::Remove(user, token) => {
            if !coord.platform_mut().remove_reaction(message, user, &token) {
                info(format!("User {} has no {} reaction", user, token));
                return Ok(());
            }
            Signal::removed(user, message, token)
        }
    };
    report(&coord.handle(signal));
    Ok(())
}

/// Reconcile stdin lines one at a time until EOF, with a liveness thread
/// running alongside.
pub fn handle(cfg: &Config) -> AppResult<()> {
    let mut coord = open(cfg)?;
    let message = bound_message(&coord)?;

    let interval = Duration::from_secs(cfg.heartbeat_secs.max(1));
    let heartbeat = Heartbeat::spawn(interval, snapshot_probe(cfg.snapshot_path()))?;
    info(format!("Listening on message {message}; one `add|remove <user> <token>` per line"));

    for line in io::stdin().lock().lines() {
        let line = line?;
        let result = parse_line(&line).and_then(|cmd| match cmd {
            Some(cmd) => apply(&mut coord, message, cmd),
            None => Ok(()),
        });
        if let Err(e) = result {
            warning(e);
            continue;
        }
        coord.platform().save(&cfg.board_path())?;
    }

    heartbeat.stop();
    close(coord, cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_actions() {
        assert!(matches!(
            parse_line("add 42 ⚔️").unwrap(),
            Some(Command::Add(UserId(42), t)) if t == "⚔️"
        ));
        assert!(matches!(
            parse_line("  remove 7 👀 ").unwrap(),
            Some(Command::Remove(UserId(7), _))
        ));
        assert!(parse_line("").unwrap().is_none());
        assert!(parse_line("# comment").unwrap().is_none());
    }

    #[test]
    fn rejects_malformed_lines() {
        assert!(parse_line("add 42").is_err());
        assert!(parse_line("add bob ⚔️").is_err());
        assert!(parse_line("poke 1 ⚔️").is_err());
        assert!(parse_line("add 1 ⚔️ extra").is_err());
    }
}
