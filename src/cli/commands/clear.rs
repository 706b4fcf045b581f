use crate::cli::commands::{close, open};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::ui::messages::{info, success, warning};
use std::io::{self, Write};

fn confirm(prompt: &str) -> bool {
    warning(prompt);
    print!("Continue? [y/N]: ");
    io::stdout().flush().ok();

    let mut answer = String::new();
    if io::stdin().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

/// Handle `clear` and `reset`.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    match cmd {
        Commands::Clear => {
            let mut coord = open(cfg)?;
            coord.clear_roster()?;
            close(coord, cfg)?;
            success("Roster cleared.");
        }
        Commands::Reset { yes } => {
            if !*yes && !confirm("This empties the roster and forgets the signup message and event.") {
                info("Reset cancelled.");
                return Ok(());
            }
            let mut coord = open(cfg)?;
            coord.full_reset()?;
            close(coord, cfg)?;
            success("Roster and bindings reset.");
        }
        _ => {}
    }
    Ok(())
}
