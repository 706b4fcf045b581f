use crate::cli::commands::{bound_message, close, open, report};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::models::ids::UserId;
use crate::models::signal::Signal;
use crate::ui::messages::info;

/// Handle `react` and `unreact`: update the board, then reconcile.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let mut coord = open(cfg)?;
    let message = bound_message(&coord)?;

    match cmd {
        Commands::React { user, token } => {
            let user = UserId(*user);
            coord.platform_mut().add_reaction(message, user, token)?;
            let outcome = coord.handle(Signal::added(user, message, token.as_str()));
            report(&outcome);
        }
        Commands::Unreact { user, token } => {
            let user = UserId(*user);
            if coord.platform_mut().remove_reaction(message, user, token) {
                let outcome = coord.handle(Signal::removed(user, message, token.as_str()));
                report(&outcome);
            } else {
                info(format!("User {} has no {} reaction", user, token));
            }
        }
        _ => {}
    }

    close(coord, cfg)
}
