use crate::cli::commands::{close, open};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::SetupRequest;
use crate::core::summary::format_occurrence;
use crate::errors::AppResult;
use crate::models::ids::ChannelId;
use crate::ui::messages::{success, warning};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Setup {
        channel,
        day,
        time,
        tz,
        date,
    } = cmd
    {
        let mut coord = open(cfg)?;
        let report = coord.setup(SetupRequest {
            channel: ChannelId(*channel),
            weekday: day.clone(),
            time: time.clone(),
            timezone: tz.clone(),
            date: date.clone(),
        })?;
        close(coord, cfg)?;

        success(format!(
            "Signup posted as message {} in channel {}",
            report.message, report.channel
        ));
        success(format!(
            "Next game: {}",
            format_occurrence(report.starts_at).formatted
        ));
        match report.event {
            Some(event) => success(format!("Scheduled event {} created", event)),
            None => warning("Scheduled event could not be created"),
        }
    }
    Ok(())
}
