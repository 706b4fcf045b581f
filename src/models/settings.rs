use crate::errors::{AppError, AppResult};
use crate::models::occurrence::{Occurrence, localize};
use crate::utils::date::{parse_date, parse_timezone, parse_weekday};
use crate::utils::time::parse_time_arg;
use serde::{Deserialize, Serialize};

/// Presentation and scheduling details of the game night.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventSettings {
    pub title: String,
    pub tagline: String,
    pub footer: String,
    pub location: String,
    pub duration_minutes: i64,
    /// Self-delete delay of the channel post used when a DM cannot be sent.
    pub transient_notice_secs: u64,
}

impl Default for EventSettings {
    fn default() -> Self {
        Self {
            title: "🕐 Blood on the Clocktower - Weekly Game Night".to_string(),
            tagline: "React to join the game! First come, first served.".to_string(),
            footer: "May the odds be in your favor! 🎲".to_string(),
            location: "Voice Channel".to_string(),
            duration_minutes: 180,
            transient_notice_secs: 10,
        }
    }
}

impl EventSettings {
    /// Longest event accepted: one week.
    pub const MAX_DURATION_MINUTES: i64 = 7 * 24 * 60;

    pub fn validate(&self) -> AppResult<()> {
        if !(1..=Self::MAX_DURATION_MINUTES).contains(&self.duration_minutes) {
            return Err(AppError::Config(format!(
                "duration_minutes must be between 1 and {}, got {}",
                Self::MAX_DURATION_MINUTES,
                self.duration_minutes
            )));
        }
        Ok(())
    }
}

/// Default recurring rule, as written in the configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Schedule {
    pub weekday: String,
    pub time: String,
    pub timezone: String,
}

impl Default for Schedule {
    fn default() -> Self {
        Self {
            weekday: "thursday".to_string(),
            time: "19:30".to_string(),
            timezone: "Europe/London".to_string(),
        }
    }
}

impl Schedule {
    /// Validate every field and build the recurring occurrence.
    pub fn rule(&self) -> AppResult<Occurrence> {
        let weekday = parse_weekday(&self.weekday)?;
        let time = parse_time_arg(&self.time)?;
        let tz = parse_timezone(&self.timezone)?;
        Ok(Occurrence::recurring(weekday, time, tz))
    }

    /// One-off occurrence on `date` at this schedule's time and timezone.
    pub fn on_date(&self, date: &str) -> AppResult<Occurrence> {
        let day = parse_date(date).ok_or_else(|| AppError::InvalidDate(date.to_string()))?;
        let time = parse_time_arg(&self.time)?;
        let tz = parse_timezone(&self.timezone)?;
        Ok(Occurrence::one_off(localize(&tz, day.and_time(time))?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_must_be_positive_and_bounded() {
        assert!(EventSettings::default().validate().is_ok());
        for minutes in [0, -1, EventSettings::MAX_DURATION_MINUTES + 1] {
            let settings = EventSettings {
                duration_minutes: minutes,
                ..EventSettings::default()
            };
            assert!(matches!(settings.validate(), Err(AppError::Config(_))));
        }
    }

    #[test]
    fn default_schedule_is_valid() {
        let rule = Schedule::default().rule().unwrap();
        assert_eq!(
            rule,
            Occurrence::Recurring {
                weekday: 3,
                hour: 19,
                minute: 30,
                timezone: "Europe/London".into()
            }
        );
    }

    #[test]
    fn each_field_is_validated() {
        let bad_day = Schedule {
            weekday: "funday".into(),
            ..Schedule::default()
        };
        assert!(matches!(bad_day.rule(), Err(AppError::InvalidWeekday(_))));

        let bad_time = Schedule {
            time: "half past".into(),
            ..Schedule::default()
        };
        assert!(matches!(bad_time.rule(), Err(AppError::InvalidTime(_))));

        let bad_tz = Schedule {
            timezone: "Atlantis/Central".into(),
            ..Schedule::default()
        };
        assert!(matches!(bad_tz.rule(), Err(AppError::InvalidTimezone(_))));
    }

    #[test]
    fn one_off_date() {
        let occ = Schedule::default().on_date("2026-12-24").unwrap();
        match occ {
            Occurrence::Override { at, timezone } => {
                assert_eq!(at.to_rfc3339(), "2026-12-24T19:30:00+00:00");
                assert_eq!(timezone, "Europe/London");
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(matches!(
            Schedule::default().on_date("24/12/2026"),
            Err(AppError::InvalidDate(_))
        ));
    }
}
