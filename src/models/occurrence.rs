use crate::errors::{AppError, AppResult};
use chrono::{
    DateTime, Datelike, Duration, FixedOffset, NaiveDateTime, NaiveTime, TimeZone, Utc, Weekday,
};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// When the next game takes place.
///
/// A recurring rule is resolved against the current time; an override is a
/// one-off timestamp that wins over the rule while it is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Occurrence {
    Recurring {
        /// 0 = Monday … 6 = Sunday
        weekday: u8,
        hour: u32,
        minute: u32,
        timezone: String,
    },
    Override {
        at: DateTime<FixedOffset>,
        timezone: String,
    },
}

impl Occurrence {
    pub fn recurring(weekday: Weekday, time: NaiveTime, tz: Tz) -> Self {
        use chrono::Timelike;
        Occurrence::Recurring {
            weekday: weekday.num_days_from_monday() as u8,
            hour: time.hour(),
            minute: time.minute(),
            timezone: tz.name().to_string(),
        }
    }

    pub fn one_off(at: DateTime<Tz>) -> Self {
        Occurrence::Override {
            timezone: at.timezone().name().to_string(),
            at: at.fixed_offset(),
        }
    }

    pub fn timezone(&self) -> AppResult<Tz> {
        let name = match self {
            Occurrence::Recurring { timezone, .. } | Occurrence::Override { timezone, .. } => {
                timezone
            }
        };
        name.parse::<Tz>()
            .map_err(|_| AppError::InvalidTimezone(name.clone()))
    }

    pub fn is_override(&self) -> bool {
        matches!(self, Occurrence::Override { .. })
    }

    /// Next start strictly after `now`. Overrides are returned unchanged.
    pub fn next_after(&self, now: DateTime<Utc>) -> AppResult<DateTime<FixedOffset>> {
        match self {
            Occurrence::Override { at, .. } => Ok(*at),
            Occurrence::Recurring {
                weekday,
                hour,
                minute,
                ..
            } => {
                let tz = self.timezone()?;
                let target = Weekday::try_from(*weekday)
                    .map_err(|_| AppError::Occurrence(format!("weekday index {} out of range", weekday)))?;
                let time = NaiveTime::from_hms_opt(*hour, *minute, 0).ok_or_else(|| {
                    AppError::Occurrence(format!("invalid time {:02}:{:02}", hour, minute))
                })?;

                let today = now.with_timezone(&tz).date_naive();
                let days_ahead = (target.num_days_from_monday() as i64
                    - today.weekday().num_days_from_monday() as i64)
                    .rem_euclid(7);

                let date = today + Duration::days(days_ahead);
                let mut candidate = localize(&tz, date.and_time(time))?;
                if candidate.with_timezone(&Utc) <= now {
                    candidate = localize(&tz, (date + Duration::days(7)).and_time(time))?;
                }

                Ok(candidate.fixed_offset())
            }
        }
    }
}

/// Resolve a wall-clock time in `tz`. Ambiguous times take the earlier
/// instant; times skipped by a DST jump move forward one hour.
pub fn localize(tz: &Tz, naive: NaiveDateTime) -> AppResult<DateTime<Tz>> {
    tz.from_local_datetime(&naive)
        .earliest()
        .or_else(|| tz.from_local_datetime(&(naive + Duration::hours(1))).earliest())
        .ok_or_else(|| AppError::Occurrence(format!("{} does not exist in {}", naive, tz.name())))
}
