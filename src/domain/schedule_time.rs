use std::fmt;
use std::str::FromStr;

use crate::domain::AppError;

/// Daily time of day at which the download pipeline is scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleTime {
    hour: u8,
    minute: u8,
}

impl ScheduleTime {
    pub fn new(hour: u8, minute: u8) -> Result<Self, AppError> {
        if hour > 23 || minute > 59 {
            return Err(AppError::InvalidScheduleTime(format!("{}:{}", hour, minute)));
        }
        Ok(Self { hour, minute })
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }

    /// Cron expression firing once a day at this time.
    pub fn daily_cron(&self) -> String {
        format!("{} {} * * *", self.minute, self.hour)
    }
}

impl Default for ScheduleTime {
    fn default() -> Self {
        Self { hour: 1, minute: 0 }
    }
}

impl FromStr for ScheduleTime {
    type Err = AppError;

    /// Parse an `HOUR:MINUTE` string.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || AppError::InvalidScheduleTime(s.to_string());
        let (hour, minute) = s.split_once(':').ok_or_else(invalid)?;
        if minute.contains(':') {
            return Err(invalid());
        }
        let hour: u8 = hour.parse().map_err(|_| invalid())?;
        let minute: u8 = minute.parse().map_err(|_| invalid())?;
        if hour > 23 || minute > 59 {
            return Err(invalid());
        }
        Ok(Self { hour, minute })
    }
}

impl fmt::Display for ScheduleTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{:02}", self.hour, self.minute)
    }
}
