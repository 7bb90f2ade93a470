use crate::ConfigError;
use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

const MAX_WINDOW_DAYS: i64 = 365;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    pub version: u32,
    #[serde(default)]
    pub extraction: ExtractionConfig,
    #[serde(default)]
    pub follow_up: FollowUpConfig,
    #[serde(default)]
    pub calendar: CalendarConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExtractionConfig {
    pub max_action_items: usize,
    pub min_action_chars: usize,
    pub max_action_chars: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FollowUpConfig {
    pub sent_folder: String,
    pub window_days: i64,
    pub grace_days: i64,
    pub firm_after_days: i64,
    pub urgent_after_days: i64,
    pub max_results: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CalendarConfig {
    pub default_duration_minutes: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct UiConfig {
    /// IANA zone name; UTC when unset.
    pub timezone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoggingConfig {
    pub filter: String,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            max_action_items: 5,
            min_action_chars: 10,
            max_action_chars: 200,
        }
    }
}

impl Default for FollowUpConfig {
    fn default() -> Self {
        Self {
            sent_folder: "SENT".to_string(),
            window_days: 14,
            grace_days: 2,
            firm_after_days: 7,
            urgent_after_days: 10,
            max_results: 5,
        }
    }
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            default_duration_minutes: 60,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: 1,
            extraction: ExtractionConfig::default(),
            follow_up: FollowUpConfig::default(),
            calendar: CalendarConfig::default(),
            ui: UiConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let extraction = &self.extraction;
        if extraction.min_action_chars > extraction.max_action_chars {
            return Err(ConfigError::Invalid(format!(
                "extraction.min_action_chars ({}) exceeds max_action_chars ({})",
                extraction.min_action_chars, extraction.max_action_chars
            )));
        }

        let follow_up = &self.follow_up;
        if follow_up.window_days < 1 || follow_up.window_days > MAX_WINDOW_DAYS {
            return Err(ConfigError::Invalid(format!(
                "follow_up.window_days ({}) must lie within 1..={MAX_WINDOW_DAYS}",
                follow_up.window_days
            )));
        }
        if follow_up.grace_days < 0 || follow_up.grace_days > follow_up.window_days {
            return Err(ConfigError::Invalid(format!(
                "follow_up.grace_days ({}) must lie within 0..=window_days ({})",
                follow_up.grace_days, follow_up.window_days
            )));
        }
        if follow_up.firm_after_days > follow_up.urgent_after_days {
            return Err(ConfigError::Invalid(
                "follow_up.firm_after_days must not exceed urgent_after_days".to_string(),
            ));
        }
        if self.calendar.default_duration_minutes == 0 {
            return Err(ConfigError::Invalid(
                "calendar.default_duration_minutes must be positive".to_string(),
            ));
        }

        self.timezone().map(|_| ())
    }

    pub fn timezone(&self) -> Result<Tz, ConfigError> {
        match self.ui.timezone.as_deref() {
            None => Ok(Tz::UTC),
            Some(name) => name
                .parse::<Tz>()
                .map_err(|_| ConfigError::InvalidTimezone(name.to_string())),
        }
    }

    /// The user's calendar date at `now`, which relative phrases resolve against.
    pub fn reference_date(&self, now: DateTime<Utc>) -> Result<NaiveDate, ConfigError> {
        Ok(now.with_timezone(&self.timezone()?).date_naive())
    }
}

#[cfg(test)]
mod tests {
    use super::AppConfig;
    use crate::ConfigError;
    use chrono::{NaiveDate, TimeZone, Utc};

    #[test]
    fn defaults_validate() {
        AppConfig::default().validate().expect("defaults are valid");
    }

    #[test]
    fn reference_date_follows_timezone() {
        let now = Utc.with_ymd_and_hms(2026, 10, 16, 23, 30, 0).unwrap();
        let mut config = AppConfig::default();
        assert_eq!(
            config.reference_date(now).expect("utc"),
            NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
        );

        config.ui.timezone = Some("Europe/Berlin".to_string());
        assert_eq!(
            config.reference_date(now).expect("berlin"),
            NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
        );
    }

    #[test]
    fn unknown_timezone_is_rejected() {
        let mut config = AppConfig::default();
        config.ui.timezone = Some("Mars/Olympus".to_string());
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidTimezone(name)) if name == "Mars/Olympus"
        ));
    }

    #[test]
    fn inverted_bounds_are_rejected() {
        let mut config = AppConfig::default();
        config.extraction.min_action_chars = 300;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = AppConfig::default();
        config.follow_up.firm_after_days = 12;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn follow_up_window_is_bounded() {
        let mut config = AppConfig::default();
        config.follow_up.window_days = 365;
        assert!(config.validate().is_ok());

        config.follow_up.window_days = i64::MAX;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        config.follow_up.window_days = 0;
        config.follow_up.grace_days = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn missing_sections_take_defaults() {
        let config: AppConfig = toml::from_str(
            "version = 1\n[follow_up]\nsent_folder = \"Sent Items\"\nwindow_days = 21\ngrace_days = 3\nfirm_after_days = 7\nurgent_after_days = 10\nmax_results = 5\n",
        )
        .expect("config parsed");
        assert_eq!(config.follow_up.window_days, 21);
        assert_eq!(config.extraction.max_action_items, 5);
        assert_eq!(config.logging.filter, "info");
    }
}
