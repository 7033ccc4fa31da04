use std::env;
use tracing::warn;

/// Default minimum notice before a slot may be booked, in hours.
pub const DEFAULT_LEAD_TIME_HOURS: i64 = 24;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub store_url: String,
    pub store_api_key: String,
    pub lead_time_hours: i64,
    pub calendar_api_base_url: String,
    pub calendar_api_token: String,
    pub mail_relay_url: String,
    pub mail_relay_token: String,
    pub sender_email: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            store_url: env::var("STORE_URL").unwrap_or_else(|_| {
                warn!("STORE_URL not set, using empty value");
                String::new()
            }),
            store_api_key: env::var("STORE_API_KEY").unwrap_or_else(|_| {
                warn!("STORE_API_KEY not set, using empty value");
                String::new()
            }),
            lead_time_hours: env::var("LEAD_TIME_HOURS")
                .ok()
                .and_then(|raw| match raw.parse::<i64>() {
                    Ok(hours) if hours >= 0 => Some(hours),
                    _ => {
                        warn!("LEAD_TIME_HOURS is not a non-negative integer, using default");
                        None
                    }
                })
                .unwrap_or(DEFAULT_LEAD_TIME_HOURS),
            calendar_api_base_url: env::var("CALENDAR_API_BASE_URL").unwrap_or_else(|_| {
                warn!("CALENDAR_API_BASE_URL not set, using default");
                "https://www.googleapis.com/calendar/v3".to_string()
            }),
            calendar_api_token: env::var("CALENDAR_API_TOKEN").unwrap_or_else(|_| {
                warn!("CALENDAR_API_TOKEN not set, using empty value");
                String::new()
            }),
            mail_relay_url: env::var("MAIL_RELAY_URL").unwrap_or_else(|_| {
                warn!("MAIL_RELAY_URL not set, using empty value");
                String::new()
            }),
            mail_relay_token: env::var("MAIL_RELAY_TOKEN").unwrap_or_else(|_| {
                warn!("MAIL_RELAY_TOKEN not set, using empty value");
                String::new()
            }),
            sender_email: env::var("SENDER_EMAIL").unwrap_or_else(|_| {
                warn!("SENDER_EMAIL not set, using empty value");
                String::new()
            }),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.store_url.is_empty() && !self.store_api_key.is_empty()
    }

    pub fn is_calendar_configured(&self) -> bool {
        !self.calendar_api_base_url.is_empty() && !self.calendar_api_token.is_empty()
    }

    pub fn is_mailer_configured(&self) -> bool {
        !self.mail_relay_url.is_empty()
            && !self.mail_relay_token.is_empty()
            && !self.sender_email.is_empty()
    }
}
