use std::env;

use chrono_tz::Tz;

use crate::errors::AppError;
use crate::models::Department;

pub const DEFAULT_FEED_BASE_URL: &str = "https://vitemadose.gitlab.io/vitemadose";
pub const DEFAULT_STATIC_MAP_URL: &str = "https://staticmap.openstreetmap.de/staticmap.php";

/// What to do with an announcement once it passed deduplication.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunMode {
    /// Print announcements instead of posting them.
    Simulate,
    /// Render the map and post to Twitter.
    Publish,
    /// Compute and dedup candidates, but drop them.
    Disabled,
}

impl RunMode {
    pub fn from_env_value(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("TEST") => RunMode::Simulate,
            Some("PROD") => RunMode::Publish,
            _ => RunMode::Disabled,
        }
    }
}

#[derive(Clone, Debug)]
pub struct MapConfig {
    pub url: String,
    pub zoom: u8,
    pub width: u32,
    pub height: u32,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_STATIC_MAP_URL.to_string(),
            zoom: 11,
            width: 600,
            height: 400,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct TwitterCredentials {
    pub app_key: String,
    pub app_secret: String,
    pub access_token: String,
    pub access_secret: String,
}

impl TwitterCredentials {
    pub fn is_complete(&self) -> bool {
        [
            &self.app_key,
            &self.app_secret,
            &self.access_token,
            &self.access_secret,
        ]
        .iter()
        .all(|v| !v.is_empty())
    }
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub center_lat: f64,
    pub center_lon: f64,
    pub max_radius_km: f64,
    pub departments: Vec<Department>,
    pub check_interval_secs: u64,
    pub min_doses: u32,
    pub timezone: Tz,
    pub mode: RunMode,
    pub feed_base_url: String,
    /// Empty means every vaccine type is accepted.
    pub vaccine_types: Vec<String>,
    pub max_hours_ahead: Option<u32>,
    pub map: MapConfig,
    pub twitter: TwitterCredentials,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let departments = lookup("DEPARTMENTS_TO_CHECK")
            .ok_or_else(|| {
                AppError::Config("please set the DEPARTMENTS_TO_CHECK env variable".to_string())
            })?
            .split(',')
            .filter(|code| !code.trim().is_empty())
            .map(Department::parse)
            .collect::<Result<Vec<_>, _>>()?;
        if departments.is_empty() {
            return Err(AppError::Config(
                "DEPARTMENTS_TO_CHECK must list at least one department".to_string(),
            ));
        }

        let timezone_name = lookup("TIMEZONE").unwrap_or_else(|| "Europe/Paris".to_string());
        let timezone = timezone_name
            .trim()
            .parse::<Tz>()
            .map_err(|_| AppError::Config(format!("unknown TIMEZONE: {timezone_name}")))?;

        let mode = RunMode::from_env_value(lookup("ENV").as_deref());
        let twitter = TwitterCredentials {
            app_key: lookup("APP_KEY").unwrap_or_default(),
            app_secret: lookup("APP_SECRET").unwrap_or_default(),
            access_token: lookup("ACCESS_TOKEN").unwrap_or_default(),
            access_secret: lookup("ACCESS_SECRET").unwrap_or_default(),
        };
        if mode == RunMode::Publish && !twitter.is_complete() {
            return Err(AppError::Config(
                "APP_KEY, APP_SECRET, ACCESS_TOKEN and ACCESS_SECRET must be set when ENV=PROD"
                    .to_string(),
            ));
        }

        let default_map = MapConfig::default();

        Ok(Self {
            center_lat: required_f64(&lookup, "CENTER_LAT")?,
            center_lon: required_f64(&lookup, "CENTER_LON")?,
            max_radius_km: required_f64(&lookup, "MAX_RADIUS_KM")?,
            departments,
            check_interval_secs: lookup("CHECK_INTERVAL_SEC")
                .and_then(|v| v.trim().parse().ok())
                .filter(|secs| *secs > 0)
                .unwrap_or(60),
            min_doses: lookup("MIN_DOSES")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(0),
            timezone,
            mode,
            feed_base_url: lookup("FEED_BASE_URL")
                .map(|v| v.trim().trim_end_matches('/').to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| DEFAULT_FEED_BASE_URL.to_string()),
            vaccine_types: lookup("VACCINE_TYPES")
                .map(|v| {
                    v.split(',')
                        .map(|t| t.trim().to_string())
                        .filter(|t| !t.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
            max_hours_ahead: lookup("MAX_HOURS_AHEAD").and_then(|v| v.trim().parse().ok()),
            map: MapConfig {
                url: lookup("STATIC_MAP_URL").unwrap_or(default_map.url),
                zoom: lookup("MAP_ZOOM")
                    .and_then(|v| v.trim().parse().ok())
                    .unwrap_or(default_map.zoom),
                width: lookup("MAP_WIDTH")
                    .and_then(|v| v.trim().parse().ok())
                    .unwrap_or(default_map.width),
                height: lookup("MAP_HEIGHT")
                    .and_then(|v| v.trim().parse().ok())
                    .unwrap_or(default_map.height),
            },
            twitter,
        })
    }
}

fn required_f64<F>(lookup: &F, key: &str) -> Result<f64, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key).ok_or_else(|| AppError::Config(format!("{key} must be set")))?;
    raw.trim()
        .parse()
        .map_err(|_| AppError::Config(format!("{key} must be a number, got {raw:?}")))
}
