use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// Schedule bucket name the feed uses for last-minute doses.
pub const CHRONODOSE: &str = "chronodose";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentCenter {
    #[serde(rename = "nom")]
    pub name: String,
    pub url: String,
    pub location: CenterLocation,
    pub metadata: CenterMetadata,
    #[serde(default)]
    pub appointment_schedules: Vec<AppointmentSchedule>,
    #[serde(rename = "prochain_rdv", default)]
    pub next_appointment: Option<String>,
    #[serde(rename = "vaccine_type", default)]
    pub vaccine_types: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CenterLocation {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub city: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CenterMetadata {
    #[serde(default)]
    pub address: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentSchedule {
    pub name: String,
    #[serde(default)]
    pub from: String,
    #[serde(default)]
    pub to: String,
    #[serde(default)]
    pub total: u32,
}

impl AppointmentSchedule {
    pub fn is_chronodose(&self) -> bool {
        self.name == CHRONODOSE
    }
}

impl AppointmentCenter {
    /// Total number of chronodoses over every bucket, saturating at
    /// `u32::MAX` on bogus feed counts.
    pub fn chronodose_count(&self) -> u32 {
        self.appointment_schedules
            .iter()
            .filter(|s| s.is_chronodose())
            .fold(0u32, |n, s| n.saturating_add(s.total))
    }

    pub fn has_chronodose(&self) -> bool {
        self.appointment_schedules
            .iter()
            .any(|s| s.is_chronodose() && s.total > 0)
    }

    pub fn next_appointment_at(&self) -> Option<DateTime<FixedOffset>> {
        self.next_appointment
            .as_deref()
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
    }

    pub fn vaccine_types(&self) -> &[String] {
        self.vaccine_types.as_deref().unwrap_or_default()
    }

    /// True when `wanted` is empty or the center offers one of its types.
    pub fn offers_any(&self, wanted: &[String]) -> bool {
        wanted.is_empty()
            || self
                .vaccine_types()
                .iter()
                .any(|offered| wanted.iter().any(|w| w.eq_ignore_ascii_case(offered)))
    }
}
