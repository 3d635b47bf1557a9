use std::fmt;

/// Dedup key for one (center, next appointment, dose count) triple.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SlotIdentity(String);

impl SlotIdentity {
    pub fn new(url: &str, next_appointment: &str, doses: u32) -> Self {
        Self(format!("{url} - {next_appointment} - {doses}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SlotIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone)]
pub struct Announcement {
    pub identity: SlotIdentity,
    pub message: String,
    pub coordinate: Coordinate,
}
