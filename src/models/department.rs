use std::fmt;

use crate::errors::AppError;

/// A French département as it appears in the feed's file names:
/// numeric codes are zero-padded to two digits ("01"), Corsica keeps its
/// letter ("2A").
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Department(String);

impl Department {
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(AppError::Config("empty department code".to_string()));
        }

        if raw.chars().all(|c| c.is_ascii_digit()) {
            let number: u32 = raw
                .parse()
                .map_err(|_| AppError::Config(format!("invalid department code: {raw}")))?;
            return Ok(Self::from_number(number));
        }

        if raw.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Ok(Self(raw.to_ascii_uppercase()));
        }

        Err(AppError::Config(format!("invalid department code: {raw}")))
    }

    pub fn from_number(number: u32) -> Self {
        Self(format!("{number:02}"))
    }

    pub fn feed_key(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
