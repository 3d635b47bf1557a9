use std::io::Write;
use std::sync::Mutex;

use anyhow::Context;
use async_trait::async_trait;

use super::Publisher;
use crate::models::Announcement;

/// Dry-run publisher: writes each message to a stream instead of posting.
pub struct ConsolePublisher<W> {
    out: Mutex<W>,
}

impl ConsolePublisher<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> ConsolePublisher<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }
}

#[async_trait]
impl<W: Write + Send> Publisher for ConsolePublisher<W> {
    async fn publish(&self, announcement: &Announcement) -> anyhow::Result<()> {
        let mut out = self
            .out
            .lock()
            .map_err(|_| anyhow::anyhow!("output stream lock poisoned"))?;
        writeln!(out, "{}\n", announcement.message).context("failed to write announcement")?;
        out.flush().context("failed to flush announcement")?;
        Ok(())
    }
}
