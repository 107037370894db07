use std::net::IpAddr;
use std::time::Duration;

#[cfg(feature = "with-serde")]
use serde::{Deserialize, Serialize};

/// Transport settings for [`SystemResolver`](super::SystemResolver).
///
/// Name servers are IP literals queried on port 53; entries that do not parse
/// are ignored, and an empty list means "use the system configuration".
#[cfg_attr(feature = "with-serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverOptions {
    nameservers: Vec<String>,
    timeout_ms: u64,
    attempts: usize,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            nameservers: Vec::new(),
            timeout_ms: 5_000,
            attempts: 2,
        }
    }
}

impl ResolverOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_nameserver(mut self, server: impl Into<String>) -> Self {
        let server = server.into();
        let trimmed = server.trim();
        if !trimmed.is_empty() && !self.nameservers.iter().any(|known| known == trimmed) {
            self.nameservers.push(trimmed.to_string());
        }
        self
    }

    pub fn with_nameservers<I, S>(mut self, servers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for server in servers {
            self = self.with_nameserver(server);
        }
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn with_attempts(mut self, attempts: usize) -> Self {
        self.attempts = attempts.max(1);
        self
    }

    pub fn nameservers(&self) -> &[String] {
        &self.nameservers
    }

    /// Name servers that parse as IP addresses.
    pub fn nameserver_ips(&self) -> Vec<IpAddr> {
        self.nameservers
            .iter()
            .filter_map(|server| server.parse::<IpAddr>().ok())
            .collect()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn attempts(&self) -> usize {
        self.attempts
    }
}
