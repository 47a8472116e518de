//! Typed configuration for a direct (non-ZooKeeper) Drill connection.

use crate::connstr;
use crate::error::ParseError;

use std::fmt;
use std::str::FromStr;
use std::time::Duration;


/// Heartbeat interval used when the descriptor does not mention `heartbeat`.
pub const DEFAULT_HEARTBEAT_FREQ: Duration = Duration::from_secs(15);


/// Options read from a `key=value;...` descriptor.
///
/// Every field keeps its `Default` value unless the descriptor names it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Options {
    /// Authentication mechanism, e.g. `kerberos` or `plain`.
    pub auth: String,
    /// Default schema for new sessions.
    pub schema: String,
    /// Service principal name used during SASL negotiation.
    pub service_name: String,
    pub sasl_encrypt: bool,
    pub user: String,
    /// Logical cluster name, used to look drillbits up in ZooKeeper.
    pub cluster_name: String,
    /// `None` when the descriptor did not set `heartbeat`.
    pub heartbeat_freq: Option<Duration>,
}

impl Options {
    /// Interval between heartbeats, or `None` when they are turned off.
    ///
    /// An unset frequency falls back to [`DEFAULT_HEARTBEAT_FREQ`], while an
    /// explicit `heartbeat=0` disables heartbeats entirely.
    pub fn heartbeat_interval(&self) -> Option<Duration> {
        match self.heartbeat_freq {
            None => Some(DEFAULT_HEARTBEAT_FREQ),
            Some(freq) if freq.is_zero() => None,
            Some(freq) => Some(freq),
        }
    }
}

impl FromStr for Options {
    type Err = ParseError;

    /// Parse the direct-option form: `auth=kerberos;user=foobar;encrypt=true`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        connstr::parse_options(s)
    }
}

/// Renders the options back into descriptor form, skipping defaults.
impl fmt::Display for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut pairs: Vec<String> = Vec::new();

        let strings = [
            ("auth", &self.auth),
            ("schema", &self.schema),
            ("service", &self.service_name),
            ("user", &self.user),
            ("cluster", &self.cluster_name),
        ];
        for (key, value) in strings {
            if !value.is_empty() {
                pairs.push(format!("{key}={value}"));
            }
        }
        if self.sasl_encrypt {
            pairs.push("encrypt=true".to_string());
        }
        if let Some(freq) = self.heartbeat_freq {
            pairs.push(format!("heartbeat={}", freq.as_secs()));
        }

        write!(f, "{}", pairs.join(";"))
    }
}
