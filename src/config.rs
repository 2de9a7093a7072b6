use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use log::warn;

const DEFAULT_PUBLIC_DIR: &str = "public";
const DEFAULT_FLASH_DURATION: Duration = Duration::from_secs(3);

/// Where a freshly reported item lands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportPolicy {
    /// Listed straight away under the reporter's chosen status.
    #[default]
    Direct,
    /// Held as pending until an admin moderates it.
    Moderated,
}

/// Artificial delays standing in for backend round trips.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Latency {
    pub initial_load: Duration,
    pub login: Duration,
    pub register: Duration,
    pub add_item: Duration,
    pub update_status: Duration,
    pub send_message: Duration,
}

impl Latency {
    pub const NONE: Latency = Latency {
        initial_load: Duration::ZERO,
        login: Duration::ZERO,
        register: Duration::ZERO,
        add_item: Duration::ZERO,
        update_status: Duration::ZERO,
        send_message: Duration::ZERO,
    };
}

impl Default for Latency {
    fn default() -> Self {
        Latency {
            initial_load: Duration::from_millis(800),
            login: Duration::from_millis(500),
            register: Duration::from_millis(700),
            add_item: Duration::from_millis(600),
            update_status: Duration::from_millis(400),
            send_message: Duration::from_millis(300),
        }
    }
}

/// Settings shared by every store instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreConfig {
    pub report_policy: ReportPolicy,
    pub latency: Latency,
    pub flash_duration: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            report_policy: ReportPolicy::default(),
            latency: Latency::default(),
            flash_duration: DEFAULT_FLASH_DURATION,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub public_dir: String,
    pub store: StoreConfig,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let addr = lookup("LOST_FOUND_ADDR")
            .and_then(|raw| {
                raw.parse()
                    .map_err(|e| warn!("Ignoring LOST_FOUND_ADDR {}: {}", raw, e))
                    .ok()
            })
            .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 2052)));

        let public_dir =
            lookup("LOST_FOUND_PUBLIC_DIR").unwrap_or_else(|| DEFAULT_PUBLIC_DIR.to_string());

        let report_policy = match lookup("LOST_FOUND_REPORT_POLICY").as_deref() {
            None | Some("direct") => ReportPolicy::Direct,
            Some("moderated") => ReportPolicy::Moderated,
            Some(other) => {
                warn!("Unknown LOST_FOUND_REPORT_POLICY {}, using direct", other);
                ReportPolicy::Direct
            }
        };

        let latency = match lookup("LOST_FOUND_SIMULATE_LATENCY").as_deref() {
            Some("0" | "false" | "off") => Latency::NONE,
            _ => Latency::default(),
        };

        let flash_duration = lookup("LOST_FOUND_FLASH_SECS")
            .and_then(|raw| {
                raw.parse::<u64>()
                    .map_err(|e| warn!("Ignoring LOST_FOUND_FLASH_SECS {}: {}", raw, e))
                    .ok()
            })
            .map_or(DEFAULT_FLASH_DURATION, Duration::from_secs);

        Config {
            addr,
            public_dir,
            store: StoreConfig {
                report_policy,
                latency,
                flash_duration,
            },
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_with(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.addr.to_string(), "0.0.0.0:2052");
        assert_eq!(config.public_dir, "public");
        assert_eq!(config.store.report_policy, ReportPolicy::Direct);
        assert_eq!(config.store.latency, Latency::default());
        assert_eq!(config.store.flash_duration, Duration::from_secs(3));
    }

    #[test]
    fn test_overrides() {
        let config = config_with(&[
            ("LOST_FOUND_ADDR", "127.0.0.1:9000"),
            ("LOST_FOUND_REPORT_POLICY", "moderated"),
            ("LOST_FOUND_SIMULATE_LATENCY", "false"),
            ("LOST_FOUND_FLASH_SECS", "10"),
        ]);
        assert_eq!(config.addr.to_string(), "127.0.0.1:9000");
        assert_eq!(config.store.report_policy, ReportPolicy::Moderated);
        assert_eq!(config.store.latency, Latency::NONE);
        assert_eq!(config.store.flash_duration, Duration::from_secs(10));
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = config_with(&[
            ("LOST_FOUND_ADDR", "not an address"),
            ("LOST_FOUND_REPORT_POLICY", "whatever"),
            ("LOST_FOUND_FLASH_SECS", "soon"),
        ]);
        assert_eq!(config.addr.to_string(), "0.0.0.0:2052");
        assert_eq!(config.store.report_policy, ReportPolicy::Direct);
        assert_eq!(config.store.flash_duration, Duration::from_secs(3));
    }
}
