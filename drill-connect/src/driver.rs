//! Driver identity and the process-wide driver registry.
//!
//! Generic SQL front ends look a driver up by name, then call
//! [`Driver::open`] or [`Driver::open_connector`] with a descriptor.
//! [`register_default`] is meant to run once at process start; calling it
//! again is harmless.

use crate::connector::Connector;
use crate::connstr::parse_connect_str;
use crate::context::Context;
use crate::error::{DrillError, ParseError};
use crate::session::Conn;

use std::collections::HashMap;
use std::sync::{OnceLock, PoisonError, RwLock};


/// Name the Drill driver registers under.
pub const DRIVER_NAME: &str = "drill";

static GLOBAL_REGISTRY: OnceLock<DriverRegistry> = OnceLock::new();


/// The Drill driver. Stateless; every instance is interchangeable.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Driver;

impl Driver {
    pub fn name(&self) -> &'static str {
        DRIVER_NAME
    }

    pub fn version(&self) -> &'static str {
        env!("CARGO_PKG_VERSION")
    }

    /// Parse `descriptor` into a reusable [`Connector`] without connecting.
    pub fn open_connector(&self, descriptor: &str) -> Result<Connector, ParseError> {
        parse_connect_str(descriptor)
    }

    /// Parse `descriptor` and open a single session with a background context.
    ///
    /// Only direct-option descriptors can succeed here. A `zk=` descriptor
    /// has no [`DrillbitLocator`](crate::DrillbitLocator) and fails with
    /// [`ClientErrorKind::NoLocator`](crate::ClientErrorKind::NoLocator);
    /// parse it into a [`Client`](crate::Client), call `with_locator` and wrap
    /// it with [`Connector::new`] instead (see [`parse_connect_str`]).
    ///
    /// ```no_run
    /// use drill_connect::Driver;
    ///
    /// # tokio_test::block_on(async {
    /// let conn = Driver.open("user=driller;schema=dfs.tmp").await.unwrap();
    /// println!("Session ID: {}", conn.session_id());
    /// # });
    /// ```
    pub async fn open(&self, descriptor: &str) -> Result<Conn, DrillError> {
        let connector = self.open_connector(descriptor)?;
        Ok(connector.connect(&Context::background()).await?)
    }
}


/// Name → driver table.
///
/// Most code only needs [`DriverRegistry::global`]; separate instances exist so
/// tests can work on a registry of their own.
#[derive(Debug, Default)]
pub struct DriverRegistry {
    drivers: RwLock<HashMap<String, Driver>>,
}

impl DriverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The registry shared by the whole process.
    pub fn global() -> &'static DriverRegistry {
        GLOBAL_REGISTRY.get_or_init(DriverRegistry::new)
    }

    /// Register `driver` under `name`.
    ///
    /// Returns `false` and leaves the registry untouched if `name` is taken.
    pub fn register(&self, name: &str, driver: Driver) -> bool {
        let mut drivers = self.drivers.write().unwrap_or_else(PoisonError::into_inner);
        if drivers.contains_key(name) {
            tracing::debug!("Driver '{name}' is already registered");
            return false;
        }

        drivers.insert(name.to_string(), driver);
        tracing::debug!("Registered driver '{name}'");
        true
    }

    pub fn lookup(&self, name: &str) -> Option<Driver> {
        self.drivers.read().unwrap_or_else(PoisonError::into_inner).get(name).copied()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.drivers.read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }

    pub fn clear(&self) {
        self.drivers.write().unwrap_or_else(PoisonError::into_inner).clear();
    }
}


/// Register [`Driver`] as [`DRIVER_NAME`] in the global registry.
///
/// Returns `true` on the first successful registration only.
pub fn register_default() -> bool {
    DriverRegistry::global().register(DRIVER_NAME, Driver)
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{DrillErrorKind, ParseErrorKind};

    #[test]
    fn driver_metadata() {
        assert_eq!(Driver.name(), "drill");
        assert_eq!(Driver.version(), env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn register_is_idempotent() {
        let registry = DriverRegistry::new();

        assert!(registry.register("drill", Driver));
        assert!(!registry.register("drill", Driver));
        assert_eq!(registry.names(), vec!["drill".to_string()]);
        assert_eq!(registry.lookup("drill"), Some(Driver));
        assert_eq!(registry.lookup("postgres"), None);
    }

    #[test]
    fn clear_resets_registry() {
        let registry = DriverRegistry::new();
        registry.register("drill", Driver);
        registry.register("drill-alt", Driver);
        assert_eq!(registry.names(), vec!["drill".to_string(), "drill-alt".to_string()]);

        registry.clear();
        assert!(registry.names().is_empty());
        assert!(registry.register("drill", Driver));
    }

    #[test]
    fn global_registration_happens_once() {
        register_default();
        assert!(!register_default());
        assert_eq!(DriverRegistry::global().lookup(DRIVER_NAME), Some(Driver));
    }

    #[test]
    fn open_connector_parses_descriptor() {
        assert!(Driver.open_connector("auth=plain;user=driller").is_ok());

        let err = Driver.open_connector("auth=bar;").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::InvalidFormat);
    }

    #[tokio::test]
    async fn open_reports_parse_errors() {
        let err = Driver.open("heartbeat=soon").await.unwrap_err();
        assert!(matches!(err.kind, DrillErrorKind::Parse(_)));
        assert_eq!(err.to_string(), "DrillError: invalid digit found in string");
    }

    #[tokio::test]
    async fn open_reports_client_errors() {
        // no locator is configured for descriptor-built clients
        let err = Driver.open("zk=zk1:2181").await.unwrap_err();
        assert!(matches!(err.kind, DrillErrorKind::Client(_)));
    }
}
