//! Connection descriptor parsing.
//!
//! Two descriptor forms are understood:
//!
//! - `zk=host1:2181,host2:2181`: a ZooKeeper quorum to discover drillbits from;
//! - `auth=kerberos;user=driller;encrypt=true`: direct connection options.
//!
//! Either form produces a [`Client`](crate::client::Client) wrapped in a
//! [`Connector`].

use crate::client::Client;
use crate::connector::Connector;
use crate::error::{ParseError, ParseErrorKind};
use crate::options::Options;

use std::sync::Arc;
use std::time::Duration;


const ZK_PREFIX: &str = "zk=";
const PAIR_SEPARATOR: char = ';';
const NODE_SEPARATOR: char = ',';


/// The bootstrap strategy a descriptor asks for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Descriptor {
    ZooKeeper(Vec<String>),
    Direct(Options),
}

/// Parse a descriptor and wrap the resulting client in a [`Connector`].
///
/// A `zk=` descriptor yields a client with no [`DrillbitLocator`], so its
/// connects fail with [`ClientErrorKind::NoLocator`]. To discover drillbits,
/// build the client yourself and attach a locator:
///
/// ```
/// use drill_connect::{Client, Connector, Drillbit, StaticLocator};
/// use std::sync::Arc;
///
/// let locator = StaticLocator::new()
///     .with_cluster("drillbits1", vec![Drillbit::new("10.0.0.7", 31010)]);
/// let client = "zk=zk1:2181".parse::<Client>().unwrap().with_locator(Arc::new(locator));
/// let connector = Connector::new(Arc::new(client));
/// # let _ = connector;
/// ```
///
/// [`DrillbitLocator`]: crate::client::DrillbitLocator
/// [`ClientErrorKind::NoLocator`]: crate::ClientErrorKind::NoLocator
///
/// ```
/// use drill_connect::parse_connect_str;
///
/// let connector = parse_connect_str("auth=kerberos;user=driller").unwrap();
/// assert_eq!(connector.driver().name(), "drill");
///
/// let err = parse_connect_str("foo=bar").unwrap_err();
/// assert_eq!(err.to_string(), "invalid argument for connection string: foo");
/// ```
pub fn parse_connect_str(descriptor: &str) -> Result<Connector, ParseError> {
    Ok(Connector::new(Arc::new(parse_client(descriptor)?)))
}

/// The client every descriptor-built [`Connector`] wraps.
pub(crate) fn parse_client(descriptor: &str) -> Result<Client, ParseError> {
    descriptor.parse()
}

pub(crate) fn parse_descriptor(descriptor: &str) -> Result<Descriptor, ParseError> {
    match descriptor.strip_prefix(ZK_PREFIX) {
        Some(nodes) => {
            let nodes = parse_zk_nodes(nodes)?;
            tracing::debug!("Using zookeeper discovery with {} node(s): {:?}", nodes.len(), nodes);
            Ok(Descriptor::ZooKeeper(nodes))
        }
        None => {
            let opts = parse_options(descriptor)?;
            tracing::debug!("Using direct connection options");
            Ok(Descriptor::Direct(opts))
        }
    }
}

fn parse_zk_nodes(nodes: &str) -> Result<Vec<String>, ParseError> {
    if nodes.contains(PAIR_SEPARATOR) {
        return Err(ParseError::new(ParseErrorKind::InvalidFormat));
    }

    nodes
        .split(NODE_SEPARATOR)
        .map(|node| match node {
            "" => Err(ParseError::new(ParseErrorKind::InvalidFormat)),
            node => Ok(node.to_string()),
        })
        .collect()
}

/// Apply each `key=value` segment in order. Later keys overwrite earlier ones.
/// An empty descriptor holds no pairs and yields the defaults.
pub(crate) fn parse_options(descriptor: &str) -> Result<Options, ParseError> {
    let mut opts = Options::default();

    if descriptor.is_empty() {
        return Ok(opts);
    }

    for segment in descriptor.split(PAIR_SEPARATOR) {
        let (key, value) = split_pair(segment)?;
        apply_option(&mut opts, key, value)?;
    }

    Ok(opts)
}

/// A segment must hold exactly one `=` with something on either side.
fn split_pair(segment: &str) -> Result<(&str, &str), ParseError> {
    let mut parts = segment.split('=');

    match (parts.next(), parts.next(), parts.next()) {
        (Some(key), Some(value), None) if !key.is_empty() && !value.is_empty() => Ok((key, value)),
        _ => Err(ParseError::new(ParseErrorKind::InvalidFormat)),
    }
}

fn apply_option(opts: &mut Options, key: &str, value: &str) -> Result<(), ParseError> {
    match key {
        "auth" => opts.auth = value.to_string(),
        "schema" => opts.schema = value.to_string(),
        "service" => opts.service_name = value.to_string(),
        "encrypt" => opts.sasl_encrypt = value.parse::<bool>()?,
        "user" => opts.user = value.to_string(),
        "cluster" => opts.cluster_name = value.to_string(),
        "heartbeat" => opts.heartbeat_freq = Some(Duration::from_secs(value.parse::<u64>()?)),
        _ => return Err(ParseError::new(ParseErrorKind::InvalidArgument(key.to_string()))),
    }

    match key {
        "auth" | "service" => tracing::trace!("Applied connection option {key}={value}"),
        _ => tracing::debug!("Applied connection option {key}={value}"),
    }

    Ok(())
}
