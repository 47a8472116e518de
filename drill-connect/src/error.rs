use std::error::Error;
use std::fmt;
use std::num::ParseIntError;
use std::str::ParseBoolError;
use std::sync::Arc;


/// Failure to turn a connection descriptor into a [`Connector`](crate::Connector).
///
/// The message is rendered without a prefix, so callers can match on the
/// exact text of the underlying failure.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct ParseError {
    pub kind: ParseErrorKind
}

impl ParseError {
    pub(crate) fn new(kind: ParseErrorKind) -> Self {
        Self { kind }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)
    }
}

impl Error for ParseError {
	fn source(&self) -> Option<&(dyn Error + 'static)> {
		Some(&self.kind)
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// A segment is not a single non-empty `key=value` pair.
    InvalidFormat,
    /// The key is not one of the supported options.
    InvalidArgument(String),
    InvalidBool(ParseBoolError),
    InvalidInt(ParseIntError),
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidFormat => write!(f, "invalid format for connector string"),
            Self::InvalidArgument(key) => write!(f, "invalid argument for connection string: {key}"),
            Self::InvalidBool(e) => write!(f, "{e}"),
            Self::InvalidInt(e) => write!(f, "{e}"),
        }
    }
}

impl Error for ParseErrorKind {
	fn source(&self) -> Option<&(dyn Error + 'static)> {
		match self {
			Self::InvalidBool(source) => Some(source),
			Self::InvalidInt(source) => Some(source),
			_ => None,
		}
	}
}

impl From<ParseBoolError> for ParseError {
    fn from(error: ParseBoolError) -> Self {
        ParseError { kind: ParseErrorKind::InvalidBool(error) }
    }
}

impl From<ParseIntError> for ParseError {
    fn from(error: ParseIntError) -> Self {
        ParseError { kind: ParseErrorKind::InvalidInt(error) }
    }
}


/// Failure reported by a [`DrillClient`](crate::DrillClient) implementation.
///
/// [`Connector::connect`](crate::Connector::connect) hands these back exactly
/// as the client produced them.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct ClientError {
    pub kind: ClientErrorKind
}

impl ClientError {
    pub fn new(kind: ClientErrorKind) -> Self {
        Self { kind }
    }

    /// Wrap an arbitrary failure so that it can later be recognised by identity.
    pub fn other<E>(error: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        Self { kind: ClientErrorKind::Other(Arc::new(error)) }
    }

    /// Whether both errors carry the very same shared failure.
    ///
    /// Only [`ClientErrorKind::Other`] has an identity. Every other kind compares false.
    pub fn is_same(&self, other: &ClientError) -> bool {
        match (&self.kind, &other.kind) {
            (ClientErrorKind::Other(a), ClientErrorKind::Other(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)
    }
}

impl Error for ClientError {
	fn source(&self) -> Option<&(dyn Error + 'static)> {
		Some(&self.kind)
	}
}

#[derive(Debug, Clone)]
pub enum ClientErrorKind {
    Cancelled,
    DeadlineExceeded,
    Io { endpoint: String, source: Arc<std::io::Error> },
    NoDrillbits(String),
    NoLocator,
    NotConnected,
    Other(Arc<dyn Error + Send + Sync>),
    Unimplemented(String),
}

impl fmt::Display for ClientErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cancelled => write!(f, "context cancelled"),
            Self::DeadlineExceeded => write!(f, "context deadline exceeded"),
            Self::Io { endpoint, source } => write!(f, "failed to connect to drillbit {endpoint}: {source}"),
            Self::NoDrillbits(cluster) => write!(f, "no drillbits registered for cluster '{cluster}'"),
            Self::NoLocator => write!(f, "zookeeper nodes configured but no drillbit locator is available"),
            Self::NotConnected => write!(f, "client is not connected"),
            Self::Other(e) => write!(f, "{e}"),
            Self::Unimplemented(msg) => write!(f, "unimplemented: {msg}"),
        }
    }
}

impl Error for ClientErrorKind {
	fn source(&self) -> Option<&(dyn Error + 'static)> {
		match self {
			Self::Io { source, .. } => Some(&**source),
			Self::Other(source) => Some(&**source),
			_ => None,
		}
	}
}


/// Top-level error for [`Driver::open`](crate::Driver::open), which both parses and connects.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct DrillError {
    pub kind: DrillErrorKind
}

impl fmt::Display for DrillError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DrillError: {}", self.kind)
    }
}

impl Error for DrillError {
	fn source(&self) -> Option<&(dyn Error + 'static)> {
		Some(&self.kind)
	}
}

#[derive(Debug, Clone)]
pub enum DrillErrorKind {
    Client(ClientError),
    Parse(ParseError),
}

impl fmt::Display for DrillErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Client(error) => write!(f, "{}", error.kind),
            Self::Parse(error) => write!(f, "{}", error.kind),
        }
    }
}

impl Error for DrillErrorKind {
	fn source(&self) -> Option<&(dyn Error + 'static)> {
		match self {
			Self::Client(source) => Some(source),
			Self::Parse(source) => Some(source),
		}
	}
}

impl From<ClientError> for DrillError {
    fn from(error: ClientError) -> Self {
        DrillError { kind: DrillErrorKind::Client(error) }
    }
}

impl From<ParseError> for DrillError {
    fn from(error: ParseError) -> Self {
        DrillError { kind: DrillErrorKind::Parse(error) }
    }
}
