/*!
# drill-connect

<b>Connection front end for Apache Drill.</b>

This crate turns a Drill connection descriptor into a reusable [`Connector`],
and a connector into live [`Conn`] sessions, without the caller knowing which
transport backend does the work.

## ✨ Features

- ⚙️ **Descriptor parsing** for both the ZooKeeper (`zk=...`) and direct-option forms;
- 🧩 **Pluggable clients** behind the [`DrillClient`] trait;
- 🪶 **Async connects** on `tokio`, bounded by a cancellable [`Context`];
- 🧾 **Process-wide driver registry** for generic SQL front ends.

## Getting Started

```no_run
use drill_connect::{parse_connect_str, Context};
use std::time::Duration;

# tokio_test::block_on(async {
// 1️⃣ Parse the descriptor once
let connector = parse_connect_str("user=driller;schema=dfs.tmp;heartbeat=10").unwrap();

// 2️⃣ Open as many sessions as needed
let ctx = Context::background().with_timeout(Duration::from_secs(5));
let conn = connector.connect(&ctx).await.unwrap();

println!("Session ID: {}", conn.session_id());
conn.close().await.unwrap();
# });
```

## 🔒 Connection Descriptors

```text
zk=zk1:2181,zk2:2181,zk3:2181
auth=kerberos;service=drill;encrypt=true
user=driller;schema=dfs.tmp;cluster=drillbits1;heartbeat=5
```

Recognised keys are `auth`, `schema`, `service`, `encrypt`, `user`,
`cluster` and `heartbeat` (seconds). Unknown keys are rejected, and when a
key repeats the last value wins.

## 🧠 Concepts

- <b>[`Options`]</b>: typed settings read from a direct-option descriptor.
- <b>[`Connector`]</b>: immutable session factory for one descriptor.
- <b>[`Conn`]</b>: one live session, owning its client.
- <b>[`Client`]</b>: the built-in TCP backend; ZooKeeper discovery plugs in
  through a [`DrillbitLocator`].
- <b>[`Driver`]</b> / <b>[`DriverRegistry`]</b>: named driver lookup.
*/

pub mod client;
mod connector;
mod connstr;
mod context;
mod driver;
mod error;
mod options;
mod session;

pub use client::{Client, DrillClient, Drillbit, DrillbitLocator, StaticLocator};
pub use connector::Connector;
pub use connstr::parse_connect_str;
pub use context::Context;
pub use driver::{register_default, Driver, DriverRegistry, DRIVER_NAME};
pub use error::{ClientError, ClientErrorKind, DrillError, DrillErrorKind, ParseError, ParseErrorKind};
pub use options::{Options, DEFAULT_HEARTBEAT_FREQ};
pub use session::Conn;

#[cfg(test)]
mod test_utils;
