// PoolRide
// Copyright 2025 The PoolRide Authors
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not
// use this file except in compliance with the License.  You may obtain a copy
// of the License at:
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.  See the
// License for the specific language governing permissions and limitations
// under the License.

//! Campus carpooling backend with CO2-savings tracking.
//!
//! The service is structured as a stack of layers, and the code is laid out as
//! one module per layer:
//!
//! 1.  `model`: High-level data types that represent concepts in the carpooling
//!     domain.  There is no logic in here; extensive use of the newtype pattern
//!     keeps validation at construction time.
//!
//! 1.  `db`: The persistence layer.  Domain-specific operations are expressed
//!     as free functions over a database executor, backed by SQLite.
//!
//! 1.  `driver`: The business logic layer.  The `Driver` type encapsulates the
//!     database, the clock and the service configuration, and coordinates
//!     multi-step writes inside transactions.
//!
//! 1.  `rest`: The HTTP layer, offering the REST API.  Every API lives in its
//!     own file and is backed by a `Driver` operation.
//!
//! 1.  `main`: The app launcher.  Its sole purpose is to gather configuration
//!     data from environment variables and call `serve`.
//!
//! There are result and error types in every layer, such as `DbResult` and
//! `DriverError`.  Errors float to the top of the app using the `?` operator
//! and are translated to HTTP status codes once returned from the REST layer.

// Keep these in sync with other top-level files.
#![warn(anonymous_parameters, bad_style, clippy::missing_docs_in_private_items, missing_docs)]
#![warn(unused, unused_extern_crates, unused_import_braces, unused_qualifications)]
#![warn(unsafe_code)]

use crate::clocks::SystemClock;
use crate::config::Config;
use crate::db::Db;
use crate::driver::Driver;
use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;

pub(crate) mod clocks;
pub mod config;
pub mod db;
pub(crate) mod driver;
pub mod emissions;
pub(crate) mod env;
pub(crate) mod model;
mod rest;

/// Instantiates all resources to serve the application on `bind_addr`.
///
/// The database in `db` must have been initialized with the service schema
/// already, and `config` carries the recognized options loaded at startup.
pub async fn serve(
    bind_addr: impl Into<SocketAddr>,
    db: Box<dyn Db + Send + Sync>,
    config: Config,
) -> Result<(), Box<dyn Error>> {
    let clock = Arc::from(SystemClock::default());
    let driver = Driver::new(Arc::from(db), clock, config);
    let app = rest::app(driver);

    let listener = tokio::net::TcpListener::bind(bind_addr.into()).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
