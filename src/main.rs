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

//! Entry point to the carpooling service.

// Keep these in sync with other top-level files.
#![warn(anonymous_parameters, bad_style, clippy::missing_docs_in_private_items, missing_docs)]
#![warn(unused, unused_extern_crates, unused_import_braces, unused_qualifications)]
#![warn(unsafe_code)]

use poolride::config::Config;
use poolride::db::{Db, init_schema, sqlite};
use poolride::serve;
use std::env;
use std::net::Ipv4Addr;

/// Default connection string when `POOLRIDE_DB` is not set.  `mode=rwc`
/// creates the database file on first start.
const DEFAULT_DB: &str = "sqlite://poolride.db?mode=rwc";

#[tokio::main]
async fn main() {
    env_logger::init();

    let port: u16 = match env::var("PORT") {
        Ok(val) => val.parse().expect("PORT must be a number"),
        Err(_) => 3000,
    };
    let addr = (Ipv4Addr::LOCALHOST, port);

    let config = Config::from_env("POOLRIDE").unwrap();

    let conn_str = env::var("POOLRIDE_DB").unwrap_or_else(|_| DEFAULT_DB.to_owned());
    let db: Box<dyn Db + Send + Sync> = Box::from(sqlite::connect(&conn_str).await.unwrap());
    init_schema(&mut db.ex().await.unwrap()).await.unwrap();

    serve(addr, db, config).await.unwrap()
}
