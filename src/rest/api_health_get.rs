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

//! API to check the health of the service.

use crate::driver::Driver;
use axum::Json;
use axum::extract::State;
#[cfg(test)]
use serde::Deserialize;
use serde::Serialize;

/// Message returned by the health check.
#[derive(Debug, Serialize)]
#[cfg_attr(test, derive(Deserialize))]
pub(crate) struct HealthResponse {
    /// Fixed `OK` marker.
    status: String,

    /// Configured name of the service.
    app: String,

    /// Configured deployment environment.
    environment: String,
}

/// GET handler for this API.
pub(crate) async fn handler(State(driver): State<Driver>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK".to_owned(),
        app: driver.config().app_name.clone(),
        environment: driver.config().environment.clone(),
    })
}
