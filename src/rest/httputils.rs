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

//! Utilities to deal with HTTP authorization.

use crate::model::AccessToken;
use crate::rest::{RestError, RestResult};
use http::header::HeaderMap;

/// Extracts the `Authorization` header from `headers` and ensures it has at most one value.
fn get_unique_authorization<'a>(headers: &'a HeaderMap) -> RestResult<Option<&'a str>> {
    let mut iter = headers.get_all("Authorization").iter();
    let value = match iter.next() {
        Some(value) => value,
        None => return Ok(None),
    };
    if iter.next().is_some() {
        return Err(RestError::Unauthorized(
            "Authorization header cannot have more than one value".to_owned(),
        ));
    }

    match value.to_str() {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            Err(RestError::Unauthorized(format!("Bad encoding in Authorization header: {}", e)))
        }
    }
}

/// Assumes that the `headers` contain a bearer access token and extracts it.
pub(crate) fn get_bearer_auth(headers: &HeaderMap) -> RestResult<AccessToken> {
    let authz = match get_unique_authorization(headers)? {
        Some(authz) => authz,
        None => {
            return Err(RestError::Unauthorized("Missing Authorization header".to_owned()));
        }
    };

    let mut fields = authz.splitn(2, ' ');
    let scheme = match fields.next() {
        Some(s) if !s.is_empty() => s,
        _ => {
            return Err(RestError::Unauthorized(
                "Bad Authorization header: missing scheme".to_owned(),
            ));
        }
    };
    let payload = match fields.next() {
        Some(s) => s,
        None => {
            return Err(RestError::Unauthorized(
                "Bad Authorization header: missing payload".to_owned(),
            ));
        }
    };
    assert!(fields.next().is_none());

    if !scheme.eq_ignore_ascii_case("Bearer") {
        return Err(RestError::Unauthorized("Unsupported scheme".to_owned()));
    }

    match AccessToken::new(payload.trim()) {
        Ok(token) => Ok(token),
        Err(e) => Err(RestError::Unauthorized(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    #[test]
    fn test_get_bearer_auth_ok() {
        let token = AccessToken::generate();

        let mut headers = HeaderMap::new();
        headers.append("Authorization", format!("Bearer {}", token.as_str()).parse().unwrap());
        assert_eq!(token, get_bearer_auth(&headers).unwrap());
    }

    #[test]
    fn test_get_bearer_auth_scheme_case_insensitive() {
        let token = AccessToken::generate();

        let mut headers = HeaderMap::new();
        headers.append("Authorization", format!("bearer {}", token.as_str()).parse().unwrap());
        assert_eq!(token, get_bearer_auth(&headers).unwrap());
    }

    /// Runs `get_bearer_auth` with an invalid set of header `values` and ensures that the
    /// call fails with an `Unauthorized` error that contains `exp_error` in the message.
    fn do_get_bearer_auth_error_test(exp_error: &str, values: &[&[u8]]) {
        let mut headers = HeaderMap::new();
        for value in values {
            headers.append("Authorization", HeaderValue::from_bytes(value).unwrap());
        }
        match get_bearer_auth(&headers) {
            Err(RestError::Unauthorized(message)) => {
                assert!(
                    message.contains(exp_error),
                    "message '{}' does not contain '{}'",
                    message,
                    exp_error
                );
            }
            e => panic!("{:?}", e),
        }
    }

    #[test]
    fn test_get_bearer_auth_missing() {
        do_get_bearer_auth_error_test("Missing Authorization", &[]);
    }

    #[test]
    fn test_get_bearer_auth_duplicate() {
        do_get_bearer_auth_error_test("cannot have more than one value", &[b"abc", b"def"]);
    }

    #[test]
    fn test_get_bearer_auth_invalid_encoding() {
        do_get_bearer_auth_error_test("Bad encoding in Authorization", &[b"bad \xc5 bytes"]);
    }

    #[test]
    fn test_get_bearer_auth_missing_scheme() {
        do_get_bearer_auth_error_test("missing scheme", &[b""]);
    }

    #[test]
    fn test_get_bearer_auth_missing_payload() {
        do_get_bearer_auth_error_test("missing payload", &[b"Bearer"]);
    }

    #[test]
    fn test_get_bearer_auth_unsupported_scheme() {
        do_get_bearer_auth_error_test("Unsupported scheme", &[b"Basic 123"]);
    }

    #[test]
    fn test_get_bearer_auth_invalid_token() {
        do_get_bearer_auth_error_test("Invalid access token", &[b"Bearer xxx"]);
    }
}
