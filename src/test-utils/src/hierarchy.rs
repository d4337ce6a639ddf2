// Copyright 2025 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Helpers to fake the resource hierarchy with an [httptest] server.
//!
//! The helpers produce the request paths and JSON responses used by the Cloud
//! Resource Manager v1 and v3 APIs, and by the Cloud Storage buckets API.
//!
//! # Example
//! ```
//! use google_cloud_test_utils::hierarchy::*;
//! use httptest::Server;
//!
//! let server = Server::run();
//! // The expectations are verified when `server` is dropped.
//! server.expect(expect_ancestry("foo", &["projects/foo", "organizations/qux"], 0));
//! server.expect(expect_folder("folders/bar", "organizations/qux", 0));
//! assert_eq!(ancestry_path("foo"), "/v1/projects/foo:getAncestry");
//! ```

use httptest::{Expectation, matchers::request, responders::*};
use serde_json::{Value, json};

/// The path of the v1 `getAncestry` RPC for `project`.
pub fn ancestry_path(project: &str) -> String {
    format!("/v1/projects/{project}:getAncestry")
}

/// A v1 `getAncestry` response for a nearest-first chain of keys.
///
/// Keys use the plural collection ids, e.g. `folders/123`. The response uses
/// the singular resource types, as the service does.
pub fn ancestry_body<S: AsRef<str>>(chain: &[S]) -> Value {
    let ancestor = chain
        .iter()
        .map(|key| {
            let (collection, id) = key.as_ref().split_once('/').unwrap_or(("", key.as_ref()));
            let kind = collection.strip_suffix('s').unwrap_or(collection);
            json!({"resourceId": {"type": kind, "id": id}})
        })
        .collect::<Vec<_>>();
    json!({ "ancestor": ancestor })
}

/// The path of the v3 `get` RPC for a folder, e.g. `folders/123`.
pub fn folder_path(name: &str) -> String {
    format!("/v3/{name}")
}

/// A v3 folder resource.
pub fn folder_body(name: &str, parent: &str) -> Value {
    json!({"name": name, "parent": parent, "displayName": name, "state": "ACTIVE"})
}

/// The path of the buckets `get` RPC.
pub fn bucket_path(bucket: &str) -> String {
    format!("/storage/v1/b/{bucket}")
}

/// A bucket resource, the project number is encoded as a string.
pub fn bucket_body(bucket: &str, project_number: u64) -> Value {
    json!({"name": bucket, "projectNumber": project_number.to_string(), "location": "US"})
}

/// A `403` response in the Google error format.
pub fn forbidden(resource: &str) -> impl Responder + use<> {
    status_code(403).body(
        json!({"error": {
            "code": 403,
            "message": format!("The caller does not have permission on {resource}"),
            "status": "PERMISSION_DENIED",
        }})
        .to_string(),
    )
}

/// A `503` response in the Google error format.
///
/// The status is `UNAVAILABLE`, so the request is retried.
pub fn unavailable() -> impl Responder {
    status_code(503).body(
        json!({"error": {
            "code": 503,
            "message": "try again later",
            "status": "UNAVAILABLE",
        }})
        .to_string(),
    )
}

/// Expects `times` calls to fetch the ancestry of `project`.
pub fn expect_ancestry<S: AsRef<str>>(project: &str, chain: &[S], times: usize) -> Expectation {
    Expectation::matching(request::method_path("POST", ancestry_path(project)))
        .times(times)
        .respond_with(json_encoded(ancestry_body(chain)))
}

/// Expects `times` calls to fetch a folder.
pub fn expect_folder(name: &str, parent: &str, times: usize) -> Expectation {
    Expectation::matching(request::method_path("GET", folder_path(name)))
        .times(times)
        .respond_with(json_encoded(folder_body(name, parent)))
}

/// Expects `times` calls to fetch a bucket.
pub fn expect_bucket(bucket: &str, project_number: u64, times: usize) -> Expectation {
    Expectation::matching(request::method_path("GET", bucket_path(bucket)))
        .times(times)
        .respond_with(json_encoded(bucket_body(bucket, project_number)))
}
