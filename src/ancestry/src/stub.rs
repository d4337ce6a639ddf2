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

//! Traits to mock the services consulted by the ancestry manager.
//!
//! The [AncestryManager][crate::manager::AncestryManager] reads the resource
//! hierarchy through these traits. The default implementations, in
//! [transport][crate::transport], send requests to the Cloud Resource Manager
//! and Cloud Storage services. Applications may provide their own
//! implementations to mock the services in tests, or to serve the hierarchy
//! from a different source.
//!
//! The traits report errors as [gax::error::Error], the error type used by the
//! Google Cloud client libraries. A `403` error is rewritten by the manager
//! into a [permission denied][crate::Error::is_permission_denied] error.

use crate::model::{Bucket, Folder, GetAncestryResponse};

/// Reads the resource hierarchy from Cloud Resource Manager.
#[async_trait::async_trait]
pub trait ResourceManager: std::fmt::Debug + Send + Sync {
    /// Returns the full ancestry of a project, using the v1 `getAncestry` RPC.
    ///
    /// `project_id` is the project id or number, without any prefix.
    async fn get_ancestry(&self, project_id: String) -> gax::Result<GetAncestryResponse>;

    /// Returns a folder (or project) and its immediate parent, using the v3 API.
    ///
    /// `name` is the resource name, e.g. `folders/123`.
    async fn get_folder(&self, name: String) -> gax::Result<Folder>;
}

/// Reads bucket metadata from Cloud Storage.
#[async_trait::async_trait]
pub trait Storage: std::fmt::Debug + Send + Sync {
    /// Returns the metadata for a bucket.
    async fn get_bucket(&self, bucket: String) -> gax::Result<Bucket>;
}
