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

//! Google Cloud resource ancestry for Cloud Asset Inventory conversions.
//!
//! When a Terraform plan is converted into [Cloud Asset Inventory] assets each
//! asset must carry its position in the resource hierarchy: the chain of
//! project, folders, and organization that contain it, plus a reference to its
//! immediate parent. This crate computes that information.
//!
//! The [AncestryManager][manager::AncestryManager] combines three sources:
//!
//! * the fields of the Terraform resource itself (`org_id`, `folder_id`,
//!   `project`, `parent`, ...),
//! * a static table of ancestry paths supplied by the application, and
//! * the Cloud Resource Manager v1 and v3 APIs, unless the manager is offline.
//!
//! Every chain discovered is cached, including the chain of each ancestor, so
//! resources sharing a project or folder require at most one lookup.
//!
//! # Example
//! ```no_run
//! # tokio_test::block_on(async {
//! use google_cloud_ancestry::asset::{Asset, PROJECT};
//! use google_cloud_ancestry::manager::{AncestryManager, Ancestors};
//! use google_cloud_ancestry::resource::ResourceFields;
//!
//! let manager = AncestryManager::builder()
//!     .with_entries([("my-project", "organizations/123/folders/456")])
//!     .build()
//!     .await?;
//! let data = ResourceFields::new().set_field("project_id", "my-project");
//! let asset = Asset::new().set_asset_type(PROJECT);
//! let (ancestors, parent) = manager.ancestors(&data, &asset).await?;
//! println!("{ancestors:?} {parent}");
//! # google_cloud_ancestry::Result::<()>::Ok(()) });
//! ```
//!
//! [Cloud Asset Inventory]: https://cloud.google.com/asset-inventory/docs/overview

/// An alias of [std::result::Result] where the error is always [Error].
pub type Result<T> = std::result::Result<T, crate::error::Error>;

pub use crate::error::Error;

pub mod asset;
pub mod builder;
pub mod cache;
pub mod error;
pub mod key;
pub mod manager;
pub mod model;
pub mod resource;
pub mod stub;
pub mod transport;
