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

//! Read access to the fields of a Terraform resource.

use crate::key::{FOLDERS_PREFIX, ORGANIZATIONS_PREFIX, PROJECTS_PREFIX};
use std::collections::BTreeMap;

/// The organization id of a resource.
pub const ORG_ID: &str = "org_id";
/// The folder id of a resource.
pub const FOLDER_ID: &str = "folder_id";
/// The folder of a resource, used by resources without a `folder_id`.
pub const FOLDER: &str = "folder";
/// The parent of a resource, in `<collection>/<id>` form.
pub const PARENT: &str = "parent";
/// The project of a resource.
pub const PROJECT: &str = "project";
/// The project id of a project resource.
pub const PROJECT_ID: &str = "project_id";
/// The project number of a project resource.
pub const NUMBER: &str = "number";
/// The bucket name of a storage resource.
pub const BUCKET: &str = "bucket";

/// The fields of a Terraform resource, as seen by the ancestry resolver.
///
/// Applications implement this trait over their own representation of the
/// Terraform configuration. Only string-valued fields are consulted.
///
/// # Example
/// ```
/// # use google_cloud_ancestry::resource::ResourceData;
/// #[derive(Debug)]
/// struct Project {
///     project_id: String,
///     folder_id: Option<String>,
/// }
///
/// impl ResourceData for Project {
///     fn get_str(&self, field: &str) -> Option<&str> {
///         match field {
///             "project_id" => Some(&self.project_id),
///             "folder_id" => self.folder_id.as_deref(),
///             _ => None,
///         }
///     }
/// }
/// ```
pub trait ResourceData: std::fmt::Debug + Send + Sync {
    /// Returns the value of `field`, if it is set.
    fn get_str(&self, field: &str) -> Option<&str>;
}

/// A [ResourceData] implementation backed by a map of field values.
///
/// # Example
/// ```
/// # use google_cloud_ancestry::resource::{ResourceData, ResourceFields};
/// let data = ResourceFields::new()
///     .set_field("project_id", "my-project")
///     .set_field("org_id", "123");
/// assert_eq!(data.get_str("org_id"), Some("123"));
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResourceFields {
    fields: BTreeMap<String, String>,
}

impl ResourceFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the value of a field.
    pub fn set_field<K: Into<String>, V: Into<String>>(mut self, field: K, value: V) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }
}

impl<K, V> FromIterator<(K, V)> for ResourceFields
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl ResourceData for ResourceFields {
    fn get_str(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }
}

impl ResourceData for serde_json::Map<String, serde_json::Value> {
    fn get_str(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(serde_json::Value::as_str)
    }
}

/// Returns the non-empty value of `field`.
pub(crate) fn get_ok<'a>(data: &'a dyn ResourceData, field: &str) -> Option<&'a str> {
    data.get_str(field).filter(|v| !v.is_empty())
}

/// Returns `parent` when it names a resource in `prefix`.
fn parent_with_prefix<'a>(data: &'a dyn ResourceData, prefix: &str) -> Option<&'a str> {
    get_ok(data, PARENT).filter(|p| p.starts_with(prefix))
}

pub(crate) fn organization_from_resource(data: &dyn ResourceData) -> Option<&str> {
    get_ok(data, ORG_ID).or_else(|| parent_with_prefix(data, ORGANIZATIONS_PREFIX))
}

pub(crate) fn folder_from_resource(data: &dyn ResourceData) -> Option<&str> {
    get_ok(data, FOLDER_ID)
        .or_else(|| get_ok(data, FOLDER))
        .or_else(|| parent_with_prefix(data, FOLDERS_PREFIX))
}

/// The `project` field, else a `projects/` parent.
pub(crate) fn project_from_fields(data: &dyn ResourceData) -> Option<&str> {
    get_ok(data, PROJECT).or_else(|| parent_with_prefix(data, PROJECTS_PREFIX))
}
