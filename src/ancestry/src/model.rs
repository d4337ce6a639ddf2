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

//! The subset of the Cloud Resource Manager and Cloud Storage JSON resources
//! used to discover ancestry.

/// The response of the Cloud Resource Manager v1 `projects.getAncestry` RPC.
///
/// See <https://cloud.google.com/resource-manager/reference/rest/v1/projects/getAncestry>.
#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(default, rename_all = "camelCase")]
#[non_exhaustive]
pub struct GetAncestryResponse {
    /// The ancestors, starting with the project itself and ending with the
    /// root of the hierarchy.
    pub ancestor: Vec<Ancestor>,
}

impl GetAncestryResponse {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the value of [ancestor][GetAncestryResponse::ancestor].
    pub fn set_ancestor<T, V>(mut self, v: T) -> Self
    where
        T: IntoIterator<Item = V>,
        V: Into<Ancestor>,
    {
        self.ancestor = v.into_iter().map(|v| v.into()).collect();
        self
    }
}

/// An element of [GetAncestryResponse::ancestor].
#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(default, rename_all = "camelCase")]
#[non_exhaustive]
pub struct Ancestor {
    pub resource_id: ResourceId,
}

impl Ancestor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the value of [resource_id][Ancestor::resource_id].
    pub fn set_resource_id<T: Into<ResourceId>>(mut self, v: T) -> Self {
        self.resource_id = v.into();
        self
    }

    /// The ancestor as a resource key, e.g. `folders/123`.
    pub fn key(&self) -> String {
        crate::key::normalize_ancestry(&format!(
            "{}/{}",
            self.resource_id.r#type, self.resource_id.id
        ))
    }
}

impl From<ResourceId> for Ancestor {
    fn from(value: ResourceId) -> Self {
        Self::new().set_resource_id(value)
    }
}

/// A typed identifier of a resource in the v1 API, e.g. `{"type": "folder", "id": "123"}`.
#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(default, rename_all = "camelCase")]
#[non_exhaustive]
pub struct ResourceId {
    /// One of `project`, `folder`, or `organization`.
    pub r#type: String,
    pub id: String,
}

impl ResourceId {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the value of [type][ResourceId::type].
    pub fn set_type<T: Into<String>>(mut self, v: T) -> Self {
        self.r#type = v.into();
        self
    }

    /// Sets the value of [id][ResourceId::id].
    pub fn set_id<T: Into<String>>(mut self, v: T) -> Self {
        self.id = v.into();
        self
    }
}

/// A folder or project returned by the Cloud Resource Manager v3 API.
///
/// Both resources share the fields used to walk the hierarchy.
#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(default, rename_all = "camelCase")]
#[non_exhaustive]
pub struct Folder {
    /// The resource name, e.g. `folders/123`.
    pub name: String,

    /// The parent resource name, empty for resources without a parent.
    pub parent: String,

    pub display_name: String,

    pub state: String,
}

impl Folder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the value of [name][Folder::name].
    pub fn set_name<T: Into<String>>(mut self, v: T) -> Self {
        self.name = v.into();
        self
    }

    /// Sets the value of [parent][Folder::parent].
    pub fn set_parent<T: Into<String>>(mut self, v: T) -> Self {
        self.parent = v.into();
        self
    }

    /// Sets the value of [display_name][Folder::display_name].
    pub fn set_display_name<T: Into<String>>(mut self, v: T) -> Self {
        self.display_name = v.into();
        self
    }

    /// Sets the value of [state][Folder::state].
    pub fn set_state<T: Into<String>>(mut self, v: T) -> Self {
        self.state = v.into();
        self
    }
}

/// A Cloud Storage bucket.
///
/// See <https://cloud.google.com/storage/docs/json_api/v1/buckets#resource>.
#[serde_with::serde_as]
#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(default, rename_all = "camelCase")]
#[non_exhaustive]
pub struct Bucket {
    pub name: String,

    /// The number of the project owning the bucket.
    #[serde_as(as = "Option<serde_with::DisplayFromStr>")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_number: Option<u64>,
}

impl Bucket {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the value of [name][Bucket::name].
    pub fn set_name<T: Into<String>>(mut self, v: T) -> Self {
        self.name = v.into();
        self
    }

    /// Sets the value of [project_number][Bucket::project_number].
    pub fn set_project_number(mut self, v: u64) -> Self {
        self.project_number = Some(v);
        self
    }
}
