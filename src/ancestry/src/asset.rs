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

//! The Cloud Asset Inventory envelope read and updated by the resolver.

use crate::key::{FOLDERS_PREFIX, PROJECTS_PREFIX};
use crate::{Error, Result};

pub const PROJECT: &str = "cloudresourcemanager.googleapis.com/Project";
pub const FOLDER: &str = "cloudresourcemanager.googleapis.com/Folder";
pub const ORGANIZATION: &str = "cloudresourcemanager.googleapis.com/Organization";
pub const PROJECT_BILLING_INFO: &str = "cloudbilling.googleapis.com/ProjectBillingInfo";
pub const ROLE: &str = "iam.googleapis.com/Role";
pub const BUCKET: &str = "storage.googleapis.com/Bucket";
pub const APIGEE_INSTANCE: &str = "apigee.googleapis.com/Instance";

/// The prefix of full resource names in the resource hierarchy.
pub const PARENT_PREFIX: &str = "//cloudresourcemanager.googleapis.com/";

/// A Cloud Asset Inventory asset.
#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(default)]
#[non_exhaustive]
pub struct Asset {
    /// The full resource name, e.g.
    /// `//storage.googleapis.com/my-bucket`.
    pub name: String,

    /// The asset type, e.g. `storage.googleapis.com/Bucket`.
    pub asset_type: String,

    /// The resource representation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource: Option<AssetResource>,

    /// The ancestry chain, nearest first.
    pub ancestors: Vec<String>,
}

impl Asset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the value of [name][Asset::name].
    pub fn set_name<T: Into<String>>(mut self, v: T) -> Self {
        self.name = v.into();
        self
    }

    /// Sets the value of [asset_type][Asset::asset_type].
    pub fn set_asset_type<T: Into<String>>(mut self, v: T) -> Self {
        self.asset_type = v.into();
        self
    }

    /// Sets the value of [resource][Asset::resource].
    pub fn set_resource<T: Into<AssetResource>>(mut self, v: T) -> Self {
        self.resource = Some(v.into());
        self
    }

    /// Sets the value of [ancestors][Asset::ancestors].
    pub fn set_ancestors<T, V>(mut self, v: T) -> Self
    where
        T: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.ancestors = v.into_iter().map(|v| v.into()).collect();
        self
    }
}

/// The resource representation of an [Asset].
#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(default)]
#[non_exhaustive]
pub struct AssetResource {
    /// The API version.
    pub version: String,

    /// The URI of the discovery document for the API.
    pub discovery_document_uri: String,

    /// The resource name in the discovery document.
    pub discovery_name: String,

    /// The full resource name of the parent.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub parent: String,

    /// The resource state.
    #[serde(skip_serializing_if = "serde_json::Map::is_empty")]
    pub data: serde_json::Map<String, serde_json::Value>,
}

impl AssetResource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the value of [version][AssetResource::version].
    pub fn set_version<T: Into<String>>(mut self, v: T) -> Self {
        self.version = v.into();
        self
    }

    /// Sets the value of [discovery_document_uri][AssetResource::discovery_document_uri].
    pub fn set_discovery_document_uri<T: Into<String>>(mut self, v: T) -> Self {
        self.discovery_document_uri = v.into();
        self
    }

    /// Sets the value of [discovery_name][AssetResource::discovery_name].
    pub fn set_discovery_name<T: Into<String>>(mut self, v: T) -> Self {
        self.discovery_name = v.into();
        self
    }

    /// Sets the value of [parent][AssetResource::parent].
    pub fn set_parent<T: Into<String>>(mut self, v: T) -> Self {
        self.parent = v.into();
        self
    }

    /// Sets the value of [data][AssetResource::data].
    pub fn set_data(mut self, v: serde_json::Map<String, serde_json::Value>) -> Self {
        self.data = v;
        self
    }

    /// Returns the `project` in the resource state, as a string.
    ///
    /// Project numbers are sometimes stored as JSON numbers.
    pub(crate) fn data_project(&self) -> Option<String> {
        match self.data.get("project")? {
            serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

/// Returns the full resource name of the parent of an asset.
///
/// `ancestors` is the nearest-first ancestry chain of the asset.
///
/// # Example
/// ```
/// # use google_cloud_ancestry::asset::{asset_parent, PROJECT};
/// let chain = ["projects/123", "folders/456", "organizations/789"];
/// assert_eq!(
///     asset_parent(PROJECT, &chain)?,
///     "//cloudresourcemanager.googleapis.com/folders/456"
/// );
/// # google_cloud_ancestry::Result::<()>::Ok(())
/// ```
pub fn asset_parent<S: AsRef<str>>(asset_type: &str, ancestors: &[S]) -> Result<String> {
    let chain = ancestors.iter().map(AsRef::as_ref).collect::<Vec<_>>();
    let Some(first) = chain.first() else {
        return Err(Error::configuration(format!(
            "cannot determine the parent of a {asset_type} asset with no ancestors"
        )));
    };
    let parent = match asset_type {
        ORGANIZATION => return Ok(String::new()),
        FOLDER => nearest_above(&chain, FOLDERS_PREFIX),
        PROJECT | PROJECT_BILLING_INFO => nearest_above(&chain, PROJECTS_PREFIX),
        _ => *first,
    };
    Ok(format!("{PARENT_PREFIX}{parent}"))
}

/// `chain[1]` when `chain[0]` has `prefix`, otherwise `chain[0]`.
fn nearest_above<'a>(chain: &[&'a str], prefix: &str) -> &'a str {
    match chain {
        [first, second, ..] if first.starts_with(prefix) => *second,
        [first, ..] => *first,
        [] => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use test_case::test_case;

    #[test_case(PROJECT, &["projects/1", "folders/2", "organizations/3"], "folders/2")]
    #[test_case(PROJECT, &["projects/1", "organizations/3"], "organizations/3")]
    #[test_case(PROJECT, &["projects/1"], "projects/1")]
    #[test_case(PROJECT, &["organizations/unknown"], "organizations/unknown")]
    #[test_case(PROJECT, &["folders/2", "organizations/3"], "folders/2")]
    #[test_case(PROJECT_BILLING_INFO, &["projects/1", "organizations/3"], "organizations/3")]
    #[test_case(FOLDER, &["folders/2", "folders/4", "organizations/3"], "folders/4")]
    #[test_case(FOLDER, &["organizations/3"], "organizations/3")]
    #[test_case(FOLDER, &["folders/2"], "folders/2")]
    #[test_case(BUCKET, &["projects/1", "organizations/3"], "projects/1")]
    #[test_case(ROLE, &["organizations/3"], "organizations/3")]
    fn parent(asset_type: &str, chain: &[&str], want: &str) -> anyhow::Result<()> {
        let got = asset_parent(asset_type, chain)?;
        assert_eq!(got, format!("{PARENT_PREFIX}{want}"));
        Ok(())
    }

    #[test]
    fn organization_has_no_parent() -> anyhow::Result<()> {
        let got = asset_parent(ORGANIZATION, &["organizations/3"])?;
        assert_eq!(got, "");
        Ok(())
    }

    #[test_case(PROJECT)]
    #[test_case(ORGANIZATION)]
    #[test_case(BUCKET)]
    fn empty_chain(asset_type: &str) {
        let got = asset_parent::<&str>(asset_type, &[]);
        assert!(got.is_err(), "{got:?}");
    }

    #[test]
    fn serialize() -> anyhow::Result<()> {
        let asset = Asset::new()
            .set_name("//storage.googleapis.com/my-bucket")
            .set_asset_type(BUCKET)
            .set_ancestors(["projects/1", "organizations/3"])
            .set_resource(
                AssetResource::new()
                    .set_version("v1")
                    .set_discovery_name("Bucket")
                    .set_parent("//cloudresourcemanager.googleapis.com/projects/1"),
            );
        let got = serde_json::to_value(&asset)?;
        let want = json!({
            "name": "//storage.googleapis.com/my-bucket",
            "asset_type": BUCKET,
            "ancestors": ["projects/1", "organizations/3"],
            "resource": {
                "version": "v1",
                "discovery_document_uri": "",
                "discovery_name": "Bucket",
                "parent": "//cloudresourcemanager.googleapis.com/projects/1",
            },
        });
        assert_eq!(got, want);

        let roundtrip = serde_json::from_value::<Asset>(got)?;
        assert_eq!(roundtrip, asset);
        Ok(())
    }

    #[test_case(json!({"project": "my-project"}), Some("my-project"))]
    #[test_case(json!({"project": 123}), Some("123"))]
    #[test_case(json!({"project": ""}), None)]
    #[test_case(json!({"project": null}), None)]
    #[test_case(json!({}), None)]
    fn data_project(data: serde_json::Value, want: Option<&str>) {
        let data = data.as_object().cloned().unwrap_or_default();
        let resource = AssetResource::new().set_data(data);
        assert_eq!(resource.data_project().as_deref(), want);
    }
}
