//! Raw serde model of the ModLinks XML document.
//!
//! Two shapes are accepted for every `Manifest` element: the compact
//! attribute form
//!
//! ```xml
//! <Manifest Name="Benchwarp" Link="https://example.com/Benchwarp.zip">
//!     <Dependency Name="Satchel"/>
//! </Manifest>
//! ```
//!
//! and the element form published by the upstream modlinks feed
//!
//! ```xml
//! <Manifest>
//!     <Name>Benchwarp</Name>
//!     <Version>1.0.0.0</Version>
//!     <Link SHA256="..."><![CDATA[https://example.com/Benchwarp.zip]]></Link>
//!     <Dependencies><Dependency>Satchel</Dependency></Dependencies>
//! </Manifest>
//! ```

use serde::Deserialize;

use super::{DependencyRef, ModRecord};

#[derive(Debug, Default, Deserialize)]
pub(super) struct RawModLinks {
    #[serde(rename = "Manifest", default)]
    pub manifests: Vec<RawManifest>,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct RawManifest {
    #[serde(rename = "@Name")]
    name_attr: Option<String>,
    #[serde(rename = "@Link")]
    link_attr: Option<String>,

    #[serde(rename = "Name")]
    name: Option<String>,
    #[serde(rename = "Version")]
    version: Option<String>,
    #[serde(rename = "Description")]
    description: Option<String>,
    #[serde(rename = "Link")]
    link: Option<RawLink>,
    #[serde(rename = "Links")]
    links: Option<RawPlatformLinks>,

    #[serde(rename = "Dependency", default)]
    dependency: Vec<RawDependency>,
    #[serde(rename = "Dependencies")]
    dependencies: Option<RawDependencyList>,
}

#[derive(Debug, Default, Deserialize)]
struct RawLink {
    #[serde(rename = "@SHA256")]
    sha256: Option<String>,
    #[serde(rename = "$text", default)]
    url: String,
}

#[derive(Debug, Default, Deserialize)]
struct RawPlatformLinks {
    #[serde(rename = "Windows")]
    windows: Option<RawLink>,
    #[serde(rename = "Mac")]
    mac: Option<RawLink>,
    #[serde(rename = "Linux")]
    linux: Option<RawLink>,
}

impl RawPlatformLinks {
    fn for_current_platform(self) -> Option<RawLink> {
        if cfg!(target_os = "macos") {
            self.mac.or(self.windows)
        } else if cfg!(target_os = "linux") {
            self.linux.or(self.windows)
        } else {
            self.windows
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct RawDependencyList {
    #[serde(rename = "Dependency", default)]
    dependency: Vec<RawDependency>,
}

#[derive(Debug, Default, Deserialize)]
struct RawDependency {
    #[serde(rename = "@Name")]
    name_attr: Option<String>,
    #[serde(rename = "$text")]
    text: Option<String>,
}

impl RawDependency {
    fn into_ref(self) -> DependencyRef {
        let name = self
            .name_attr
            .or(self.text)
            .map(|n| n.trim().to_string())
            .unwrap_or_default();
        DependencyRef { name }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

impl RawManifest {
    /// Convert into a [`ModRecord`]; `None` when the entry has no name or
    /// no download link.
    pub(super) fn into_record(self) -> Option<ModRecord> {
        let name = non_empty(self.name_attr).or_else(|| non_empty(self.name))?;

        let link = self.link.or_else(|| self.links.and_then(RawPlatformLinks::for_current_platform));
        let (link_url, sha256) = match link {
            Some(link) => (Some(link.url), link.sha256),
            None => (None, None),
        };
        let Some(download_url) = non_empty(self.link_attr).or_else(|| non_empty(link_url)) else {
            log::warn!("Skipping mod '{}': no download link in the index", name);
            return None;
        };

        let dependencies = self
            .dependency
            .into_iter()
            .chain(self.dependencies.into_iter().flat_map(|list| list.dependency))
            .map(RawDependency::into_ref)
            .collect();

        Some(ModRecord {
            name,
            download_url,
            version: non_empty(self.version),
            description: non_empty(self.description),
            sha256: non_empty(sha256),
            dependencies,
        })
    }
}
