//! Provenance tag embedded in image descriptions
//!
//! The provider has no metadata store for images beyond the free-text
//! description field, so ecsflow packs a compact JSON document into it when
//! capturing an image. The tag records enough of the source instance's
//! configuration to reconstruct a replacement later, and its logical instance
//! name is the grouping key for garbage collection.

use crate::error::{CloudError, Result};
use crate::model::Instance;
use serde::{Deserialize, Serialize};

/// Source-instance configuration recorded at image-capture time.
///
/// Field names on the wire are abbreviated to keep the encoded document
/// short; the description field has a provider-side length limit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProvenanceTag {
    /// Primary private IP of the source instance
    #[serde(rename = "pia", skip_serializing_if = "Option::is_none")]
    pub private_ip_address: Option<String>,

    /// Elastic IP allocation id bound to the source, if any
    #[serde(rename = "eia", skip_serializing_if = "Option::is_none")]
    pub eip_allocation_id: Option<String>,

    /// Human-facing description of the source instance
    #[serde(rename = "d", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Logical instance name; garbage collection groups images by this
    #[serde(rename = "in")]
    pub instance_name: String,

    #[serde(rename = "zid", skip_serializing_if = "Option::is_none")]
    pub zone_id: Option<String>,

    #[serde(rename = "it", skip_serializing_if = "Option::is_none")]
    pub instance_type: Option<String>,

    #[serde(rename = "vsid", skip_serializing_if = "Option::is_none")]
    pub v_switch_id: Option<String>,

    #[serde(rename = "sgid", skip_serializing_if = "Option::is_none")]
    pub security_group_id: Option<String>,
}

impl ProvenanceTag {
    /// Snapshot the attributes of a live instance into a tag
    pub fn from_instance(instance: &Instance) -> Self {
        Self {
            private_ip_address: instance.primary_private_ip().map(str::to_owned),
            eip_allocation_id: instance.eip.as_ref().map(|e| e.allocation_id.clone()),
            description: instance.description.clone(),
            instance_name: instance.instance_name.clone(),
            zone_id: Some(instance.zone_id.clone()),
            instance_type: Some(instance.instance_type.clone()),
            v_switch_id: instance.vpc.v_switch_id.clone(),
            security_group_id: instance.primary_security_group().map(str::to_owned),
        }
    }

    /// Encode into the compact wire form stored in the description field.
    pub fn encode(&self) -> String {
        // A struct of plain strings cannot fail to serialize.
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Decode a description field. A description that is not valid tag JSON
    /// is fatal to the calling workflow; there is no fallback.
    pub fn decode(description: &str) -> Result<Self> {
        serde_json::from_str(description)
            .map_err(|e| CloudError::MalformedTag(format!("{description:?}: {e}")))
    }
}
