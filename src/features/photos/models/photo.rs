use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Which step a photo belongs to, also the second segment of its storage path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PhotoCategory {
    General,
    Cles,
    PartiesPrivatives,
    AutresEquipements,
    EquipementsChauffage,
    EquipementsEnergetiques,
    Pieces,
    Electricite,
    Gaz,
    Eau,
}

impl PhotoCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            PhotoCategory::General => "general",
            PhotoCategory::Cles => "cles",
            PhotoCategory::PartiesPrivatives => "parties_privatives",
            PhotoCategory::AutresEquipements => "autres_equipements",
            PhotoCategory::EquipementsChauffage => "equipements_chauffage",
            PhotoCategory::EquipementsEnergetiques => "equipements_energetiques",
            PhotoCategory::Pieces => "pieces",
            PhotoCategory::Electricite => "electricite",
            PhotoCategory::Gaz => "gaz",
            PhotoCategory::Eau => "eau",
        }
    }
}

impl std::fmt::Display for PhotoCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Photo metadata as persisted in a parent's `photos` JSONB list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PhotoAttachment {
    pub id: Uuid,
    /// Original file name
    pub name: String,
    /// Size in bytes
    pub size: i64,
    /// MIME type
    #[serde(rename = "type")]
    pub content_type: String,
    pub url: String,
    #[serde(default)]
    pub description: Option<String>,
    pub category: PhotoCategory,
    /// Object path inside the photo bucket, absent on legacy rows
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_path: Option<String>,
}

/// A photo received with a save request, not yet uploaded
#[derive(Debug, Clone)]
pub struct LocalPhoto {
    pub local_id: Uuid,
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
    pub description: Option<String>,
}

impl LocalPhoto {
    pub fn new(file_name: impl Into<String>, content_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            local_id: Uuid::new_v4(),
            file_name: file_name.into(),
            content_type: content_type.into(),
            data,
            description: None,
        }
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description.filter(|d| !d.trim().is_empty());
        self
    }
}

/// Where a photo is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhotoPhase {
    Existing,
    PendingRemoval,
    NewLocal,
    Uploading,
}
