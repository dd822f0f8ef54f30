use serde::{Deserialize, Serialize};

/// A remediation product as published by the catalog import.
///
/// Text fields are optional because the upstream spreadsheet leaves cells
/// blank; a `Product` that reaches a snapshot is otherwise complete. The
/// aliases accept the column names used by the import job.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Product {
    pub id: u64,
    /// Scientific name of the host plant.
    #[serde(default, alias = "scientific_name")]
    pub plant_scientific_name: Option<String>,
    #[serde(default, alias = "disease")]
    pub disease_common_name: Option<String>,
    #[serde(default)]
    pub disease_scientific_name: Option<String>,
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default)]
    pub product_link: Option<String>,
    #[serde(default, alias = "how_to_use")]
    pub usage_instructions: Option<String>,
    #[serde(default, alias = "product_image")]
    pub image: Option<String>,
}

impl Product {
    pub fn new(id: u64) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }

    pub fn with_plant(mut self, name: impl Into<String>) -> Self {
        self.plant_scientific_name = Some(name.into());
        self
    }

    pub fn with_disease(mut self, scientific_name: impl Into<String>) -> Self {
        self.disease_scientific_name = Some(scientific_name.into());
        self
    }

    pub fn with_disease_common_name(mut self, name: impl Into<String>) -> Self {
        self.disease_common_name = Some(name.into());
        self
    }

    pub fn with_product_name(mut self, name: impl Into<String>) -> Self {
        self.product_name = Some(name.into());
        self
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.product_link = Some(link.into());
        self
    }

    pub fn with_usage(mut self, usage: impl Into<String>) -> Self {
        self.usage_instructions = Some(usage.into());
        self
    }
}
