//! Majors and subjects: small code/name lookup tables with the same shape.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::validation::{ValidationError, require_text};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    pub id: String,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

pub type Major = CatalogEntry;
pub type Subject = CatalogEntry;

#[derive(Debug, Clone, Deserialize)]
pub struct NewCatalogEntryRequest {
    pub code: String,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCatalogEntryRequest {
    pub code: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
}

impl NewCatalogEntryRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("code", &self.code)?;
        require_text("name", &self.name)
    }
}

impl CatalogEntry {
    pub fn apply(&mut self, req: UpdateCatalogEntryRequest) -> Result<(), ValidationError> {
        if let Some(code) = req.code {
            require_text("code", &code)?;
            self.code = code;
        }
        if let Some(name) = req.name {
            require_text("name", &name)?;
            self.name = name;
        }
        if let Some(description) = req.description {
            self.description = Some(description);
        }
        Ok(())
    }
}
