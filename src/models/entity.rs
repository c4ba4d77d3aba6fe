//! Entity catalog: the static list of suburbs the engine tracks.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Suburb type classification. Affects the classification-adjusted adapter
/// defaults (ownership rate, crime index, infrastructure index).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    Inner,
    Outer,
    Rural,
    Coastal,
    Tourism,
}

/// Immutable catalog row. Created once at startup, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    pub name: String,
    pub region: String,
    pub territorial_authority: String,
    pub classification: Classification,
}

impl Entity {
    pub fn new(
        name: &str,
        region: &str,
        territorial_authority: &str,
        classification: Classification,
    ) -> Self {
        Self {
            name: name.to_string(),
            region: region.to_string(),
            territorial_authority: territorial_authority.to_string(),
            classification,
        }
    }
}

/// Reject duplicate names: the store is keyed by entity name, so a duplicate
/// would silently alias two catalog rows.
pub fn validate_catalog(catalog: &[Entity]) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();
    for entity in catalog {
        if !seen.insert(entity.name.as_str()) {
            return Err(ConfigError::DuplicateEntity(entity.name.clone()));
        }
    }
    Ok(())
}

/// The default suburb catalog. Injectable configuration: deployments can
/// supply their own list, this one mirrors the tracked NZ suburbs.
pub fn default_catalog() -> Vec<Entity> {
    use Classification::*;
    vec![
        Entity::new("Ponsonby", "Auckland", "Auckland", Inner),
        Entity::new("Papakura", "Auckland", "Auckland", Outer),
        Entity::new("Albany", "Auckland", "Auckland", Outer),
        Entity::new("Manukau", "Auckland", "Auckland", Outer),
        Entity::new("Newtown", "Wellington", "Wellington", Inner),
        Entity::new("Karori", "Wellington", "Wellington", Outer),
        Entity::new("Lower Hutt Central", "Wellington", "Wellington", Outer),
        Entity::new("Rolleston", "Canterbury", "Christchurch", Outer),
        Entity::new("Riccarton", "Canterbury", "Christchurch", Inner),
        Entity::new("Papanui", "Canterbury", "Christchurch", Outer),
        Entity::new("Tauranga Central", "Bay of Plenty", "Tauranga", Coastal),
        Entity::new("Mount Maunganui", "Bay of Plenty", "Tauranga", Coastal),
        Entity::new("Hamilton Central", "Waikato", "Hamilton", Inner),
        Entity::new("Cambridge", "Waikato", "Hamilton", Rural),
        Entity::new("Dunedin Central", "Otago", "Dunedin", Inner),
        Entity::new(
            "Palmerston North Central",
            "Manawatu-Whanganui",
            "Palmerston North",
            Inner,
        ),
        Entity::new("New Plymouth Central", "Taranaki", "New Plymouth", Coastal),
        Entity::new("Whangarei Central", "Northland", "Whangarei", Outer),
        Entity::new("Hastings Central", "Hawke's Bay", "Hastings", Rural),
        Entity::new("Nelson Central", "Nelson", "Nelson", Coastal),
        Entity::new("Queenstown Central", "Otago", "Queenstown-Lakes", Tourism),
    ]
}
