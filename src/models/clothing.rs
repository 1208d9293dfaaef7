use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

/// Fixed clothing category vocabulary accepted on upload.
///
/// Parsing also takes the singular "top"/"bottom" spellings and normalises
/// them to the plural form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Tops,
    Bottoms,
    Dresses,
    Outerwear,
    Shoes,
    Accessories,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Tops => "tops",
            Category::Bottoms => "bottoms",
            Category::Dresses => "dresses",
            Category::Outerwear => "outerwear",
            Category::Shoes => "shoes",
            Category::Accessories => "accessories",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tops" | "top" => Ok(Category::Tops),
            "bottoms" | "bottom" => Ok(Category::Bottoms),
            "dresses" => Ok(Category::Dresses),
            "outerwear" => Ok(Category::Outerwear),
            "shoes" => Ok(Category::Shoes),
            "accessories" => Ok(Category::Accessories),
            other => Err(format!("Unknown clothing category '{}'", other)),
        }
    }
}

/// A single outfit position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Slot {
    Top,
    Bottom,
    Shoes,
}

impl Slot {
    /// Maps a persisted category onto the slot it can fill.
    ///
    /// Case-sensitive; "top"/"bottom" are accepted alongside the plural
    /// spellings. Categories without a slot (dresses, outerwear, ...) map to
    /// `None`.
    pub fn for_category(category: &str) -> Option<Slot> {
        match category {
            "tops" | "top" => Some(Slot::Top),
            "bottoms" | "bottom" => Some(Slot::Bottom),
            "shoes" => Some(Slot::Shoes),
            _ => None,
        }
    }
}

impl Display for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Slot::Top => write!(f, "top"),
            Slot::Bottom => write!(f, "bottom"),
            Slot::Shoes => write!(f, "shoes"),
        }
    }
}

/// Clothing row as persisted, tags still in their stored encoding
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct ClothingRecord {
    pub id: String,
    pub name: Option<String>,
    pub category: String,
    pub image_url: String,
    pub tags_text: Option<String>,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Clothing item returned to clients and fed to the recommender
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClothingItem {
    pub id: String,
    pub name: String,
    pub category: String,
    pub image_url: String,
    pub tags: Vec<String>,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Data needed to insert a new clothing row
#[derive(Debug, Clone)]
pub struct NewClothing {
    pub id: String,
    pub name: String,
    pub category: Category,
    pub image_url: String,
    pub tags: Vec<String>,
    pub user_id: String,
}

/// Owner of uploaded clothes
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, sqlx::FromRow)]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}
