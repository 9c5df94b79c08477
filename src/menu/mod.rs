//! Menu
//!
//! Static, filterable catalog of the restaurant's dishes.

pub mod catalog;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use catalog::MenuCatalog;

pub type MenuItemId = u32;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MenuCategory {
    Appetizers,
    #[serde(rename = "Main Courses")]
    MainCourses,
    Desserts,
    Beverages,
}

impl MenuCategory {
    pub const ALL: [MenuCategory; 4] = [
        MenuCategory::Appetizers,
        MenuCategory::MainCourses,
        MenuCategory::Desserts,
        MenuCategory::Beverages,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MenuCategory::Appetizers => "Appetizers",
            MenuCategory::MainCourses => "Main Courses",
            MenuCategory::Desserts => "Desserts",
            MenuCategory::Beverages => "Beverages",
        }
    }

    /// Parse a category filter; "All" (or nothing) means no filter
    pub fn parse_filter(s: &str) -> Result<Option<MenuCategory>, String> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            return Ok(None);
        }
        trimmed.parse().map(Some)
    }
}

impl fmt::Display for MenuCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MenuCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .collect::<String>()
            .to_ascii_lowercase();

        match normalized.as_str() {
            "appetizers" | "appetizer" => Ok(MenuCategory::Appetizers),
            "maincourses" | "maincourse" | "mains" => Ok(MenuCategory::MainCourses),
            "desserts" | "dessert" => Ok(MenuCategory::Desserts),
            "beverages" | "beverage" | "drinks" => Ok(MenuCategory::Beverages),
            _ => Err(format!("Unknown menu category: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Dietary {
    Vegetarian,
    GlutenFree,
}

impl fmt::Display for Dietary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dietary::Vegetarian => write!(f, "vegetarian"),
            Dietary::GlutenFree => write!(f, "gluten-free"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum SpiceLevel {
    Mild = 1,
    Medium = 2,
    Hot = 3,
}

/// A dish or drink on the menu
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MenuItem {
    pub id: MenuItemId,
    pub name: String,
    pub description: String,
    /// Whole dollars
    pub price: u32,
    pub category: MenuCategory,
    pub image: String,
    pub dietary: Vec<Dietary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spice_level: Option<SpiceLevel>,
    #[serde(default)]
    pub signature: bool,
    pub prep_minutes: u32,
    pub rating: f32,
}

impl MenuItem {
    pub fn is(&self, dietary: Dietary) -> bool {
        self.dietary.contains(&dietary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_parsing() {
        assert_eq!("Appetizers".parse(), Ok(MenuCategory::Appetizers));
        assert_eq!("main-courses".parse(), Ok(MenuCategory::MainCourses));
        assert_eq!("Main Courses".parse(), Ok(MenuCategory::MainCourses));
        assert_eq!("DESSERTS".parse(), Ok(MenuCategory::Desserts));
        assert!("Sides".parse::<MenuCategory>().is_err());

        assert_eq!(MenuCategory::parse_filter("All"), Ok(None));
        assert_eq!(MenuCategory::parse_filter(""), Ok(None));
        assert_eq!(MenuCategory::parse_filter("beverages"), Ok(Some(MenuCategory::Beverages)));
    }

    #[test]
    fn test_wire_names() {
        assert_eq!(
            serde_json::to_string(&MenuCategory::MainCourses).unwrap(),
            "\"Main Courses\""
        );
        assert_eq!(serde_json::to_string(&Dietary::GlutenFree).unwrap(), "\"gluten-free\"");
        assert_eq!(MenuCategory::MainCourses.to_string(), "Main Courses");
    }
}
