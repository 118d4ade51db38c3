use serde::{Deserialize, Serialize};

/// Color used when a category matches no taxonomy group.
pub const DEFAULT_CATEGORY_COLOR: &str = "#555";

/// Prefix for generated avatars; the facilitator name is appended.
pub const DEFAULT_AVATAR: &str = "https://ui-avatars.com/api/?background=random&name=";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryGroup {
    pub id: String,
    pub label: String,
    pub color: String,
    pub items: Vec<String>,
}

impl CategoryGroup {
    fn new(id: &str, label: &str, color: &str, items: &[&str]) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            color: color.into(),
            items: items.iter().map(|item| (*item).to_string()).collect(),
        }
    }
}

/// The static taxonomy shipped with the catalogue.
pub fn default_category_groups() -> Vec<CategoryGroup> {
    vec![
        CategoryGroup::new(
            "principles",
            "General 3 Principles Understanding",
            "#2A81CB",
            &["Foundations", "Key Concepts", "Getting Started"],
        ),
        CategoryGroup::new(
            "listening",
            "Deep Listening",
            "#2AAD27",
            &["Presence", "Understanding", "Connection"],
        ),
        CategoryGroup::new(
            "communities",
            "Working with Communities",
            "#CB8427",
            &["Community Support", "Collective Wellbeing", "Local Impact"],
        ),
        CategoryGroup::new(
            "business",
            "Working with Businesses",
            "#CB2B3E",
            &["Leadership", "Workplace Wellbeing", "Performance"],
        ),
        CategoryGroup::new(
            "schools",
            "Schools & Education",
            "#9C2BCB",
            &["Students", "Educators", "Learning Environments"],
        ),
        CategoryGroup::new(
            "corrections",
            "Corrections, Probation & Parole",
            "#CAC428",
            &["Rehabilitation", "Staff Support", "Reintegration"],
        ),
        CategoryGroup::new("health", "Physical Health", "#20B2AA", &["General"]),
        CategoryGroup::new("books", "Book Clubs", "#FF69B4", &["General"]),
    ]
}
