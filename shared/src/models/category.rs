//! Category Model

use serde::{Deserialize, Serialize};

/// Category entity
///
/// Categories form a forest through `parent_id`; deleting a parent detaches
/// its children instead of cascading.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub parent_id: Option<i64>,
    pub sort_order: i32,
    /// Number of products assigned directly to this category
    #[serde(default)]
    pub product_count: i64,
    pub created_at: i64,
}

/// Create category payload
///
/// `name` is optional at the type level so a missing name is reported in
/// the response envelope rather than as a deserialization failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryCreate {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub parent_id: Option<i64>,
    pub sort_order: Option<i32>,
}

/// Update category payload
///
/// `parent_id` distinguishes an absent field (keep the parent) from an
/// explicit `null` (move to the top level).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryUpdate {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub parent_id: Option<Option<i64>>,
    pub sort_order: Option<i32>,
}

/// Wrap any present value (including `null`) in `Some`
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Category with its nested children, for navigation menus
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryNode {
    #[serde(flatten)]
    pub category: Category,
    pub children: Vec<CategoryNode>,
}

/// Build the category forest from a flat list.
///
/// Children keep the order of the input list. Categories whose parent is
/// missing from the list are treated as roots.
pub fn build_tree(categories: Vec<Category>) -> Vec<CategoryNode> {
    use std::collections::{HashMap, HashSet};

    let ids: HashSet<i64> = categories.iter().map(|c| c.id).collect();
    let mut children: HashMap<i64, Vec<Category>> = HashMap::new();
    let mut roots = Vec::new();

    for category in categories {
        match category.parent_id {
            Some(parent) if parent != category.id && ids.contains(&parent) => {
                children.entry(parent).or_default().push(category)
            }
            _ => roots.push(category),
        }
    }

    fn attach(category: Category, children: &mut HashMap<i64, Vec<Category>>) -> CategoryNode {
        let kids = children.remove(&category.id).unwrap_or_default();
        CategoryNode {
            children: kids.into_iter().map(|c| attach(c, children)).collect(),
            category,
        }
    }

    roots
        .into_iter()
        .map(|c| attach(c, &mut children))
        .collect()
}
