use anyhow::bail;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// The fixed set of categories an expense can be registered under.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub enum Category {
    Food,
    Transport,
    Housing,
    Health,
    Leisure,
    Education,
    #[serde(rename = "Shopping/Apparel")]
    Shopping,
    #[serde(rename = "Subscriptions/Services")]
    Subscriptions,
    Investments,
    Gifts,
    Other,
}

serde_plain::derive_display_from_serialize!(Category);

impl Category {
    pub const ALL: [Category; 11] = [
        Category::Food,
        Category::Transport,
        Category::Housing,
        Category::Health,
        Category::Leisure,
        Category::Education,
        Category::Shopping,
        Category::Subscriptions,
        Category::Investments,
        Category::Gifts,
        Category::Other,
    ];

    /// Finds the category whose label is exactly `label`.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.to_string() == label)
    }
}

impl FromStr for Category {
    type Err = anyhow::Error;

    /// Lenient parsing for user input: the match is case-insensitive and either the full label
    /// (`Shopping/Apparel`) or its first part (`shopping`) is accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        let found = Self::ALL.into_iter().find(|c| {
            let label = c.to_string().to_lowercase();
            label == wanted || label.split('/').next() == Some(wanted.as_str())
        });
        match found {
            Some(category) => Ok(category),
            None => bail!(
                "Unknown category '{s}', expected one of: {}",
                Self::ALL
                    .iter()
                    .map(|c| c.to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        }
    }
}

/// The category cell of a stored expense. Labels outside the fixed set can only get into the
/// sheet by editing it directly; they are kept exactly as found.
#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum CategoryLabel {
    Known(Category),
    Unlisted(String),
}

impl CategoryLabel {
    /// Interprets a cell's text. This never fails.
    pub fn from_cell(s: &str) -> Self {
        match Category::from_label(s) {
            Some(category) => CategoryLabel::Known(category),
            None => CategoryLabel::Unlisted(s.to_string()),
        }
    }

    pub fn known(&self) -> Option<Category> {
        match self {
            CategoryLabel::Known(category) => Some(*category),
            CategoryLabel::Unlisted(_) => None,
        }
    }
}

impl Default for CategoryLabel {
    fn default() -> Self {
        CategoryLabel::Unlisted(String::new())
    }
}

impl From<Category> for CategoryLabel {
    fn from(value: Category) -> Self {
        CategoryLabel::Known(value)
    }
}

impl Display for CategoryLabel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CategoryLabel::Known(category) => Display::fmt(category, f),
            CategoryLabel::Unlisted(s) => f.write_str(s),
        }
    }
}

impl Serialize for CategoryLabel {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for CategoryLabel {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(CategoryLabel::from_cell(&s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels() {
        let labels: Vec<String> = Category::ALL.iter().map(|c| c.to_string()).collect();
        assert_eq!(
            labels,
            vec![
                "Food",
                "Transport",
                "Housing",
                "Health",
                "Leisure",
                "Education",
                "Shopping/Apparel",
                "Subscriptions/Services",
                "Investments",
                "Gifts",
                "Other",
            ]
        );
    }

    #[test]
    fn test_from_label_is_exact() {
        assert_eq!(Category::from_label("Food"), Some(Category::Food));
        assert_eq!(
            Category::from_label("Shopping/Apparel"),
            Some(Category::Shopping)
        );
        assert_eq!(Category::from_label("food"), None);
        assert_eq!(Category::from_label("Shopping"), None);
    }

    #[test]
    fn test_from_str_is_lenient() {
        assert_eq!("food".parse::<Category>().unwrap(), Category::Food);
        assert_eq!(" GIFTS ".parse::<Category>().unwrap(), Category::Gifts);
        assert_eq!("shopping".parse::<Category>().unwrap(), Category::Shopping);
        assert_eq!(
            "subscriptions/services".parse::<Category>().unwrap(),
            Category::Subscriptions
        );
    }

    #[test]
    fn test_from_str_unknown() {
        let err = "Groceries".parse::<Category>().unwrap_err();
        assert!(err.to_string().contains("Unknown category 'Groceries'"));
        assert!(err.to_string().contains("Subscriptions/Services"));
    }

    #[test]
    fn test_category_label_keeps_unknown_text() {
        assert_eq!(
            CategoryLabel::from_cell("Food"),
            CategoryLabel::Known(Category::Food)
        );
        let unlisted = CategoryLabel::from_cell("Pets ");
        assert_eq!(unlisted, CategoryLabel::Unlisted("Pets ".to_string()));
        assert_eq!(unlisted.to_string(), "Pets ");
        assert_eq!(unlisted.known(), None);
    }

    #[test]
    fn test_category_label_serde() {
        let json = serde_json::to_string(&CategoryLabel::from(Category::Shopping)).unwrap();
        assert_eq!(json, "\"Shopping/Apparel\"");
        let label: CategoryLabel = serde_json::from_str("\"Health\"").unwrap();
        assert_eq!(label.known(), Some(Category::Health));
    }
}
