use std::fmt;

/// Storefront item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub id: u32,
    pub name: String,
    pub description: String,
    /// Whole roubles
    pub price: u32,
    pub emoji: String,
    pub category: Category,
    pub badge: Option<String>,
}

impl Product {
    pub fn price_label(&self) -> String {
        format!("{} ₽", self.price)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Subscriptions,
    Stickers,
    Themes,
}

impl Category {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "subscriptions" | "subscription" => Some(Self::Subscriptions),
            "stickers" | "sticker" => Some(Self::Stickers),
            "themes" | "theme" => Some(Self::Themes),
            _ => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Subscriptions => "Subscriptions",
            Self::Stickers => "Stickers",
            Self::Themes => "Themes",
        })
    }
}

/// Built-in catalog; there is no product backend
pub fn catalog() -> Vec<Product> {
    let product = |id, name: &str, description: &str, price, emoji: &str, category, badge: Option<&str>| Product {
        id,
        name: name.to_string(),
        description: description.to_string(),
        price,
        emoji: emoji.to_string(),
        category,
        badge: badge.map(str::to_string),
    };

    vec![
        product(1, "Premium subscription", "A month without ads", 299, "💎", Category::Subscriptions, None),
        product(2, "Sticker pack 'Kittens'", "50 exclusive stickers", 99, "🐱", Category::Stickers, None),
        product(3, "Theme 'Space'", "Dark interface theme", 149, "🚀", Category::Themes, None),
        product(4, "Annual subscription", "40% off", 1999, "⭐", Category::Subscriptions, Some("-40%")),
    ]
}

/// Catalog entries of one category, or all of them
pub fn products_in(category: Option<Category>) -> Vec<Product> {
    catalog()
        .into_iter()
        .filter(|p| category.map_or(true, |c| p.category == c))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_by_category() {
        let subs = products_in(Some(Category::Subscriptions));
        assert_eq!(subs.iter().map(|p| p.id).collect::<Vec<_>>(), vec![1, 4]);
        assert_eq!(products_in(None).len(), 4);
    }

    #[test]
    fn test_category_parse_and_price_label() {
        assert_eq!(Category::parse("Themes"), Some(Category::Themes));
        assert_eq!(Category::parse("sticker"), Some(Category::Stickers));
        assert_eq!(Category::parse("food"), None);
        assert_eq!(catalog()[3].price_label(), "1999 ₽");
        assert_eq!(catalog()[3].badge.as_deref(), Some("-40%"));
    }
}
