//! Built-in card catalog and the text overlaid on the rendered card.

use std::fmt;
use std::str::FromStr;

/// Pseudo-category that matches every product.
pub const ALL_CATEGORIES: &str = "Все";
pub const SUPERHEROES: &str = "Супергерои";
pub const CARS: &str = "Автомобили";

/// Tag shown in the overlay's bottom-left corner.
pub const OVERLAY_TAG: &str = "HOLOGRAPHIC";

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Rarity {
    Rare,
    Legendary,
    Mythic,
}

impl Rarity {
    pub fn label(self) -> &'static str {
        match self {
            Rarity::Rare => "Редкая",
            Rarity::Legendary => "Легендарная",
            Rarity::Mythic => "Мифическая",
        }
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown rarity label: {0}")]
pub struct UnknownRarity(pub String);

impl FromStr for Rarity {
    type Err = UnknownRarity;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [Rarity::Rare, Rarity::Legendary, Rarity::Mythic]
            .into_iter()
            .find(|r| r.label() == s)
            .ok_or_else(|| UnknownRarity(s.to_owned()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub id: u32,
    pub name: &'static str,
    pub category: &'static str,
    pub price: &'static str,
    pub rarity: Rarity,
    pub image: &'static str,
    pub description: &'static str,
}

const PLACEHOLDER_IMAGE: &str = "/api/placeholder/300/400";

pub static PRODUCTS: [Product; 6] = [
    Product {
        id: 1,
        name: "Spider-Man Holographic",
        category: SUPERHEROES,
        price: "2,500 ₽",
        rarity: Rarity::Legendary,
        image: PLACEHOLDER_IMAGE,
        description: "Голографическая карточка Человека-паука с уникальными переливами",
    },
    Product {
        id: 2,
        name: "Batman Dark Knight",
        category: SUPERHEROES,
        price: "3,200 ₽",
        rarity: Rarity::Mythic,
        image: PLACEHOLDER_IMAGE,
        description: "Эксклюзивная карточка Бэтмена в темном исполнении",
    },
    Product {
        id: 3,
        name: "Ferrari LaFerrari",
        category: CARS,
        price: "2,800 ₽",
        rarity: Rarity::Legendary,
        image: PLACEHOLDER_IMAGE,
        description: "Голографическая карточка легендарного суперкара Ferrari",
    },
    Product {
        id: 4,
        name: "Wonder Woman",
        category: SUPERHEROES,
        price: "2,400 ₽",
        rarity: Rarity::Rare,
        image: PLACEHOLDER_IMAGE,
        description: "Карточка Чудо-женщины с золотистыми голографическими элементами",
    },
    Product {
        id: 5,
        name: "Lamborghini Aventador",
        category: CARS,
        price: "2,600 ₽",
        rarity: Rarity::Legendary,
        image: PLACEHOLDER_IMAGE,
        description: "Эксклюзивная карточка Lamborghini с неоновыми переливами",
    },
    Product {
        id: 6,
        name: "Iron Man Mark 85",
        category: SUPERHEROES,
        price: "3,500 ₽",
        rarity: Rarity::Mythic,
        image: PLACEHOLDER_IMAGE,
        description: "Ультра-редкая карточка Железного человека в броне Mark 85",
    },
];

/// Filter buttons, in display order.
pub fn categories() -> [&'static str; 3] {
    [ALL_CATEGORIES, SUPERHEROES, CARS]
}

/// Products in `category`, or all of them for [`ALL_CATEGORIES`].
pub fn filter(category: &str) -> impl Iterator<Item = &'static Product> + '_ {
    PRODUCTS
        .iter()
        .filter(move |p| category == ALL_CATEGORIES || p.category == category)
}

pub fn find(id: u32) -> Option<&'static Product> {
    PRODUCTS.iter().find(|p| p.id == id)
}

/// Text drawn over the card canvas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardOverlay {
    pub category: String,
    pub rarity: &'static str,
    pub name: &'static str,
    pub tag: &'static str,
    pub price: &'static str,
}

impl From<&Product> for CardOverlay {
    fn from(p: &Product) -> Self {
        Self {
            category: p.category.to_uppercase(),
            rarity: p.rarity.label(),
            name: p.name,
            tag: OVERLAY_TAG,
            price: p.price,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_matches_every_product() {
        assert_eq!(filter(ALL_CATEGORIES).count(), PRODUCTS.len());

        let [all, rest @ ..] = categories();
        assert_eq!(all, ALL_CATEGORIES);
        let split: usize = rest.iter().map(|c| filter(c).count()).sum();
        assert_eq!(split, PRODUCTS.len());
    }

    #[test]
    fn filter_by_category() {
        let ids: Vec<u32> = filter(CARS).map(|p| p.id).collect();
        assert_eq!(ids, vec![3, 5]);
        let ids: Vec<u32> = filter(SUPERHEROES).map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2, 4, 6]);
        assert_eq!(filter("Аниме").count(), 0);
    }

    #[test]
    fn rarity_labels_round_trip() {
        for r in [Rarity::Rare, Rarity::Legendary, Rarity::Mythic] {
            assert_eq!(r.label().parse::<Rarity>(), Ok(r));
        }
        assert_eq!(
            "Обычная".parse::<Rarity>(),
            Err(UnknownRarity("Обычная".to_owned()))
        );
    }

    #[test]
    fn overlay_uppercases_category() {
        let overlay = CardOverlay::from(find(3).unwrap());
        assert_eq!(overlay.category, "АВТОМОБИЛИ");
        assert_eq!(overlay.rarity, "Легендарная");
        assert_eq!(overlay.tag, "HOLOGRAPHIC");
        assert_eq!(overlay.price, "2,800 ₽");
        assert!(find(42).is_none());
    }
}
