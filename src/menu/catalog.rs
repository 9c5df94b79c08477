//! The standard menu

use super::{Dietary, MenuCategory, MenuItem, MenuItemId};

fn photo(number: u32) -> String {
    format!(
        "https://images.pexels.com/photos/{n}/pexels-photo-{n}.jpeg?auto=compress&cs=tinysrgb&w=400",
        n = number
    )
}

#[allow(clippy::too_many_arguments)]
fn dish(
    id: MenuItemId,
    name: &str,
    description: &str,
    price: u32,
    category: MenuCategory,
    photo_number: u32,
    dietary: &[Dietary],
    prep_minutes: u32,
    rating: f32,
) -> MenuItem {
    MenuItem {
        id,
        name: name.to_string(),
        description: description.to_string(),
        price,
        category,
        image: photo(photo_number),
        dietary: dietary.to_vec(),
        spice_level: None,
        signature: false,
        prep_minutes,
        rating,
    }
}

fn signature(mut item: MenuItem) -> MenuItem {
    item.signature = true;
    item
}

/// Read-only list of menu items
#[derive(Debug, Clone)]
pub struct MenuCatalog {
    items: Vec<MenuItem>,
}

impl MenuCatalog {
    pub fn new(items: Vec<MenuItem>) -> Self {
        Self { items }
    }

    /// The restaurant's twelve-dish menu
    pub fn standard() -> Self {
        use Dietary::{GlutenFree, Vegetarian};
        use MenuCategory::{Appetizers, Beverages, Desserts, MainCourses};

        Self::new(vec![
            signature(dish(
                1,
                "Truffle Arancini",
                "Crispy risotto balls filled with wild mushrooms and truffle oil, served with parmesan cream sauce",
                18,
                Appetizers,
                1640777,
                &[Vegetarian],
                15,
                4.8,
            )),
            dish(
                2,
                "Seared Scallops",
                "Pan-seared diver scallops with cauliflower purée, pancetta crisps, and micro greens",
                24,
                Appetizers,
                1640772,
                &[GlutenFree],
                12,
                4.9,
            ),
            dish(
                3,
                "Burrata Caprese",
                "Fresh burrata cheese with heirloom tomatoes, basil oil, and aged balsamic reduction",
                16,
                Appetizers,
                1640774,
                &[Vegetarian, GlutenFree],
                8,
                4.7,
            ),
            signature(dish(
                4,
                "Wagyu Beef Tenderloin",
                "8oz Australian wagyu with roasted bone marrow, seasonal vegetables, and red wine jus",
                65,
                MainCourses,
                1640770,
                &[GlutenFree],
                25,
                4.9,
            )),
            dish(
                5,
                "Lobster Thermidor",
                "Whole Maine lobster with cognac cream sauce, gruyère cheese, and herb-crusted potatoes",
                58,
                MainCourses,
                1640771,
                &[GlutenFree],
                30,
                4.8,
            ),
            dish(
                6,
                "Duck Confit",
                "Slow-cooked duck leg with cherry gastrique, wild rice pilaf, and roasted root vegetables",
                42,
                MainCourses,
                1640773,
                &[GlutenFree],
                35,
                4.6,
            ),
            dish(
                7,
                "Seafood Risotto",
                "Arborio rice with fresh seafood medley, saffron, white wine, and parmesan",
                38,
                MainCourses,
                1640775,
                &[GlutenFree],
                28,
                4.7,
            ),
            signature(dish(
                8,
                "Chocolate Soufflé",
                "Warm dark chocolate soufflé with vanilla bean ice cream and gold leaf",
                14,
                Desserts,
                1640776,
                &[Vegetarian],
                20,
                4.8,
            )),
            dish(
                9,
                "Tiramisu",
                "Classic Italian dessert with espresso-soaked ladyfingers, mascarpone, and cocoa",
                12,
                Desserts,
                1640778,
                &[Vegetarian],
                5,
                4.6,
            ),
            dish(
                10,
                "Crème Brûlée",
                "Vanilla bean custard with caramelized sugar crust and fresh berries",
                13,
                Desserts,
                1640779,
                &[Vegetarian, GlutenFree],
                8,
                4.7,
            ),
            dish(
                11,
                "Signature Cocktail",
                "House special with premium spirits, fresh herbs, and seasonal fruits",
                16,
                Beverages,
                1640780,
                &[],
                5,
                4.5,
            ),
            dish(
                12,
                "Wine Selection",
                "Curated selection of premium wines from our sommelier",
                22,
                Beverages,
                1640781,
                &[],
                2,
                4.8,
            ),
        ])
    }

    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    /// Items in `category`, or everything for `None`
    pub fn filter(&self, category: Option<MenuCategory>) -> Vec<&MenuItem> {
        self.items
            .iter()
            .filter(|item| category.map_or(true, |c| item.category == c))
            .collect()
    }

    pub fn get(&self, id: MenuItemId) -> Option<&MenuItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Categories that have at least one item, in menu order
    pub fn categories(&self) -> Vec<MenuCategory> {
        MenuCategory::ALL
            .into_iter()
            .filter(|c| self.items.iter().any(|item| item.category == *c))
            .collect()
    }

    pub fn signature(&self) -> Vec<&MenuItem> {
        self.items.iter().filter(|item| item.signature).collect()
    }
}

impl Default for MenuCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_menu() {
        let menu = MenuCatalog::standard();
        assert_eq!(menu.items().len(), 12);

        let ids: Vec<MenuItemId> = menu.items().iter().map(|i| i.id).collect();
        assert_eq!(ids, (1..=12).collect::<Vec<_>>());

        let wagyu = menu.get(4).unwrap();
        assert_eq!(wagyu.name, "Wagyu Beef Tenderloin");
        assert_eq!(wagyu.price, 65);
        assert!(wagyu.signature);
        assert!(wagyu.is(Dietary::GlutenFree));
        assert!(wagyu.image.contains("pexels-photo-1640770"));
        assert!(menu.get(13).is_none());
    }

    #[test]
    fn test_filter_by_category() {
        let menu = MenuCatalog::standard();
        assert_eq!(menu.filter(None).len(), 12);

        let counts: Vec<usize> = MenuCategory::ALL
            .iter()
            .map(|c| menu.filter(Some(*c)).len())
            .collect();
        assert_eq!(counts, vec![3, 4, 3, 2]);

        assert!(menu
            .filter(Some(MenuCategory::Desserts))
            .iter()
            .all(|item| item.category == MenuCategory::Desserts));
    }

    #[test]
    fn test_categories_and_signature() {
        let menu = MenuCatalog::standard();
        assert_eq!(menu.categories(), MenuCategory::ALL.to_vec());

        let names: Vec<&str> = menu.signature().iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Truffle Arancini", "Wagyu Beef Tenderloin", "Chocolate Soufflé"]);

        let drinks_only = MenuCatalog::new(menu.filter(Some(MenuCategory::Beverages)).into_iter().cloned().collect());
        assert_eq!(drinks_only.categories(), vec![MenuCategory::Beverages]);
    }
}
