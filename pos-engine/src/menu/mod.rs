//! Menu catalog (dishes) and the customization dialog rules
//!
//! [`resolve_customizations`] turns the guest's choices into the `Customizations`
//! the cart aggregator compares. A missing required choice is rejected here,
//! before anything reaches the cart.

use crate::money;
use crate::utils::validation::{MAX_NAME_LEN, MAX_NOTE_LEN, validate_optional_text, validate_required_text};
use shared::error::{AppError, ErrorCode};
use shared::models::{
    Category, Customizations, Extra, MenuItem, MenuItemCreate, MenuItemUpdate,
};
use shared::types::ProductId;
use shared::util::snowflake_id;
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

/// Menu errors
#[derive(Debug, Error, PartialEq)]
pub enum MenuError {
    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),

    #[error("Category not found: {0}")]
    CategoryNotFound(i64),

    #[error("Category {0} still has products")]
    CategoryHasProducts(i64),

    #[error("{0} is currently unavailable")]
    Unavailable(String),

    #[error("Please select an option for {0}")]
    MissingRequired(String),

    #[error("Unknown customization: {0}")]
    UnknownCustomization(String),

    #[error("Only one option may be selected for {0}")]
    SingleSelect(String),

    #[error("{0}")]
    Invalid(String),
}

impl From<MenuError> for AppError {
    fn from(err: MenuError) -> Self {
        let code = match &err {
            MenuError::ProductNotFound(_) => ErrorCode::ProductNotFound,
            MenuError::CategoryNotFound(_) => ErrorCode::CategoryNotFound,
            MenuError::CategoryHasProducts(_) => ErrorCode::CategoryHasProducts,
            MenuError::Unavailable(_) => ErrorCode::ProductUnavailable,
            MenuError::MissingRequired(_) => ErrorCode::CustomizationRequired,
            MenuError::UnknownCustomization(_) | MenuError::SingleSelect(_) => {
                ErrorCode::CustomizationInvalid
            }
            MenuError::Invalid(_) => ErrorCode::ValidationFailed,
        };
        AppError::with_message(code, err.to_string())
    }
}

impl From<AppError> for MenuError {
    fn from(err: AppError) -> Self {
        MenuError::Invalid(err.message)
    }
}

/// What the guest picked in the customization dialog
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CustomizationSelection {
    /// Group name → chosen option names
    pub choices: BTreeMap<String, Vec<String>>,
    pub removed_ingredients: Vec<String>,
}

impl CustomizationSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pick `option` in `group` (builder style)
    pub fn choose(mut self, group: impl Into<String>, option: impl Into<String>) -> Self {
        self.choices
            .entry(group.into())
            .or_default()
            .push(option.into());
        self
    }

    /// Ask to leave out an ingredient (builder style)
    pub fn without(mut self, ingredient: impl Into<String>) -> Self {
        self.removed_ingredients.push(ingredient.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.choices.values().all(Vec::is_empty) && self.removed_ingredients.is_empty()
    }
}

/// Validate a selection against the item and build its customizations.
///
/// Each chosen option becomes an extra named `"<group>: <option>"`. An empty
/// selection resolves to `None` so it merges with plain additions.
pub fn resolve_customizations(
    item: &MenuItem,
    selection: &CustomizationSelection,
) -> Result<Option<Customizations>, MenuError> {
    for (group_name, options) in &selection.choices {
        let group = item
            .group(group_name)
            .ok_or_else(|| MenuError::UnknownCustomization(group_name.clone()))?;
        if !group.multi_select && options.len() > 1 {
            return Err(MenuError::SingleSelect(group.name.clone()));
        }
        if let Some(unknown) = options.iter().find(|o| group.option(o).is_none()) {
            return Err(MenuError::UnknownCustomization(format!(
                "{}: {}",
                group.name, unknown
            )));
        }
    }

    if let Some(missing) = item.customization_groups.iter().find(|g| {
        g.required
            && selection
                .choices
                .get(&g.name)
                .is_none_or(|chosen| chosen.is_empty())
    }) {
        return Err(MenuError::MissingRequired(missing.name.clone()));
    }

    if let Some(unknown) = selection
        .removed_ingredients
        .iter()
        .find(|i| !item.has_ingredient(i))
    {
        return Err(MenuError::UnknownCustomization(format!(
            "{} has no {}",
            item.name, unknown
        )));
    }

    if selection.is_empty() {
        return Ok(None);
    }

    // Follow the menu's group order so equal selections produce equal extras
    let mut extras = Vec::new();
    for group in &item.customization_groups {
        let Some(chosen) = selection.choices.get(&group.name) else {
            continue;
        };
        let chosen: BTreeSet<&str> = chosen.iter().map(String::as_str).collect();
        for option in group.options.iter().filter(|o| chosen.contains(o.name.as_str())) {
            extras.push(Extra::new(
                format!("{}: {}", group.name, option.name),
                option.price,
            ));
        }
    }

    let removed: BTreeSet<&String> = selection.removed_ingredients.iter().collect();
    Ok(Some(Customizations {
        removed_ingredients: removed.into_iter().cloned().collect(),
        extras,
    }))
}

/// In-memory menu catalog
#[derive(Debug, Clone, Default)]
pub struct Menu {
    categories: Vec<Category>,
    items: Vec<MenuItem>,
}

impl Menu {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    pub fn add_category(&mut self, name: &str) -> Result<i64, MenuError> {
        validate_required_text(name, "category name", MAX_NAME_LEN)?;
        let id = snowflake_id();
        self.categories.push(Category {
            id,
            name: name.trim().to_string(),
        });
        Ok(id)
    }

    /// Remove an empty category
    pub fn remove_category(&mut self, id: i64) -> Result<Category, MenuError> {
        let idx = self
            .categories
            .iter()
            .position(|c| c.id == id)
            .ok_or(MenuError::CategoryNotFound(id))?;
        if self.items.iter().any(|i| i.category_id == id) {
            return Err(MenuError::CategoryHasProducts(id));
        }
        Ok(self.categories.remove(idx))
    }

    pub fn add_item(&mut self, payload: MenuItemCreate) -> Result<ProductId, MenuError> {
        validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
        validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;
        money::validate_price(payload.base_price, "base_price")?;
        self.require_category(payload.category_id)?;
        for group in &payload.customization_groups {
            validate_required_text(&group.name, "customization group", MAX_NAME_LEN)?;
            if group.options.is_empty() {
                return Err(MenuError::Invalid(format!(
                    "customization group {} has no options",
                    group.name
                )));
            }
        }

        let id = snowflake_id();
        tracing::debug!(product_id = id, name = %payload.name, "Menu item created");
        self.items.push(MenuItem {
            id,
            name: payload.name.trim().to_string(),
            category_id: payload.category_id,
            base_price: payload.base_price,
            description: payload.description,
            ingredients: payload.ingredients,
            customization_groups: payload.customization_groups,
            available: true,
        });
        Ok(id)
    }

    pub fn update_item(
        &mut self,
        id: ProductId,
        update: MenuItemUpdate,
    ) -> Result<&MenuItem, MenuError> {
        if let Some(name) = &update.name {
            validate_required_text(name, "name", MAX_NAME_LEN)?;
        }
        if let Some(price) = update.base_price {
            money::validate_price(price, "base_price")?;
        }
        if let Some(category_id) = update.category_id {
            self.require_category(category_id)?;
        }
        validate_optional_text(&update.description, "description", MAX_NOTE_LEN)?;

        let item = self
            .items
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or(MenuError::ProductNotFound(id))?;
        if let Some(name) = update.name {
            item.name = name.trim().to_string();
        }
        if let Some(category_id) = update.category_id {
            item.category_id = category_id;
        }
        if let Some(price) = update.base_price {
            item.base_price = price;
        }
        if update.description.is_some() {
            item.description = update.description;
        }
        if let Some(available) = update.available {
            item.available = available;
        }
        Ok(&*item)
    }

    pub fn remove_item(&mut self, id: ProductId) -> Result<MenuItem, MenuError> {
        let idx = self
            .items
            .iter()
            .position(|i| i.id == id)
            .ok_or(MenuError::ProductNotFound(id))?;
        Ok(self.items.remove(idx))
    }

    /// Flip availability, returning the new state
    pub fn toggle_available(&mut self, id: ProductId) -> Result<bool, MenuError> {
        let item = self
            .items
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or(MenuError::ProductNotFound(id))?;
        item.available = !item.available;
        Ok(item.available)
    }

    pub fn get(&self, id: ProductId) -> Option<&MenuItem> {
        self.items.iter().find(|i| i.id == id)
    }

    /// Look up an item that can be ordered right now
    pub fn orderable(&self, id: ProductId) -> Result<&MenuItem, MenuError> {
        let item = self.get(id).ok_or(MenuError::ProductNotFound(id))?;
        if !item.available {
            return Err(MenuError::Unavailable(item.name.clone()));
        }
        Ok(item)
    }

    pub fn find_by_name(&self, name: &str) -> Option<&MenuItem> {
        self.items.iter().find(|i| i.name.eq_ignore_ascii_case(name))
    }

    pub fn by_category(&self, category_id: i64) -> Vec<&MenuItem> {
        self.items
            .iter()
            .filter(|i| i.category_id == category_id)
            .collect()
    }

    /// Case-insensitive substring search on the name
    pub fn search(&self, query: &str) -> Vec<&MenuItem> {
        let needle = query.trim().to_lowercase();
        self.items
            .iter()
            .filter(|i| needle.is_empty() || i.name.to_lowercase().contains(&needle))
            .collect()
    }

    fn require_category(&self, id: i64) -> Result<(), MenuError> {
        if self.categories.iter().any(|c| c.id == id) {
            Ok(())
        } else {
            Err(MenuError::CategoryNotFound(id))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use shared::models::{CustomizationGroup, CustomizationOption};

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn size_group() -> CustomizationGroup {
        CustomizationGroup {
            name: "Size".to_string(),
            required: true,
            multi_select: false,
            options: vec![
                CustomizationOption {
                    name: "Small".to_string(),
                    price: Decimal::ZERO,
                },
                CustomizationOption {
                    name: "Medium".to_string(),
                    price: dec("0.50"),
                },
                CustomizationOption {
                    name: "Large".to_string(),
                    price: dec("1.00"),
                },
            ],
        }
    }

    fn extras_group() -> CustomizationGroup {
        CustomizationGroup {
            name: "Extras".to_string(),
            required: false,
            multi_select: true,
            options: vec![
                CustomizationOption {
                    name: "Extra shot".to_string(),
                    price: dec("0.75"),
                },
                CustomizationOption {
                    name: "Vanilla".to_string(),
                    price: dec("0.40"),
                },
            ],
        }
    }

    fn menu_with_latte() -> (Menu, ProductId) {
        let mut menu = Menu::new();
        let drinks = menu.add_category("Drinks").unwrap();
        let id = menu
            .add_item(MenuItemCreate {
                name: "Latte".to_string(),
                category_id: drinks,
                base_price: dec("3.50"),
                description: None,
                ingredients: vec!["foam".to_string()],
                customization_groups: vec![size_group(), extras_group()],
            })
            .unwrap();
        (menu, id)
    }

    #[test]
    fn test_resolve_required_group() {
        let (menu, id) = menu_with_latte();
        let latte = menu.get(id).unwrap();

        let err = resolve_customizations(latte, &CustomizationSelection::new()).unwrap_err();
        assert_eq!(err, MenuError::MissingRequired("Size".to_string()));

        let resolved =
            resolve_customizations(latte, &CustomizationSelection::new().choose("Size", "Medium"))
                .unwrap()
                .unwrap();
        assert_eq!(resolved.extras, vec![Extra::new("Size: Medium", dec("0.50"))]);
        assert!(resolved.removed_ingredients.is_empty());
    }

    #[test]
    fn test_resolve_is_order_independent() {
        let (menu, id) = menu_with_latte();
        let latte = menu.get(id).unwrap();

        let a = CustomizationSelection::new()
            .choose("Extras", "Vanilla")
            .choose("Extras", "Extra shot")
            .choose("Size", "Large");
        let b = CustomizationSelection::new()
            .choose("Size", "Large")
            .choose("Extras", "Extra shot")
            .choose("Extras", "Vanilla");
        assert_eq!(
            resolve_customizations(latte, &a).unwrap(),
            resolve_customizations(latte, &b).unwrap()
        );
    }

    #[test]
    fn test_resolve_rejects_unknown_and_multi() {
        let (menu, id) = menu_with_latte();
        let latte = menu.get(id).unwrap();

        let unknown_option = CustomizationSelection::new().choose("Size", "Huge");
        assert!(matches!(
            resolve_customizations(latte, &unknown_option),
            Err(MenuError::UnknownCustomization(_))
        ));

        let unknown_group = CustomizationSelection::new()
            .choose("Size", "Small")
            .choose("Syrup", "Caramel");
        assert!(matches!(
            resolve_customizations(latte, &unknown_group),
            Err(MenuError::UnknownCustomization(_))
        ));

        let two_sizes = CustomizationSelection::new()
            .choose("Size", "Small")
            .choose("Size", "Large");
        assert_eq!(
            resolve_customizations(latte, &two_sizes),
            Err(MenuError::SingleSelect("Size".to_string()))
        );

        let bad_removal = CustomizationSelection::new()
            .choose("Size", "Small")
            .without("bacon");
        assert!(matches!(
            resolve_customizations(latte, &bad_removal),
            Err(MenuError::UnknownCustomization(_))
        ));
    }

    #[test]
    fn test_resolve_empty_selection_is_none() {
        let mut menu = Menu::new();
        let food = menu.add_category("Food").unwrap();
        let id = menu
            .add_item(MenuItemCreate {
                name: "Burger".to_string(),
                category_id: food,
                base_price: dec("9.00"),
                description: None,
                ingredients: vec!["onion".to_string(), "pickles".to_string()],
                customization_groups: vec![],
            })
            .unwrap();
        let burger = menu.get(id).unwrap();

        assert_eq!(
            resolve_customizations(burger, &CustomizationSelection::new()).unwrap(),
            None
        );
        let no_onion = resolve_customizations(burger, &CustomizationSelection::new().without("onion"))
            .unwrap()
            .unwrap();
        assert_eq!(no_onion.removed_ingredients, vec!["onion".to_string()]);
        assert!(no_onion.extras.is_empty());
    }

    #[test]
    fn test_add_item_validation() {
        let mut menu = Menu::new();
        let cat = menu.add_category("Food").unwrap();

        let err = menu
            .add_item(MenuItemCreate {
                name: "  ".to_string(),
                category_id: cat,
                base_price: dec("1"),
                description: None,
                ingredients: vec![],
                customization_groups: vec![],
            })
            .unwrap_err();
        assert!(matches!(err, MenuError::Invalid(_)));

        let err = menu
            .add_item(MenuItemCreate {
                name: "Soup".to_string(),
                category_id: 12345,
                base_price: dec("1"),
                description: None,
                ingredients: vec![],
                customization_groups: vec![],
            })
            .unwrap_err();
        assert_eq!(err, MenuError::CategoryNotFound(12345));

        let err = menu
            .add_item(MenuItemCreate {
                name: "Soup".to_string(),
                category_id: cat,
                base_price: dec("-1"),
                description: None,
                ingredients: vec![],
                customization_groups: vec![],
            })
            .unwrap_err();
        assert!(matches!(err, MenuError::Invalid(_)));
    }

    #[test]
    fn test_availability_and_orderable() {
        let (mut menu, id) = menu_with_latte();
        assert!(menu.orderable(id).is_ok());

        assert!(!menu.toggle_available(id).unwrap());
        assert_eq!(
            menu.orderable(id).unwrap_err(),
            MenuError::Unavailable("Latte".to_string())
        );
        assert_eq!(menu.orderable(42), Err(MenuError::ProductNotFound(42)));
    }

    #[test]
    fn test_update_item() {
        let (mut menu, id) = menu_with_latte();
        let updated = menu
            .update_item(
                id,
                MenuItemUpdate {
                    base_price: Some(dec("3.80")),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.base_price, dec("3.80"));
        assert_eq!(updated.name, "Latte");
    }

    #[test]
    fn test_search_and_category_filter() {
        let (mut menu, latte) = menu_with_latte();
        let drinks = menu.get(latte).unwrap().category_id;
        let food = menu.add_category("Food").unwrap();
        menu.add_item(MenuItemCreate {
            name: "Chai Latte".to_string(),
            category_id: drinks,
            base_price: dec("3.90"),
            description: None,
            ingredients: vec![],
            customization_groups: vec![],
        })
        .unwrap();
        menu.add_item(MenuItemCreate {
            name: "Nachos".to_string(),
            category_id: food,
            base_price: dec("6.50"),
            description: None,
            ingredients: vec![],
            customization_groups: vec![],
        })
        .unwrap();

        assert_eq!(menu.search("latte").len(), 2);
        assert_eq!(menu.search("").len(), 3);
        assert_eq!(menu.by_category(food).len(), 1);
        assert_eq!(menu.find_by_name("nachos").unwrap().name, "Nachos");
    }

    #[test]
    fn test_remove_category_with_products_rejected() {
        let (mut menu, id) = menu_with_latte();
        let drinks = menu.get(id).unwrap().category_id;
        assert_eq!(
            menu.remove_category(drinks),
            Err(MenuError::CategoryHasProducts(drinks))
        );
        menu.remove_item(id).unwrap();
        assert!(menu.remove_category(drinks).is_ok());
    }

    #[test]
    fn test_menu_error_codes() {
        let err: AppError = MenuError::MissingRequired("Size".into()).into();
        assert_eq!(err.code, ErrorCode::CustomizationRequired);
        assert_eq!(err.message, "Please select an option for Size");
    }
}
