/// Product add form. Collects field text and turns it into a `Product` on save.
///
/// Base price, groups, tags and image are collected but not carried into the
/// product yet; `Product` has no place for them.
use std::path::PathBuf;

use crate::model::{Product, Quantity, non_blank};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AddField {
    #[default]
    Name,
    Icon,
    Memo,
    Quantity,
    BasePrice,
}

impl AddField {
    pub const ALL: [AddField; 5] = [
        AddField::Name,
        AddField::Icon,
        AddField::Memo,
        AddField::Quantity,
        AddField::BasePrice,
    ];

    pub fn label(self) -> &'static str {
        match self {
            AddField::Name => "Name",
            AddField::Icon => "Icon (1 char)",
            AddField::Memo => "Memo",
            AddField::Quantity => "Quantity",
            AddField::BasePrice => "Base price",
        }
    }

    pub fn next(self) -> Self {
        let i = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        let i = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(i + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductAddForm {
    pub name: String,
    pub icon: String,
    pub memo: String,
    /// Dropdown selection, one of "1".."9"
    pub quantity: String,
    pub base_price: String,
    pub groups: Vec<String>,
    pub tags: Vec<String>,
    pub image: Option<PathBuf>,
}

impl Default for ProductAddForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            icon: String::new(),
            memo: String::new(),
            quantity: Quantity::default().as_option().to_string(),
            base_price: String::new(),
            groups: Vec::new(),
            tags: Vec::new(),
            image: None,
        }
    }
}

impl ProductAddForm {
    pub fn select_quantity(&mut self, q: Quantity) {
        self.quantity = q.as_option().to_string();
    }

    pub fn quantity(&self) -> Quantity {
        Quantity::parse_or_default(&self.quantity)
    }

    /// Build the product the current fields describe. None while the name is blank.
    pub fn build(&self) -> Option<Product> {
        let name = non_blank(self.name.clone())?;
        Some(Product {
            name,
            icon: non_blank(self.icon.clone()),
            quantity: self.quantity(),
            memo: non_blank(self.memo.clone()),
            checked: false,
        })
    }

    /// Hand the built product to `on_save`. A blank name hands the form back
    /// untouched so the dialog can stay open.
    pub fn save(self, on_save: impl FnOnce(Product)) -> Result<(), Self> {
        match self.build() {
            Some(product) => {
                on_save(product);
                Ok(())
            }
            None => Err(self),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_builds_product() {
        let form = ProductAddForm {
            name: "卵".to_string(),
            icon: "🥚".to_string(),
            memo: "Lサイズ".to_string(),
            quantity: "2".to_string(),
            base_price: "248".to_string(),
            tags: vec!["朝食".to_string()],
            ..Default::default()
        };
        let mut saved = None;
        form.save(|p| saved = Some(p)).unwrap();
        let p = saved.unwrap();
        assert_eq!(p.name, "卵");
        assert_eq!(p.icon.as_deref(), Some("🥚"));
        assert_eq!(p.memo.as_deref(), Some("Lサイズ"));
        assert_eq!(p.quantity.get(), 2);
        assert!(!p.checked);
    }

    #[test]
    fn test_blank_optional_fields_become_none() {
        let form = ProductAddForm {
            name: "スイカ".to_string(),
            icon: "   ".to_string(),
            memo: "\n".to_string(),
            ..Default::default()
        };
        let p = form.build().unwrap();
        assert_eq!(p.icon, None);
        assert_eq!(p.memo, None);
        assert_eq!(p.quantity.get(), 1);
    }

    #[test]
    fn test_blank_name_is_handed_back() {
        let form = ProductAddForm { name: "  ".to_string(), memo: "keep".to_string(), ..Default::default() };
        let mut called = false;
        let back = form.save(|_| called = true).unwrap_err();
        assert!(!called);
        assert_eq!(back.memo, "keep");
    }

    #[test]
    fn test_unparseable_quantity_defaults_to_one() {
        let form = ProductAddForm {
            name: "パン".to_string(),
            quantity: "many".to_string(),
            ..Default::default()
        };
        assert_eq!(form.build().unwrap().quantity.get(), 1);
    }

    #[test]
    fn test_field_cycle_wraps() {
        assert_eq!(AddField::Name.next(), AddField::Icon);
        assert_eq!(AddField::BasePrice.next(), AddField::Name);
        assert_eq!(AddField::Name.prev(), AddField::BasePrice);
    }
}
