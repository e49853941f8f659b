/// Shopping-list data model: products, quantities, and store groups.
///
/// Products have no stable id; a product is identified by its position inside
/// the owning group's `products` vec.
use std::fmt;

// ── Quantity ──────────────────────────────────────────────────────────────────

/// Selectable quantities, exactly as offered by the quantity dropdown.
pub const QUANTITY_OPTIONS: [&str; 9] = ["1", "2", "3", "4", "5", "6", "7", "8", "9"];

/// A product quantity, always within `1..=9`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Quantity(u8);

impl Quantity {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 9;

    pub fn new(n: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&n).then_some(Self(n))
    }

    /// Clamp any integer into the selectable range.
    pub fn clamped(n: i64) -> Self {
        Self(n.clamp(Self::MIN as i64, Self::MAX as i64) as u8)
    }

    /// Parse dropdown/free text. Anything that isn't one of "1".."9" becomes 1.
    pub fn parse_or_default(text: &str) -> Self {
        text.trim()
            .parse::<u8>()
            .ok()
            .and_then(Self::new)
            .unwrap_or_default()
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Index into `QUANTITY_OPTIONS`.
    pub fn option_index(self) -> usize {
        (self.0 - Self::MIN) as usize
    }

    pub fn from_option_index(idx: usize) -> Self {
        Self::clamped(idx as i64 + Self::MIN as i64)
    }

    pub fn as_option(self) -> &'static str {
        QUANTITY_OPTIONS[self.option_index()]
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Self(Self::MIN)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ── Product ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub name: String,
    /// Emoji or short glyph shown on the card; falls back to the name's first char
    pub icon: Option<String>,
    pub quantity: Quantity,
    pub memo: Option<String>,
    pub checked: bool,
}

impl Product {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            icon: None,
            quantity: Quantity::default(),
            memo: None,
            checked: false,
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = non_blank(icon.into());
        self
    }

    pub fn with_quantity(mut self, n: u8) -> Self {
        self.quantity = Quantity::clamped(n as i64);
        self
    }

    pub fn with_memo(mut self, memo: impl Into<String>) -> Self {
        self.memo = non_blank(memo.into());
        self
    }

    pub fn toggle_checked(&mut self) {
        self.checked = !self.checked;
    }

    /// True when there is a memo worth showing (not missing, not whitespace).
    pub fn has_memo(&self) -> bool {
        self.memo.as_deref().is_some_and(|m| !m.trim().is_empty())
    }

    /// Glyph for the card: the icon if set, else the first character of the name.
    pub fn glyph(&self) -> String {
        match &self.icon {
            Some(icon) => icon.clone(),
            None => self.name.chars().take(1).collect(),
        }
    }

    /// Top-right badge: a memo marker wins over the quantity; quantity 1 shows nothing.
    pub fn badge(&self) -> Option<String> {
        if self.has_memo() {
            Some("●".to_string())
        } else if self.quantity.get() > 1 {
            Some(format!("x{}", self.quantity))
        } else {
            None
        }
    }
}

/// `Some(trimmed)` unless the text is blank.
pub fn non_blank(text: String) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else if trimmed.len() == text.len() {
        Some(text)
    } else {
        Some(trimmed.to_string())
    }
}

// ── Group ─────────────────────────────────────────────────────────────────────

/// Products bought at one store within a plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub name: String,
    pub products: Vec<Product>,
}

impl Group {
    pub fn new(name: impl Into<String>, products: Vec<Product>) -> Self {
        Self { name: name.into(), products }
    }

    pub fn checked_count(&self) -> usize {
        self.products.iter().filter(|p| p.checked).count()
    }
}
