/// Product card view state: Viewing ⇄ MemoShown, Viewing ⇄ Editing.
///
/// The card never owns its product; every transition that reads or writes
/// product data borrows it from the owning group.
///
/// Memo auto-hide uses tickets: each tap that reveals the memo carries a fresh
/// ticket, and only an expiry for the current ticket hides it again. A newer tap
/// therefore supersedes the older timer without needing to cancel it.
use crate::model::{Product, Quantity, non_blank};

// ── Edit form ─────────────────────────────────────────────────────────────────

/// Working copy of the editable fields, filled in on long press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditForm {
    pub memo: String,
    /// Dropdown selection text, normally one of "1".."9"
    pub quantity: String,
    pub checked: bool,
}

impl EditForm {
    pub fn from_product(product: &Product) -> Self {
        Self {
            memo: product.memo.clone().unwrap_or_default(),
            quantity: product.quantity.to_string(),
            checked: product.checked,
        }
    }

    pub fn select_quantity(&mut self, q: Quantity) {
        self.quantity = q.as_option().to_string();
    }

    /// Current selection as a quantity (invalid text reads as 1).
    pub fn quantity(&self) -> Quantity {
        Quantity::parse_or_default(&self.quantity)
    }

    fn apply(self, product: &mut Product) {
        product.memo = non_blank(self.memo);
        product.quantity = Quantity::parse_or_default(&self.quantity);
        product.checked = self.checked;
    }
}

// ── Card state machine ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CardState {
    #[default]
    Viewing,
    MemoShown { ticket: u64 },
    Editing(EditForm),
}

#[derive(Debug, Clone, Default)]
pub struct ProductCard {
    state: CardState,
}

impl ProductCard {
    #[cfg(test)]
    pub fn state(&self) -> &CardState {
        &self.state
    }

    pub fn is_memo_shown(&self) -> bool {
        matches!(self.state, CardState::MemoShown { .. })
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.state, CardState::Editing(_))
    }

    pub fn edit_form(&self) -> Option<&EditForm> {
        match &self.state {
            CardState::Editing(form) => Some(form),
            _ => None,
        }
    }

    pub fn edit_form_mut(&mut self) -> Option<&mut EditForm> {
        match &mut self.state {
            CardState::Editing(form) => Some(form),
            _ => None,
        }
    }

    /// Single tap: reveal the memo under `ticket`. Returns the ticket to schedule
    /// an expiry for, or None when nothing is shown (blank memo or editing).
    pub fn tap(&mut self, product: &Product, ticket: u64) -> Option<u64> {
        if self.is_editing() || !product.has_memo() {
            return None;
        }
        self.state = CardState::MemoShown { ticket };
        Some(ticket)
    }

    /// Hide the memo if `ticket` is still the one that revealed it.
    pub fn memo_expired(&mut self, ticket: u64) -> bool {
        match self.state {
            CardState::MemoShown { ticket: current } if current == ticket => {
                self.state = CardState::Viewing;
                true
            }
            _ => false,
        }
    }

    /// Double tap: flip the checked flag right away. Ignored while editing.
    pub fn double_tap(&mut self, product: &mut Product) -> bool {
        if self.is_editing() {
            return false;
        }
        product.toggle_checked();
        true
    }

    /// Long press: open the edit form pre-filled from the product.
    pub fn long_press(&mut self, product: &Product) -> bool {
        if self.is_editing() {
            return false;
        }
        self.state = CardState::Editing(EditForm::from_product(product));
        true
    }

    /// Commit the edit form onto the product and return to Viewing.
    pub fn save(&mut self, product: &mut Product) -> bool {
        match std::mem::take(&mut self.state) {
            CardState::Editing(form) => {
                form.apply(product);
                true
            }
            other => {
                self.state = other;
                false
            }
        }
    }

    /// Drop the edit form without touching the product.
    pub fn cancel(&mut self) -> bool {
        if self.is_editing() {
            self.state = CardState::Viewing;
            true
        } else {
            false
        }
    }
}
