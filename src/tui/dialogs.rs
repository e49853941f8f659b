/// Modal dialog state for product edit and product add, plus their key handling.
/// Drawing lives in overlays.rs.
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tui_textarea::TextArea;

use super::input::LineInput;
use crate::card::EditForm;
use crate::detail::CardKey;
use crate::form::{AddField, ProductAddForm};
use crate::model::{QUANTITY_OPTIONS, Quantity};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogAction {
    None,
    Save,
    Cancel,
}

/// Ctrl+S saves, Esc cancels; shared by both dialogs.
fn common_action(key: &KeyEvent) -> Option<DialogAction> {
    match key.code {
        KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => Some(DialogAction::Save),
        KeyCode::Esc => Some(DialogAction::Cancel),
        _ => None,
    }
}

fn memo_area(text: &str) -> TextArea<'static> {
    let lines: Vec<String> = if text.is_empty() {
        vec![String::new()]
    } else {
        text.lines().map(str::to_string).collect()
    };
    let mut area = TextArea::new(lines);
    area.set_placeholder_text("memo");
    area
}

fn memo_text(area: &TextArea<'_>) -> String {
    area.lines().join("\n")
}

// ── Quantity dropdown ─────────────────────────────────────────────────────────

/// The 1..9 picker. Closed it shows the value; open it lists every option.
#[derive(Debug, Clone, Default)]
pub struct QuantityDropdown {
    pub open: bool,
    pub highlighted: usize,
}

impl QuantityDropdown {
    /// Handle a key while the quantity field has focus. Returns a new selection.
    pub fn handle_key(&mut self, key: &KeyEvent, current: Quantity) -> Option<Quantity> {
        if let KeyCode::Char(c @ '1'..='9') = key.code {
            self.open = false;
            return Some(Quantity::parse_or_default(&c.to_string()));
        }
        if !self.open {
            match key.code {
                KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Down => {
                    self.open = true;
                    self.highlighted = current.option_index();
                }
                KeyCode::Left => {
                    return Some(Quantity::clamped(current.get() as i64 - 1));
                }
                KeyCode::Right => {
                    return Some(Quantity::clamped(current.get() as i64 + 1));
                }
                _ => {}
            }
            return None;
        }
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.highlighted = self.highlighted.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.highlighted = (self.highlighted + 1).min(QUANTITY_OPTIONS.len() - 1);
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                self.open = false;
                return Some(Quantity::from_option_index(self.highlighted));
            }
            _ => {}
        }
        None
    }

    pub fn close(&mut self) -> bool {
        std::mem::replace(&mut self.open, false)
    }
}

// ── Edit dialog ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditField {
    Checked,
    Memo,
    Quantity,
}

impl EditField {
    fn next(self) -> Self {
        match self {
            EditField::Checked => EditField::Memo,
            EditField::Memo => EditField::Quantity,
            EditField::Quantity => EditField::Checked,
        }
    }

    fn prev(self) -> Self {
        match self {
            EditField::Checked => EditField::Quantity,
            EditField::Memo => EditField::Checked,
            EditField::Quantity => EditField::Memo,
        }
    }
}

/// Long-press dialog. The form itself lives on the card; this holds widget state.
pub struct EditDialog {
    pub key: CardKey,
    pub field: EditField,
    pub memo: TextArea<'static>,
    pub dropdown: QuantityDropdown,
}

impl EditDialog {
    pub fn new(key: CardKey, form: &EditForm) -> Self {
        Self {
            key,
            field: EditField::Checked,
            memo: memo_area(&form.memo),
            dropdown: QuantityDropdown::default(),
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent, form: &mut EditForm) -> DialogAction {
        if self.dropdown.open && key.code == KeyCode::Esc {
            self.dropdown.close();
            return DialogAction::None;
        }
        if let Some(action) = common_action(&key) {
            return action;
        }
        match key.code {
            KeyCode::Tab => {
                self.dropdown.close();
                self.field = self.field.next();
                return DialogAction::None;
            }
            KeyCode::BackTab => {
                self.dropdown.close();
                self.field = self.field.prev();
                return DialogAction::None;
            }
            _ => {}
        }
        match self.field {
            EditField::Checked => {
                if matches!(key.code, KeyCode::Char(' ') | KeyCode::Enter) {
                    form.checked = !form.checked;
                }
            }
            EditField::Memo => {
                self.memo.input(key);
                form.memo = memo_text(&self.memo);
            }
            EditField::Quantity => {
                if let Some(q) = self.dropdown.handle_key(&key, form.quantity()) {
                    form.select_quantity(q);
                }
            }
        }
        DialogAction::None
    }
}

// ── Add dialog ────────────────────────────────────────────────────────────────

pub struct AddDialog {
    /// Group the new product is appended to
    pub group: usize,
    pub field: AddField,
    pub name: LineInput,
    pub icon: LineInput,
    pub base_price: LineInput,
    pub memo: TextArea<'static>,
    pub quantity: Quantity,
    pub dropdown: QuantityDropdown,
    pub error: Option<String>,
}

impl AddDialog {
    pub fn new(group: usize) -> Self {
        Self {
            group,
            field: AddField::Name,
            name: LineInput::default(),
            icon: LineInput::default(),
            base_price: LineInput::default(),
            memo: memo_area(""),
            quantity: Quantity::default(),
            dropdown: QuantityDropdown::default(),
            error: None,
        }
    }

    /// Snapshot the widgets into a form.
    pub fn form(&self) -> ProductAddForm {
        let mut form = ProductAddForm {
            name: self.name.text().to_string(),
            icon: self.icon.text().to_string(),
            memo: memo_text(&self.memo),
            base_price: self.base_price.text().to_string(),
            ..Default::default()
        };
        form.select_quantity(self.quantity);
        form
    }

    fn line_mut(&mut self) -> Option<&mut LineInput> {
        match self.field {
            AddField::Name => Some(&mut self.name),
            AddField::Icon => Some(&mut self.icon),
            AddField::BasePrice => Some(&mut self.base_price),
            AddField::Memo | AddField::Quantity => None,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> DialogAction {
        if self.dropdown.open && key.code == KeyCode::Esc {
            self.dropdown.close();
            return DialogAction::None;
        }
        if let Some(action) = common_action(&key) {
            return action;
        }
        match key.code {
            KeyCode::Tab => {
                self.dropdown.close();
                self.field = self.field.next();
                return DialogAction::None;
            }
            KeyCode::BackTab => {
                self.dropdown.close();
                self.field = self.field.prev();
                return DialogAction::None;
            }
            _ => {}
        }
        match self.field {
            AddField::Memo => {
                self.memo.input(key);
            }
            AddField::Quantity => {
                if let Some(q) = self.dropdown.handle_key(&key, self.quantity) {
                    self.quantity = q;
                }
            }
            _ => {
                if key.code == KeyCode::Enter {
                    self.field = self.field.next();
                } else if let Some(line) = self.line_mut() {
                    line.handle_key(key);
                }
            }
        }
        self.error = None;
        DialogAction::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Product;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(dialog: &mut AddDialog, text: &str) {
        for c in text.chars() {
            dialog.handle_key(press(KeyCode::Char(c)));
        }
    }

    #[test]
    fn test_dropdown_select_via_list() {
        let mut dd = QuantityDropdown::default();
        let q = Quantity::parse_or_default("2");
        assert_eq!(dd.handle_key(&press(KeyCode::Enter), q), None);
        assert!(dd.open);
        assert_eq!(dd.highlighted, 1);
        dd.handle_key(&press(KeyCode::Down), q);
        dd.handle_key(&press(KeyCode::Down), q);
        let picked = dd.handle_key(&press(KeyCode::Enter), q).unwrap();
        assert_eq!(picked.get(), 4);
        assert!(!dd.open);
    }

    #[test]
    fn test_dropdown_stays_in_range() {
        let mut dd = QuantityDropdown::default();
        let nine = Quantity::parse_or_default("9");
        assert_eq!(dd.handle_key(&press(KeyCode::Right), nine), Some(nine));
        let one = Quantity::default();
        assert_eq!(dd.handle_key(&press(KeyCode::Left), one), Some(one));
        dd.handle_key(&press(KeyCode::Enter), nine);
        for _ in 0..20 {
            dd.handle_key(&press(KeyCode::Down), nine);
        }
        assert_eq!(dd.handle_key(&press(KeyCode::Enter), nine), Some(nine));
    }

    #[test]
    fn test_edit_dialog_quantity_digit_and_save() {
        let product = Product::new("牛乳").with_quantity(2).with_memo("那須の牛乳");
        let mut form = EditForm::from_product(&product);
        let mut dialog = EditDialog::new(CardKey::new(0, 0), &form);
        dialog.handle_key(press(KeyCode::Tab), &mut form);
        dialog.handle_key(press(KeyCode::Tab), &mut form);
        assert_eq!(dialog.field, EditField::Quantity);
        dialog.handle_key(press(KeyCode::Char('5')), &mut form);
        assert_eq!(form.quantity, "5");
        assert_eq!(form.memo, "那須の牛乳");
        let save = KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL);
        assert_eq!(dialog.handle_key(save, &mut form), DialogAction::Save);
    }

    #[test]
    fn test_edit_dialog_checkbox_and_escape() {
        let product = Product::new("パン");
        let mut form = EditForm::from_product(&product);
        let mut dialog = EditDialog::new(CardKey::new(0, 1), &form);
        dialog.handle_key(press(KeyCode::Char(' ')), &mut form);
        assert!(form.checked);
        // Esc closes an open dropdown before it cancels the dialog
        dialog.field = EditField::Quantity;
        dialog.handle_key(press(KeyCode::Enter), &mut form);
        assert!(dialog.dropdown.open);
        assert_eq!(dialog.handle_key(press(KeyCode::Esc), &mut form), DialogAction::None);
        assert_eq!(dialog.handle_key(press(KeyCode::Esc), &mut form), DialogAction::Cancel);
    }

    #[test]
    fn test_edit_dialog_memo_typing_updates_form() {
        let product = Product::new("パン");
        let mut form = EditForm::from_product(&product);
        let mut dialog = EditDialog::new(CardKey::new(0, 1), &form);
        dialog.handle_key(press(KeyCode::Tab), &mut form);
        for c in "6枚".chars() {
            dialog.handle_key(press(KeyCode::Char(c)), &mut form);
        }
        assert_eq!(form.memo, "6枚");
    }

    #[test]
    fn test_add_dialog_collects_fields() {
        let mut dialog = AddDialog::new(1);
        type_text(&mut dialog, "ベーコン");
        dialog.handle_key(press(KeyCode::Enter));
        assert_eq!(dialog.field, AddField::Icon);
        type_text(&mut dialog, "🥓");
        dialog.handle_key(press(KeyCode::Tab));
        type_text(&mut dialog, "厚切り");
        dialog.handle_key(press(KeyCode::Tab));
        dialog.handle_key(press(KeyCode::Char('3')));
        dialog.handle_key(press(KeyCode::Tab));
        type_text(&mut dialog, "398");

        let form = dialog.form();
        assert_eq!(form.base_price, "398");
        let product = form.build().unwrap();
        assert_eq!(product.name, "ベーコン");
        assert_eq!(product.icon.as_deref(), Some("🥓"));
        assert_eq!(product.memo.as_deref(), Some("厚切り"));
        assert_eq!(product.quantity.get(), 3);
    }
}
