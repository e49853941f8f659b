/// Plan detail screen state: the groups of one plan, their card states, and
/// the cursor.
///
/// Built fresh from `plans::seed_groups` every time the screen is entered and
/// dropped when the user navigates back; nothing here outlives the screen.
use crate::card::ProductCard;
use crate::gesture::Gesture;
use crate::model::{Group, Product};
use crate::plans;

/// Position of a product: group index + index within the group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CardKey {
    pub group: usize,
    pub product: usize,
}

impl CardKey {
    pub fn new(group: usize, product: usize) -> Self {
        Self { group, product }
    }
}

/// What the cursor (or a mouse gesture) is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Header(usize),
    Product(CardKey),
}

/// Side effects the event loop has to carry out after a gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Memo revealed, schedule a hide for this ticket
    ScheduleMemoHide { key: CardKey, ticket: u64 },
    Toggled { key: CardKey, checked: bool },
    EditStarted(CardKey),
    GroupToggled { group: usize, expanded: bool },
}

#[derive(Debug, Clone)]
pub struct GroupView {
    pub group: Group,
    pub expanded: bool,
    /// One card per product, same order as `group.products`
    pub cards: Vec<ProductCard>,
}

impl GroupView {
    pub fn new(group: Group) -> Self {
        let cards = vec![ProductCard::default(); group.products.len()];
        Self { group, expanded: true, cards }
    }
}

pub struct PlanDetail {
    pub plan_id: String,
    pub groups: Vec<GroupView>,
    pub focus: Focus,
    columns: usize,
}

impl PlanDetail {
    pub fn open(plan_id: &str, columns: usize) -> Self {
        let groups = plans::seed_groups(plan_id);
        tracing::info!(plan_id, groups = groups.len(), "plan detail opened");
        Self::from_groups(plan_id, groups, columns)
    }

    pub fn from_groups(plan_id: &str, groups: Vec<Group>, columns: usize) -> Self {
        let focus = if groups.first().is_some_and(|g| !g.products.is_empty()) {
            Focus::Product(CardKey::new(0, 0))
        } else {
            Focus::Header(0)
        };
        Self {
            plan_id: plan_id.to_string(),
            groups: groups.into_iter().map(GroupView::new).collect(),
            focus,
            columns: columns.max(1),
        }
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn product(&self, key: CardKey) -> Option<&Product> {
        self.groups.get(key.group)?.group.products.get(key.product)
    }

    pub fn card(&self, key: CardKey) -> Option<&ProductCard> {
        self.groups.get(key.group)?.cards.get(key.product)
    }

    pub fn card_mut(&mut self, key: CardKey) -> Option<&mut ProductCard> {
        self.groups.get_mut(key.group)?.cards.get_mut(key.product)
    }

    fn parts_mut(&mut self, key: CardKey) -> Option<(&mut ProductCard, &mut Product)> {
        let gv = self.groups.get_mut(key.group)?;
        let card = gv.cards.get_mut(key.product)?;
        let product = gv.group.products.get_mut(key.product)?;
        Some((card, product))
    }

    /// The card whose edit form is open, if any.
    #[cfg(test)]
    pub fn editing(&self) -> Option<CardKey> {
        self.groups.iter().enumerate().find_map(|(gi, gv)| {
            gv.cards
                .iter()
                .position(|c| c.is_editing())
                .map(|pi| CardKey::new(gi, pi))
        })
    }

    pub fn focused_group(&self) -> usize {
        match self.focus {
            Focus::Header(g) => g,
            Focus::Product(k) => k.group,
        }
    }

    // ── Gestures ──────────────────────────────────────────────────────────────

    pub fn apply_gesture(&mut self, gesture: Gesture<Focus>, ticket: u64) -> Option<Effect> {
        match gesture {
            Gesture::Tap(Focus::Header(g)) | Gesture::DoubleTap(Focus::Header(g)) => {
                self.toggle_group(g)
            }
            Gesture::LongPress(Focus::Header(_)) => None,
            Gesture::Tap(Focus::Product(key)) => self
                .tap(key, ticket)
                .map(|ticket| Effect::ScheduleMemoHide { key, ticket }),
            Gesture::DoubleTap(Focus::Product(key)) => self.double_tap(key),
            Gesture::LongPress(Focus::Product(key)) => {
                self.long_press(key).then_some(Effect::EditStarted(key))
            }
        }
    }

    pub fn tap(&mut self, key: CardKey, ticket: u64) -> Option<u64> {
        let (card, product) = self.parts_mut(key)?;
        card.tap(product, ticket)
    }

    pub fn double_tap(&mut self, key: CardKey) -> Option<Effect> {
        let (card, product) = self.parts_mut(key)?;
        if !card.double_tap(product) {
            return None;
        }
        tracing::debug!(group = key.group, product = %product.name, checked = product.checked, "toggled");
        Some(Effect::Toggled { key, checked: product.checked })
    }

    pub fn long_press(&mut self, key: CardKey) -> bool {
        match self.parts_mut(key) {
            Some((card, product)) => card.long_press(product),
            None => false,
        }
    }

    pub fn save_edit(&mut self, key: CardKey) -> bool {
        let Some((card, product)) = self.parts_mut(key) else {
            return false;
        };
        let saved = card.save(product);
        if saved {
            tracing::info!(
                product = %product.name,
                quantity = product.quantity.get(),
                checked = product.checked,
                "product edited"
            );
        }
        saved
    }

    pub fn cancel_edit(&mut self, key: CardKey) -> bool {
        self.card_mut(key).is_some_and(|c| c.cancel())
    }

    pub fn memo_expired(&mut self, key: CardKey, ticket: u64) -> bool {
        self.card_mut(key).is_some_and(|c| c.memo_expired(ticket))
    }

    pub fn toggle_group(&mut self, group: usize) -> Option<Effect> {
        let gv = self.groups.get_mut(group)?;
        gv.expanded = !gv.expanded;
        let expanded = gv.expanded;
        if !expanded {
            if let Focus::Product(k) = self.focus {
                if k.group == group {
                    self.focus = Focus::Header(group);
                }
            }
        }
        Some(Effect::GroupToggled { group, expanded })
    }

    /// Append a product to a group. Returns its key.
    pub fn add_product(&mut self, group: usize, product: Product) -> Option<CardKey> {
        let gv = self.groups.get_mut(group)?;
        tracing::info!(group = %gv.group.name, product = %product.name, "product added");
        gv.group.products.push(product);
        gv.cards.push(ProductCard::default());
        Some(CardKey::new(group, gv.group.products.len() - 1))
    }

    // ── Cursor ────────────────────────────────────────────────────────────────

    /// Headers and products of expanded groups, in display order.
    pub fn visible_items(&self) -> Vec<Focus> {
        let mut out = Vec::new();
        for (gi, gv) in self.groups.iter().enumerate() {
            out.push(Focus::Header(gi));
            if gv.expanded {
                out.extend((0..gv.group.products.len()).map(|pi| Focus::Product(CardKey::new(gi, pi))));
            }
        }
        out
    }

    fn focus_index(&self, items: &[Focus]) -> usize {
        items.iter().position(|f| *f == self.focus).unwrap_or(0)
    }

    pub fn move_next(&mut self) {
        let items = self.visible_items();
        let i = self.focus_index(&items);
        if let Some(f) = items.get(i + 1) {
            self.focus = *f;
        }
    }

    pub fn move_prev(&mut self) {
        let items = self.visible_items();
        let i = self.focus_index(&items);
        if i > 0 {
            self.focus = items[i - 1];
        }
    }

    /// One grid row down; past the last row goes to the next group's header.
    pub fn move_down(&mut self) {
        let cols = self.columns;
        match self.focus {
            Focus::Header(g) => {
                let Some(gv) = self.groups.get(g) else { return };
                if gv.expanded && !gv.group.products.is_empty() {
                    self.focus = Focus::Product(CardKey::new(g, 0));
                } else if g + 1 < self.groups.len() {
                    self.focus = Focus::Header(g + 1);
                }
            }
            Focus::Product(k) => {
                let len = self.groups[k.group].group.products.len();
                let last_row = (len.saturating_sub(1)) / cols;
                if k.product / cols < last_row {
                    let target = (k.product + cols).min(len - 1);
                    self.focus = Focus::Product(CardKey::new(k.group, target));
                } else if k.group + 1 < self.groups.len() {
                    self.focus = Focus::Header(k.group + 1);
                }
            }
        }
    }

    /// One grid row up; the first row goes to the group's header.
    pub fn move_up(&mut self) {
        let cols = self.columns;
        match self.focus {
            Focus::Header(0) => {}
            Focus::Header(g) => {
                let prev = &self.groups[g - 1];
                let len = prev.group.products.len();
                if prev.expanded && len > 0 {
                    self.focus = Focus::Product(CardKey::new(g - 1, len - 1));
                } else {
                    self.focus = Focus::Header(g - 1);
                }
            }
            Focus::Product(k) => {
                if k.product >= cols {
                    self.focus = Focus::Product(CardKey::new(k.group, k.product - cols));
                } else {
                    self.focus = Focus::Header(k.group);
                }
            }
        }
    }

    pub fn progress(&self) -> (usize, usize) {
        self.groups.iter().fold((0, 0), |(done, total), gv| {
            (done + gv.group.checked_count(), total + gv.group.products.len())
        })
    }
}
