/// Shopping plans. A plan is just a date-string id plus the groups shown for it.
///
/// Nothing is stored: `seed_groups` hands out a fresh copy of the sample data every
/// time a detail screen is entered, so edits never outlive the screen.
use crate::model::{Group, Product};

pub const DEFAULT_PLANS: [&str; 3] = ["2025-06-25", "2025-06-24", "2025-06-23"];

/// Plan id used when a detail route arrives without one.
pub const UNKNOWN_PLAN: &str = "unknown";

pub fn default_plans() -> Vec<String> {
    DEFAULT_PLANS.iter().map(|s| s.to_string()).collect()
}

/// Sample groups for a plan. Every plan currently gets the same list.
pub fn seed_groups(_plan_id: &str) -> Vec<Group> {
    vec![
        Group::new(
            "Aスーパー",
            vec![
                Product::new("牛乳").with_icon("🥛").with_quantity(2).with_memo("那須の牛乳"),
                Product::new("パン").with_icon("🍞"),
                Product::new("スイカ"),
            ],
        ),
        Group::new(
            "精肉店",
            vec![
                Product::new("豚肉").with_icon("🥩").with_quantity(3).with_memo("油少ない"),
                Product::new("鶏むね肉"),
            ],
        ),
    ]
}

/// Today's date as a plan id, e.g. "2026-03-02".
pub fn today_plan_id() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}

/// Add a plan for today to the top of the list unless it's already there.
/// Returns the index of today's plan.
pub fn add_today(plans: &mut Vec<String>) -> usize {
    insert_plan(plans, today_plan_id())
}

fn insert_plan(plans: &mut Vec<String>, id: String) -> usize {
    if let Some(idx) = plans.iter().position(|p| *p == id) {
        return idx;
    }
    plans.insert(0, id);
    0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_groups_shape() {
        let groups = seed_groups("2025-06-24");
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].name, "Aスーパー");
        assert_eq!(groups[0].products.len(), 3);
        assert_eq!(groups[1].name, "精肉店");
        assert_eq!(groups[1].products.len(), 2);

        let milk = &groups[0].products[0];
        assert_eq!(milk.name, "牛乳");
        assert_eq!(milk.icon.as_deref(), Some("🥛"));
        assert_eq!(milk.quantity.get(), 2);
        assert_eq!(milk.memo.as_deref(), Some("那須の牛乳"));
        assert!(!milk.checked);
        assert_eq!(groups[0].products[2].icon, None);
    }

    #[test]
    fn test_seed_groups_are_fresh_copies() {
        let mut first = seed_groups("2025-06-25");
        first[0].products[0].toggle_checked();
        first[0].products.clear();
        let second = seed_groups("2025-06-25");
        assert_eq!(second[0].products.len(), 3);
        assert!(!second[0].products[0].checked);
    }

    #[test]
    fn test_insert_plan_dedupes() {
        let mut plans = default_plans();
        assert_eq!(insert_plan(&mut plans, "2025-06-24".to_string()), 1);
        assert_eq!(plans.len(), 3);
        assert_eq!(insert_plan(&mut plans, "2025-07-01".to_string()), 0);
        assert_eq!(plans[0], "2025-07-01");
        assert_eq!(plans.len(), 4);
    }

    #[test]
    fn test_today_plan_id_format() {
        let id = today_plan_id();
        assert!(chrono::NaiveDate::parse_from_str(&id, "%Y-%m-%d").is_ok(), "{id}");
    }
}
