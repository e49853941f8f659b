/// In-process navigation: two string routes and a back stack.
///
///   plan_list                  → list of plans (start destination)
///   plan_detail/{planId}       → one plan's groups
use std::fmt;

use crate::plans::UNKNOWN_PLAN;

pub const PLAN_LIST: &str = "plan_list";
pub const PLAN_DETAIL_PREFIX: &str = "plan_detail";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    PlanList,
    PlanDetail { plan_id: String },
}

impl Route {
    pub fn detail(plan_id: impl Into<String>) -> Self {
        Route::PlanDetail { plan_id: plan_id.into() }
    }

    /// Parse a route string. Unknown routes return None; a detail route with an
    /// empty id resolves to the "unknown" plan.
    pub fn parse(path: &str) -> Option<Self> {
        if path == PLAN_LIST {
            return Some(Route::PlanList);
        }
        let rest = path.strip_prefix(PLAN_DETAIL_PREFIX)?;
        if rest.is_empty() {
            return Some(Route::detail(UNKNOWN_PLAN));
        }
        let id = rest.strip_prefix('/')?;
        if id.is_empty() {
            Some(Route::detail(UNKNOWN_PLAN))
        } else {
            Some(Route::detail(id))
        }
    }

    pub fn plan_id(&self) -> Option<&str> {
        match self {
            Route::PlanList => None,
            Route::PlanDetail { plan_id } => Some(plan_id),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::PlanList => f.write_str(PLAN_LIST),
            Route::PlanDetail { plan_id } => write!(f, "{PLAN_DETAIL_PREFIX}/{plan_id}"),
        }
    }
}

// ── Navigator ─────────────────────────────────────────────────────────────────

/// Back stack rooted at the plan list. The root is never popped.
#[derive(Debug, Clone)]
pub struct Navigator {
    stack: Vec<Route>,
}

impl Default for Navigator {
    fn default() -> Self {
        Self { stack: vec![Route::PlanList] }
    }
}

impl Navigator {
    /// Start on the list, optionally deep-linked into a plan.
    pub fn with_start(plan_id: Option<&str>) -> Self {
        let mut nav = Self::default();
        if let Some(id) = plan_id {
            nav.open_plan(id);
        }
        nav
    }

    pub fn current(&self) -> &Route {
        // stack always holds the root
        &self.stack[self.stack.len() - 1]
    }

    pub fn navigate(&mut self, route: Route) {
        if route == Route::PlanList {
            self.stack.truncate(1);
            return;
        }
        if self.current() != &route {
            tracing::debug!(route = %route, "navigate");
            self.stack.push(route);
        }
    }

    /// Navigate to a plan's detail route as the list does when an item is picked.
    pub fn open_plan(&mut self, plan_id: &str) {
        let path = format!("{PLAN_DETAIL_PREFIX}/{plan_id}");
        let route = Route::parse(&path).unwrap_or_else(|| Route::detail(UNKNOWN_PLAN));
        self.navigate(route);
    }

    /// Pop one level. Returns false when already at the root.
    pub fn back(&mut self) -> bool {
        if self.stack.len() <= 1 {
            return false;
        }
        self.stack.pop();
        tracing::debug!(route = %self.current(), "back");
        true
    }

    #[cfg(test)]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_routes() {
        assert_eq!(Route::parse("plan_list"), Some(Route::PlanList));
        assert_eq!(
            Route::parse("plan_detail/2025-06-24"),
            Some(Route::detail("2025-06-24"))
        );
        assert_eq!(Route::parse("plan_detail"), Some(Route::detail("unknown")));
        assert_eq!(Route::parse("plan_detail/"), Some(Route::detail("unknown")));
        assert_eq!(Route::parse("product_add"), None);
        assert_eq!(Route::parse("plan_details/x"), None);
    }

    #[test]
    fn test_plan_id_kept_verbatim() {
        assert_eq!(Route::parse("plan_detail/x/"), Some(Route::detail("x/")));
        assert_eq!(Route::parse("plan_detail/ 2025-06-24 "), Some(Route::detail(" 2025-06-24 ")));

        let mut nav = Navigator::default();
        nav.open_plan("x/");
        assert_eq!(nav.current().plan_id(), Some("x/"));
    }

    #[test]
    fn test_display_matches_parse() {
        let r = Route::detail("2025-06-23");
        assert_eq!(r.to_string(), "plan_detail/2025-06-23");
        assert_eq!(Route::parse(&r.to_string()), Some(r));
        assert_eq!(Route::PlanList.to_string(), "plan_list");
    }

    #[test]
    fn test_open_plan_from_list_carries_plan_id() {
        let mut nav = Navigator::default();
        assert_eq!(nav.current(), &Route::PlanList);
        nav.open_plan("2025-06-24");
        assert_eq!(nav.current().plan_id(), Some("2025-06-24"));
        assert_eq!(nav.depth(), 2);
    }

    #[test]
    fn test_back_never_pops_root() {
        let mut nav = Navigator::with_start(Some("2025-06-25"));
        assert!(nav.back());
        assert_eq!(nav.current(), &Route::PlanList);
        assert!(!nav.back());
        assert_eq!(nav.depth(), 1);
    }

    #[test]
    fn test_navigate_same_route_does_not_stack() {
        let mut nav = Navigator::default();
        nav.open_plan("2025-06-24");
        nav.open_plan("2025-06-24");
        assert_eq!(nav.depth(), 2);
        nav.navigate(Route::PlanList);
        assert_eq!(nav.depth(), 1);
    }
}
