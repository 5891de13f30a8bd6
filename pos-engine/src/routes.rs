//! Screen routes
//!
//! Maps URL paths to the POS screens. Unknown paths resolve to
//! [`Route::NotFound`].

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Route {
    Dashboard,
    Dishes,
    Inventory,
    Staff,
    Counter,
    KitchenDisplay,
    CashRegister,
    Settings,
    SalesReport,
    Reports,
    NotFound,
}

impl Route {
    /// Every navigable route (excludes `NotFound`)
    pub const ALL: [Route; 10] = [
        Route::Dashboard,
        Route::Dishes,
        Route::Inventory,
        Route::Staff,
        Route::Counter,
        Route::KitchenDisplay,
        Route::CashRegister,
        Route::Settings,
        Route::SalesReport,
        Route::Reports,
    ];

    /// Resolve a path; query string and trailing slashes are ignored
    pub fn from_path(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let trimmed = path.trim_end_matches('/');
        match trimmed {
            "" => Route::Dashboard,
            "/dishes" => Route::Dishes,
            "/inventory" => Route::Inventory,
            "/staff" => Route::Staff,
            "/counter" => Route::Counter,
            "/kitchen-display" => Route::KitchenDisplay,
            "/cash-register" => Route::CashRegister,
            "/settings" => Route::Settings,
            "/sales-report" => Route::SalesReport,
            "/reports" => Route::Reports,
            _ => Route::NotFound,
        }
    }

    /// Canonical path; `NotFound` has none
    pub fn path(&self) -> Option<&'static str> {
        let path = match self {
            Route::Dashboard => "/",
            Route::Dishes => "/dishes",
            Route::Inventory => "/inventory",
            Route::Staff => "/staff",
            Route::Counter => "/counter",
            Route::KitchenDisplay => "/kitchen-display",
            Route::CashRegister => "/cash-register",
            Route::Settings => "/settings",
            Route::SalesReport => "/sales-report",
            Route::Reports => "/reports",
            Route::NotFound => return None,
        };
        Some(path)
    }

    pub fn title(&self) -> &'static str {
        match self {
            Route::Dashboard => "Dashboard",
            Route::Dishes => "Dishes",
            Route::Inventory => "Inventory",
            Route::Staff => "Staff",
            Route::Counter => "Counter",
            Route::KitchenDisplay => "Kitchen Display",
            Route::CashRegister => "Cash Register",
            Route::Settings => "Settings",
            Route::SalesReport => "Sales Report",
            Route::Reports => "Reports",
            Route::NotFound => "Page Not Found",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_route_round_trips() {
        for route in Route::ALL {
            let path = route.path().unwrap();
            assert_eq!(Route::from_path(path), route, "path {path}");
        }
    }

    #[test]
    fn test_trailing_slash_and_query_ignored() {
        assert_eq!(Route::from_path("/dishes/"), Route::Dishes);
        assert_eq!(Route::from_path("/kitchen-display?station=grill"), Route::KitchenDisplay);
        assert_eq!(Route::from_path("/reports/?from=1#top"), Route::Reports);
        assert_eq!(Route::from_path(""), Route::Dashboard);
        assert_eq!(Route::from_path("/?tab=today"), Route::Dashboard);
    }

    #[test]
    fn test_unknown_paths_are_not_found() {
        assert_eq!(Route::from_path("/nope"), Route::NotFound);
        assert_eq!(Route::from_path("/dishes/42"), Route::NotFound);
        assert_eq!(Route::from_path("/Dishes"), Route::NotFound);
        assert_eq!(Route::NotFound.path(), None);
    }
}
