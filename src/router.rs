use std::fmt;

/// Navigable surfaces of the admin app.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Overview,
    Products,
    Orders,
    Customers,
    Categories,
}

impl Route {
    pub const ADMIN: [Route; 5] = [
        Route::Overview,
        Route::Products,
        Route::Orders,
        Route::Customers,
        Route::Categories,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => "/",
            Route::Overview => "/admin",
            Route::Products => "/admin/product",
            Route::Orders => "/admin/orders",
            Route::Customers => "/admin/customers",
            Route::Categories => "/admin/categories",
        }
    }

    /// Trailing slashes are ignored. Unknown paths resolve to `None`.
    pub fn from_path(path: &str) -> Option<Route> {
        let trimmed = path.trim();
        let normalized = match trimmed.trim_end_matches('/') {
            "" if trimmed.starts_with('/') => "/",
            other => other,
        };
        [Route::Login]
            .into_iter()
            .chain(Route::ADMIN)
            .find(|route| route.path() == normalized)
    }

    pub fn is_protected(&self) -> bool {
        !matches!(self, Route::Login)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Where a navigation to `route` actually lands given the session state.
pub fn guard(route: Route, logged_in: bool) -> Route {
    if route.is_protected() && !logged_in {
        Route::Login
    } else {
        route
    }
}
