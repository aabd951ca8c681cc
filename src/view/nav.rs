use std::fmt;

use crate::models::EntityId;

/// Addressable pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Shop,
    Authors,
    Books,
    Stores,
    StoreInventory(EntityId),
}

/// Side menu entries, in display order. Store inventory is reached from the
/// stores page rather than the menu.
pub const MENU: [(&str, Route); 4] = [
    ("Shop", Route::Shop),
    ("Authors", Route::Authors),
    ("Books", Route::Books),
    ("Stores", Route::Stores),
];

impl Route {
    pub fn path(self) -> String {
        match self {
            Route::Shop => "/".to_string(),
            Route::Authors => "/authors".to_string(),
            Route::Books => "/books".to_string(),
            Route::Stores => "/stores".to_string(),
            Route::StoreInventory(id) => format!("/store/{id}"),
        }
    }

    /// Resolve a path such as `/store/4`. Trailing slashes are ignored.
    pub fn parse(path: &str) -> Option<Self> {
        let trimmed = path.trim();
        let trimmed = trimmed.trim_end_matches('/');
        match trimmed {
            "" => Some(Route::Shop),
            "/authors" => Some(Route::Authors),
            "/books" => Some(Route::Books),
            "/stores" => Some(Route::Stores),
            other => other
                .strip_prefix("/store/")
                .and_then(|id| id.parse::<i64>().ok())
                .map(|id| Route::StoreInventory(EntityId(id))),
        }
    }

    /// Menu entry to highlight while this route is shown.
    pub fn menu_index(self) -> Option<usize> {
        let owner = match self {
            Route::StoreInventory(_) => Route::Stores,
            other => other,
        };
        MENU.iter().position(|(_, route)| *route == owner)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_round_trip_through_parse() {
        for route in [
            Route::Shop,
            Route::Authors,
            Route::Books,
            Route::Stores,
            Route::StoreInventory(EntityId(12)),
        ] {
            assert_eq!(Route::parse(&route.path()), Some(route));
        }
    }

    #[test]
    fn rejects_unknown_paths() {
        assert_eq!(Route::parse("/publishers"), None);
        assert_eq!(Route::parse("/store/abc"), None);
        assert_eq!(Route::parse("/books/"), Some(Route::Books));
    }

    #[test]
    fn store_inventory_highlights_stores_entry() {
        assert_eq!(Route::StoreInventory(EntityId(1)).menu_index(), Some(3));
        assert_eq!(Route::Shop.menu_index(), Some(0));
    }
}
