// src/warehouse_access.rs
use serde::{Deserialize, Serialize};

// Site codes whose allowed entry does not share text with the warehouse name.
// (allowed fragment, target fragment)
const WAREHOUSE_ALIASES: [(&str, &str); 4] = [
    ("SP-IP", "ITAPEVI"),
    ("PAVUNA", "PAVUNA"),
    ("MERITI", "MERITI"),
    ("4 ELOS", "ELOS"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Manager,
    Viewer,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub role: Role,
    #[serde(default)]
    pub allowed_warehouses: Option<Vec<String>>,
}

/// What a caller may see, resolved once from the user profile.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Unrestricted,
    Restricted(Vec<String>),
}

impl UserProfile {
    /// Managers are limited to their warehouse list; a missing list sees nothing.
    pub fn visibility(&self) -> Visibility {
        match self.role {
            Role::Admin | Role::Viewer => Visibility::Unrestricted,
            Role::Manager => {
                Visibility::Restricted(self.allowed_warehouses.clone().unwrap_or_default())
            }
        }
    }
}

impl Visibility {
    pub fn for_user(user: Option<&UserProfile>) -> Self {
        user.map(UserProfile::visibility).unwrap_or_default()
    }

    pub fn allows(&self, warehouse: &str) -> bool {
        match self {
            Visibility::Unrestricted => true,
            Visibility::Restricted(allowed) => has_warehouse_permission(allowed, warehouse),
        }
    }

    /// Keeps the items whose warehouse is visible, preserving order.
    pub fn filter<'a, T, F>(&self, items: &'a [T], warehouse_of: F) -> Vec<&'a T>
    where
        F: Fn(&T) -> &str,
    {
        items
            .iter()
            .filter(|item| self.allows(warehouse_of(item)))
            .collect()
    }
}

/// Fuzzy warehouse match: equality, containment either way, or a known alias.
/// An empty allowed list, a blank entry or a blank target matches nothing.
pub fn has_warehouse_permission<S: AsRef<str>>(allowed: &[S], target: &str) -> bool {
    let target = target.trim().to_uppercase();
    if target.is_empty() {
        return false;
    }

    allowed.iter().any(|entry| {
        let entry = entry.as_ref().trim().to_uppercase();
        if entry.is_empty() {
            return false;
        }
        if entry == target || entry.contains(&target) || target.contains(&entry) {
            return true;
        }
        WAREHOUSE_ALIASES
            .iter()
            .any(|(from, to)| entry.contains(from) && target.contains(to))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager(allowed: Option<Vec<&str>>) -> UserProfile {
        UserProfile {
            role: Role::Manager,
            allowed_warehouses: allowed.map(|list| list.into_iter().map(String::from).collect()),
        }
    }

    #[test]
    fn test_exact_and_case_insensitive_match() {
        assert!(has_warehouse_permission(&["Galpao 1"], "GALPAO 1"));
        assert!(!has_warehouse_permission(&["GALPAO 1"], "GALPAO 2"));
    }

    #[test]
    fn test_substring_either_direction() {
        assert!(has_warehouse_permission(&["CAJAMAR"], "CD CAJAMAR 02"));
        assert!(has_warehouse_permission(&["CD CAJAMAR 02"], "CAJAMAR"));
    }

    #[test]
    fn test_aliases() {
        assert!(has_warehouse_permission(&["4 ELOS"], "4 ELOS DISTRIBUIÇÃO"));
        assert!(has_warehouse_permission(&["4 ELOS"], "ELOS SP"));
        assert!(has_warehouse_permission(&["SP-IP"], "CD ITAPEVI"));
        assert!(has_warehouse_permission(&["RJ-PAVUNA"], "PAVUNA 2"));
        assert!(has_warehouse_permission(&["RJ MERITI"], "SAO JOAO DE MERITI"));
        assert!(!has_warehouse_permission(&["SP-IP"], "CD CAJAMAR"));
    }

    #[test]
    fn test_empty_list_matches_nothing() {
        let empty: [&str; 0] = [];
        assert!(!has_warehouse_permission(&empty, "ANY"));
    }

    #[test]
    fn test_blank_entries_and_targets_match_nothing() {
        assert!(!has_warehouse_permission(&[""], "CAJAMAR"));
        assert!(!has_warehouse_permission(&["  "], "CAJAMAR"));
        assert!(!has_warehouse_permission(&["CAJAMAR"], ""));
        assert!(!manager(Some(vec![""])).visibility().allows("CAJAMAR"));
        assert!(manager(Some(vec!["", "CAJAMAR"])).visibility().allows("CAJAMAR"));
    }

    #[test]
    fn test_manager_without_list_fails_closed() {
        assert!(!manager(None).visibility().allows("GALPAO 1"));
        assert!(!manager(Some(vec![])).visibility().allows("GALPAO 1"));
    }

    #[test]
    fn test_admin_and_viewer_are_unrestricted() {
        for role in [Role::Admin, Role::Viewer] {
            let user = UserProfile {
                role,
                allowed_warehouses: Some(vec!["X".to_string()]),
            };
            assert_eq!(user.visibility(), Visibility::Unrestricted);
        }
        assert_eq!(Visibility::for_user(None), Visibility::Unrestricted);
    }

    #[test]
    fn test_filter_preserves_order() {
        let items = vec![("a", "ELOS SP"), ("b", "CAJAMAR"), ("c", "4 ELOS RJ")];
        let visible = manager(Some(vec!["4 ELOS"])).visibility().filter(&items, |i| i.1);
        let ids: Vec<&str> = visible.iter().map(|i| i.0).collect();
        assert_eq!(ids, vec!["a", "c"]);
    }
}
