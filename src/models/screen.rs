//! Screens and the access requirements each one declares.

use crate::models::Role;
use std::fmt;

/// A check evaluated before a screen may render
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    Authenticated,
    RequireRole(Role),
}

const OPEN: &[Guard] = &[];
const AUTHENTICATED: &[Guard] = &[Guard::Authenticated];
// Role checks always come after the authentication check
const ADMIN_ONLY: &[Guard] = &[Guard::Authenticated, Guard::RequireRole(Role::Admin)];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Login,
    DealList,
    DealNew,
    DealEdit(String),
    DealDetail(String),
    UserManagement,
    UserNew,
}

impl Screen {
    /// Where under-privileged but authenticated users are sent
    pub fn default_authenticated() -> Screen {
        Screen::DealList
    }

    /// Where a fresh login lands
    pub fn landing_for(role: Role) -> Screen {
        match role {
            Role::Admin => Screen::UserManagement,
            Role::User => Screen::DealList,
        }
    }

    pub fn guards(&self) -> &'static [Guard] {
        match self {
            Screen::Login => OPEN,
            Screen::DealList | Screen::DealNew | Screen::DealEdit(_) | Screen::DealDetail(_) => {
                AUTHENTICATED
            }
            Screen::UserManagement | Screen::UserNew => ADMIN_ONLY,
        }
    }

    pub fn required_role(&self) -> Option<Role> {
        self.guards().iter().find_map(|guard| match guard {
            Guard::RequireRole(role) => Some(*role),
            Guard::Authenticated => None,
        })
    }

    pub fn path(&self) -> String {
        match self {
            Screen::Login => "/login".to_string(),
            Screen::DealList => "/deals".to_string(),
            Screen::DealNew => "/deals/new".to_string(),
            Screen::DealEdit(id) => format!("/deals/{}/edit", id),
            Screen::DealDetail(id) => format!("/deals/{}", id),
            Screen::UserManagement => "/admin".to_string(),
            Screen::UserNew => "/admin/new".to_string(),
        }
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Sidebar entry and the roles allowed to see it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavItem {
    pub label: &'static str,
    pub screen: Screen,
    pub roles: &'static [Role],
}

/// Navigation entries visible to `role`
pub fn nav_items_for(role: Option<Role>) -> Vec<NavItem> {
    let items = [
        NavItem {
            label: "Deal Pipeline",
            screen: Screen::DealList,
            roles: &[Role::User, Role::Admin],
        },
        NavItem {
            label: "User Management",
            screen: Screen::UserManagement,
            roles: &[Role::Admin],
        },
    ];
    items
        .into_iter()
        .filter(|item| role.is_some_and(|r| item.roles.contains(&r)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_screens_check_session_first() {
        assert_eq!(
            Screen::UserNew.guards(),
            &[Guard::Authenticated, Guard::RequireRole(Role::Admin)]
        );
        assert_eq!(Screen::UserManagement.required_role(), Some(Role::Admin));
        assert_eq!(Screen::DealDetail("1".into()).required_role(), None);
        assert!(Screen::Login.guards().is_empty());
    }

    #[test]
    fn test_landing_screens() {
        assert_eq!(Screen::landing_for(Role::Admin), Screen::UserManagement);
        assert_eq!(Screen::landing_for(Role::User), Screen::DealList);
    }

    #[test]
    fn test_nav_items_by_role() {
        assert_eq!(nav_items_for(Some(Role::Admin)).len(), 2);
        let user_items = nav_items_for(Some(Role::User));
        assert_eq!(user_items.len(), 1);
        assert_eq!(user_items[0].screen, Screen::DealList);
        assert!(nav_items_for(None).is_empty());
    }
}
