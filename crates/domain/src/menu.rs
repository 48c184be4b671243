use std::collections::BTreeMap;

use fieldgate_core::UserIdentity;
use serde::{Deserialize, Serialize};

use crate::access::AccessGate;
use crate::role::CustomRole;

/// Top-level admin pages a business consultant may open.
pub const CONSULTANT_ALLOWED_MENUS: &[&str] = &[
    "index.php",
    "edit.php",
    "edit.php?post_type=estate-sale",
    "gf_edit_forms",
    "looker-studio-dashboard",
    "scribe-ai-dashboard",
];

/// Top-level admin pages hidden from single-role franchisees.
pub const FRANCHISEE_HIDDEN_MENUS: &[&str] =
    &["edit.php?post_type=popup", "profile.php", "tools.php"];

/// Meta capabilities withheld from franchisees.
pub const FRANCHISEE_DENIED_META_CAPABILITIES: &[&str] = &["delete_page", "delete_post"];

const USERS_MENU: &str = "users.php";
const PROFILE_PAGE: &str = "profile.php";
const PAGES_MENU: &str = "edit.php?post_type=page";
const NEW_PAGE: &str = "post-new.php?post_type=page";

/// One top-level admin menu entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    /// Page slug, e.g. `edit.php?post_type=page`.
    pub slug: String,
    /// Display title.
    #[serde(default)]
    pub title: String,
}

/// One submenu entry below a top-level slug.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmenuItem {
    /// Page slug.
    pub slug: String,
    /// Display title.
    #[serde(default)]
    pub title: String,
}

/// Admin navigation as registered by the host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminMenu {
    /// Top-level entries in display order.
    #[serde(default)]
    pub items: Vec<MenuItem>,
    /// Submenu entries keyed by parent slug.
    #[serde(default)]
    pub submenus: BTreeMap<String, Vec<SubmenuItem>>,
}

/// Admin chrome decisions for one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChromeDecisions {
    /// Whether the front-end admin bar is shown.
    pub show_admin_bar: bool,
    /// Whether core and plugin update notices are hidden.
    pub suppress_update_notices: bool,
    /// Meta capabilities the host must deny.
    pub denied_meta_capabilities: Vec<String>,
}

/// Filters admin navigation and chrome per acting user.
#[derive(Debug, Clone, Default)]
pub struct AdminMenuPolicy {
    gate: AccessGate,
}

impl AdminMenuPolicy {
    /// Creates a policy over the given access gate.
    #[must_use]
    pub fn new(gate: AccessGate) -> Self {
        Self { gate }
    }

    /// Returns the menu the user is allowed to see.
    #[must_use]
    pub fn filter(&self, mut menu: AdminMenu, user: &UserIdentity) -> AdminMenu {
        if self.gate.is_administrator(user) {
            return menu;
        }

        if is_consultant(user) {
            menu.items
                .retain(|item| CONSULTANT_ALLOWED_MENUS.contains(&item.slug.as_str()));
            menu.submenus
                .retain(|parent, _| CONSULTANT_ALLOWED_MENUS.contains(&parent.as_str()));
        }

        if is_franchisee(user) {
            if user.roles().len() == 1 {
                menu.items
                    .retain(|item| !FRANCHISEE_HIDDEN_MENUS.contains(&item.slug.as_str()));
                for hidden in FRANCHISEE_HIDDEN_MENUS {
                    menu.submenus.remove(*hidden);
                }
                remove_submenu_entry(&mut menu, USERS_MENU, PROFILE_PAGE);
            }
            remove_submenu_entry(&mut menu, PAGES_MENU, NEW_PAGE);
        }

        menu
    }

    /// Returns whether the front-end admin bar is shown.
    #[must_use]
    pub fn show_admin_bar(&self, user: &UserIdentity) -> bool {
        !is_consultant(user)
    }

    /// Returns whether update notices are hidden.
    #[must_use]
    pub fn suppress_update_notices(&self, user: &UserIdentity) -> bool {
        !self.gate.is_administrator(user)
    }

    /// Returns the meta capabilities the host must deny for the user.
    #[must_use]
    pub fn denied_meta_capabilities(&self, user: &UserIdentity) -> Vec<String> {
        if is_franchisee(user) && !self.gate.is_administrator(user) {
            FRANCHISEE_DENIED_META_CAPABILITIES
                .iter()
                .map(|capability| (*capability).to_owned())
                .collect()
        } else {
            Vec::new()
        }
    }

    /// Returns every chrome decision for the user.
    #[must_use]
    pub fn chrome(&self, user: &UserIdentity) -> ChromeDecisions {
        ChromeDecisions {
            show_admin_bar: self.show_admin_bar(user),
            suppress_update_notices: self.suppress_update_notices(user),
            denied_meta_capabilities: self.denied_meta_capabilities(user),
        }
    }
}

fn is_consultant(user: &UserIdentity) -> bool {
    user.has_capability(CustomRole::FranchiseBusinessConsultant.as_str())
}

fn is_franchisee(user: &UserIdentity) -> bool {
    user.has_capability(CustomRole::Franchisee.as_str())
}

fn remove_submenu_entry(menu: &mut AdminMenu, parent: &str, slug: &str) {
    if let Some(entries) = menu.submenus.get_mut(parent) {
        entries.retain(|entry| entry.slug != slug);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use fieldgate_core::{SiteId, UserIdentity};

    use super::{AdminMenu, AdminMenuPolicy, MenuItem, SubmenuItem};

    fn user(roles: &[&str]) -> UserIdentity {
        UserIdentity::new("7", "Casey", SiteId::new(2).unwrap_or_else(|_| unreachable!()))
            .with_roles(roles.iter().copied())
    }

    fn menu() -> AdminMenu {
        let items = [
            "index.php",
            "edit.php",
            "edit.php?post_type=page",
            "edit.php?post_type=estate-sale",
            "edit.php?post_type=popup",
            "users.php",
            "profile.php",
            "tools.php",
            "gf_edit_forms",
        ]
        .into_iter()
        .map(|slug| MenuItem {
            slug: slug.to_owned(),
            title: slug.to_owned(),
        })
        .collect();

        let entry = |slug: &str| SubmenuItem {
            slug: slug.to_owned(),
            title: slug.to_owned(),
        };
        let submenus = BTreeMap::from([
            (
                "users.php".to_owned(),
                vec![entry("users.php"), entry("profile.php")],
            ),
            (
                "edit.php?post_type=page".to_owned(),
                vec![
                    entry("edit.php?post_type=page"),
                    entry("post-new.php?post_type=page"),
                ],
            ),
            ("tools.php".to_owned(), vec![entry("tools.php")]),
        ]);

        AdminMenu { items, submenus }
    }

    fn slugs(menu: &AdminMenu) -> Vec<&str> {
        menu.items.iter().map(|item| item.slug.as_str()).collect()
    }

    #[test]
    fn administrators_see_everything() {
        let policy = AdminMenuPolicy::default();
        let admin = user(&["administrator"]);

        assert_eq!(policy.filter(menu(), &admin), menu());
        assert!(!policy.suppress_update_notices(&admin));
        assert!(policy.denied_meta_capabilities(&admin).is_empty());
    }

    #[test]
    fn consultant_sees_allow_list_only() {
        let policy = AdminMenuPolicy::default();
        let consultant = user(&["franchise_business_consultant"]);
        let filtered = policy.filter(menu(), &consultant);

        assert_eq!(
            slugs(&filtered),
            vec![
                "index.php",
                "edit.php",
                "edit.php?post_type=estate-sale",
                "gf_edit_forms"
            ]
        );
        assert!(filtered.submenus.is_empty());
        assert!(!policy.show_admin_bar(&consultant));
    }

    #[test]
    fn single_role_franchisee_loses_profile_and_tools() {
        let policy = AdminMenuPolicy::default();
        let filtered = policy.filter(menu(), &user(&["franchisee"]));

        let visible = slugs(&filtered);
        assert!(!visible.contains(&"profile.php"));
        assert!(!visible.contains(&"tools.php"));
        assert!(!visible.contains(&"edit.php?post_type=popup"));
        assert!(!filtered.submenus.contains_key("tools.php"));

        let users: Vec<&str> = filtered.submenus["users.php"]
            .iter()
            .map(|entry| entry.slug.as_str())
            .collect();
        assert_eq!(users, vec!["users.php"]);

        let pages: Vec<&str> = filtered.submenus["edit.php?post_type=page"]
            .iter()
            .map(|entry| entry.slug.as_str())
            .collect();
        assert_eq!(pages, vec!["edit.php?post_type=page"]);
    }

    #[test]
    fn multi_role_franchisee_keeps_profile_but_not_new_page() {
        let policy = AdminMenuPolicy::default();
        let filtered = policy.filter(menu(), &user(&["franchisee", "corporate"]));

        assert!(slugs(&filtered).contains(&"profile.php"));
        assert_eq!(filtered.submenus["edit.php?post_type=page"].len(), 1);
    }

    #[test]
    fn franchisee_chrome_denies_delete_meta_capabilities() {
        let policy = AdminMenuPolicy::default();
        let chrome = policy.chrome(&user(&["franchisee"]));

        assert!(chrome.show_admin_bar);
        assert!(chrome.suppress_update_notices);
        assert_eq!(
            chrome.denied_meta_capabilities,
            vec!["delete_page".to_owned(), "delete_post".to_owned()]
        );
    }
}
