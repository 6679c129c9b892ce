//! Permission strings and the access rights of the logged-in employee.

use serde::{Deserialize, Serialize};

pub const ADMIN: &str = "admin";
pub const KASSE: &str = "kasse";
pub const FINANCES: &str = "finances";
pub const USER_READ: &str = "user.read";
pub const USER_CREATE: &str = "user.create";
pub const USER_UPDATE: &str = "user.update";
pub const USER_DELETE: &str = "user.delete";
pub const ROLE_READ: &str = "role.read";
pub const ROLE_CREATE: &str = "role.create";
pub const ROLE_UPDATE: &str = "role.update";
pub const ROLE_DELETE: &str = "role.delete";
pub const PRODUCT_READ: &str = "product.read";
pub const PRODUCT_CREATE: &str = "product.create";
pub const PRODUCT_UPDATE: &str = "product.update";
pub const PRODUCT_DELETE: &str = "product.delete";
pub const COUPONS_READ: &str = "coupons.read";
pub const COUPONS_CREATE: &str = "coupons.create";
pub const COUPONS_UPDATE: &str = "coupons.update";
pub const COUPONS_DELETE: &str = "coupons.delete";
pub const URLAUB_READ: &str = "urlaub.read";
pub const URLAUB_REVIEW: &str = "urlaub.review";

/// Permission group as shown in the role editor.
pub struct PermissionGroup {
    pub label: &'static str,
    pub permissions: &'static [(&'static str, &'static str)],
}

/// All known permissions, grouped for the role editor.
pub const GROUPS: &[PermissionGroup] = &[
    PermissionGroup {
        label: "Allgemein",
        permissions: &[(ADMIN, "Administrator"), (KASSE, "Kassenzugang"), (FINANCES, "Finanzen")],
    },
    PermissionGroup {
        label: "Mitarbeiter",
        permissions: &[
            (USER_READ, "Ansehen"),
            (USER_CREATE, "Erstellen"),
            (USER_UPDATE, "Bearbeiten"),
            (USER_DELETE, "Löschen"),
        ],
    },
    PermissionGroup {
        label: "Rollen",
        permissions: &[
            (ROLE_READ, "Ansehen"),
            (ROLE_CREATE, "Erstellen"),
            (ROLE_UPDATE, "Bearbeiten"),
            (ROLE_DELETE, "Löschen"),
        ],
    },
    PermissionGroup {
        label: "Produkte",
        permissions: &[
            (PRODUCT_READ, "Ansehen"),
            (PRODUCT_CREATE, "Erstellen"),
            (PRODUCT_UPDATE, "Bearbeiten"),
            (PRODUCT_DELETE, "Löschen"),
        ],
    },
    PermissionGroup {
        label: "Coupons",
        permissions: &[
            (COUPONS_READ, "Ansehen"),
            (COUPONS_CREATE, "Erstellen"),
            (COUPONS_UPDATE, "Bearbeiten"),
            (COUPONS_DELETE, "Löschen"),
        ],
    },
    PermissionGroup {
        label: "Urlaub",
        permissions: &[(URLAUB_READ, "Anträge ansehen"), (URLAUB_REVIEW, "Anträge bearbeiten")],
    },
];

/// Iterate over every known permission string.
pub fn all() -> impl Iterator<Item = &'static str> {
    GROUPS.iter().flat_map(|g| g.permissions.iter().map(|(p, _)| *p))
}

/// Result of `auth/cookie-validation`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessRights {
    #[serde(default)]
    pub access_rights: Vec<String>,
}

impl AccessRights {
    pub fn new<I, S>(rights: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            access_rights: rights.into_iter().map(Into::into).collect(),
        }
    }

    fn has(&self, permission: &str) -> bool {
        self.access_rights.iter().any(|r| r == permission)
    }

    /// Granted directly or through `admin`.
    pub fn allows(&self, permission: &str) -> bool {
        self.has(permission) || self.has(ADMIN)
    }

    pub fn is_admin(&self) -> bool {
        self.has(ADMIN)
    }
}

const WRITE_SUFFIXES: [&str; 3] = [".create", ".update", ".delete"];

/// Toggle `permission` in `selected`, keeping dependent permissions consistent.
///
/// Granting a write permission also grants the matching `.read`; revoking a
/// `.read` revokes the writes. `kasse` depends on `product.read` and
/// `finances` on `user.read`.
pub fn toggle_permission(selected: &mut Vec<String>, permission: &str) {
    let present = selected.iter().any(|p| p == permission);
    if present {
        selected.retain(|p| p != permission);

        if let Some(base) = permission.strip_suffix(".read") {
            selected.retain(|p| {
                !WRITE_SUFFIXES
                    .iter()
                    .any(|suffix| p.strip_prefix(base).is_some_and(|rest| rest.starts_with(suffix)))
            });
        }
        if permission == USER_READ {
            selected.retain(|p| p != FINANCES);
        }
        if permission == PRODUCT_READ {
            selected.retain(|p| p != KASSE);
        }
    } else {
        selected.push(permission.to_string());

        let write_base = WRITE_SUFFIXES
            .iter()
            .find_map(|suffix| permission.strip_suffix(suffix));
        if let Some(base) = write_base {
            add_missing(selected, &format!("{base}.read"));
        }
        if permission == KASSE {
            add_missing(selected, PRODUCT_READ);
        }
        if permission == FINANCES {
            add_missing(selected, USER_READ);
        }
    }
}

fn add_missing(selected: &mut Vec<String>, permission: &str) {
    if !selected.iter().any(|p| p == permission) {
        selected.push(permission.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_allows() {
        let rights = AccessRights::new(["kasse", "product.read"]);
        assert!(rights.allows(KASSE));
        assert!(!rights.allows(FINANCES));

        let admin = AccessRights::new(["admin"]);
        assert!(admin.allows(FINANCES));
        assert!(admin.allows(URLAUB_REVIEW));
        assert!(admin.is_admin());

        assert!(!AccessRights::default().allows(USER_READ));
    }

    #[test]
    fn test_access_rights_json() {
        let rights: AccessRights = serde_json::from_str(r#"{"accessRights":["finances","user.read"]}"#).unwrap();
        assert!(rights.allows(FINANCES));
    }

    #[test]
    fn test_write_adds_read() {
        let mut s = Vec::new();
        toggle_permission(&mut s, PRODUCT_UPDATE);
        assert_eq!(s, set(&["product.update", "product.read"]));

        toggle_permission(&mut s, PRODUCT_DELETE);
        assert_eq!(s, set(&["product.update", "product.read", "product.delete"]));
    }

    #[test]
    fn test_remove_read_removes_writes() {
        let mut s = set(&["user.read", "user.create", "user.delete", "role.read", "role.update", "finances"]);
        toggle_permission(&mut s, USER_READ);
        assert_eq!(s, set(&["role.read", "role.update"]));
    }

    #[test]
    fn test_kasse_and_finances_dependencies() {
        let mut s = Vec::new();
        toggle_permission(&mut s, KASSE);
        assert_eq!(s, set(&["kasse", "product.read"]));
        toggle_permission(&mut s, PRODUCT_READ);
        assert!(s.is_empty());

        toggle_permission(&mut s, FINANCES);
        assert_eq!(s, set(&["finances", "user.read"]));
        toggle_permission(&mut s, FINANCES);
        assert_eq!(s, set(&["user.read"]));
    }

    #[test]
    fn test_all_permissions() {
        let perms: Vec<_> = all().collect();
        assert_eq!(perms.len(), 21);
        assert!(perms.contains(&URLAUB_REVIEW));
    }
}
