use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Permission identifier.
///
/// Permissions are opaque capability strings (e.g. "edit stock entity at own
/// location"). The wildcard `"*"` grants everything.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permission(Cow<'static, str>);

impl Permission {
    /// Full control over stock entities and locations.
    pub const ADMINISTER_STOCK: Permission = Permission::from_static("administer stock entity");
    /// May move stock at every location.
    pub const EDIT_STOCK_ANY_LOCATION: Permission =
        Permission::from_static("edit stock entity at any location");
    /// May move stock only at locations the user manages.
    pub const EDIT_STOCK_OWN_LOCATION: Permission =
        Permission::from_static("edit stock entity at own location");
    /// May edit and confirm invoices.
    pub const EDIT_INVOICE: Permission = Permission::from_static("edit commerce_invoice");
    /// May keep editing an invoice after it was confirmed.
    pub const EDIT_LOCKED_INVOICE: Permission =
        Permission::from_static("edit locked commerce_invoice");
    pub const WILDCARD: Permission = Permission::from_static("*");

    /// Any of these lets a user work the stock form.
    pub const STOCK_EDITORS: [Permission; 3] = [
        Permission::ADMINISTER_STOCK,
        Permission::EDIT_STOCK_ANY_LOCATION,
        Permission::EDIT_STOCK_OWN_LOCATION,
    ];

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_wildcard(&self) -> bool {
        self.as_str() == "*"
    }
}

impl core::fmt::Display for Permission {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for Permission {
    fn from(value: &'static str) -> Self {
        Self::from_static(value)
    }
}
