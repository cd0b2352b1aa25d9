//! Which stock locations a user may pick as source or target.

use std::collections::BTreeMap;

use stockdesk_auth::{Permission, Principal};
use stockdesk_core::{DomainError, DomainResult, LocationId};

use crate::StockLocation;

/// Selectable locations, id → display name, in id order.
pub type LocationOptions = BTreeMap<LocationId, String>;

/// How far a user's stock permissions reach.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationAccess {
    /// Administrators and "any location" editors.
    All,
    /// Only locations listing the user as a manager.
    Managed,
    /// The location selector is disabled.
    None,
}

impl LocationAccess {
    pub fn for_principal(principal: &Principal) -> Self {
        if principal.is_stock_admin()
            || principal.has_permission(&Permission::EDIT_STOCK_ANY_LOCATION)
        {
            LocationAccess::All
        } else if principal.has_permission(&Permission::EDIT_STOCK_OWN_LOCATION) {
            LocationAccess::Managed
        } else {
            LocationAccess::None
        }
    }

    pub fn allows(self, principal: &Principal, location: &StockLocation) -> bool {
        match self {
            LocationAccess::All => true,
            LocationAccess::Managed => location.is_managed_by(principal.user_id()),
            LocationAccess::None => false,
        }
    }
}

/// Filter already-loaded locations down to the ones `principal` may select.
pub fn visible_locations<'a, I>(principal: &Principal, locations: I) -> LocationOptions
where
    I: IntoIterator<Item = &'a StockLocation>,
{
    let access = LocationAccess::for_principal(principal);
    if access == LocationAccess::None {
        return LocationOptions::new();
    }

    locations
        .into_iter()
        .filter(|location| access.allows(principal, location))
        .map(|location| (location.id, location.name.clone()))
        .collect()
}

/// Reject a location id that is not among the selectable options.
pub fn ensure_selectable(options: &LocationOptions, location: LocationId) -> DomainResult<()> {
    if options.contains_key(&location) {
        Ok(())
    } else {
        Err(DomainError::Unauthorized)
    }
}
