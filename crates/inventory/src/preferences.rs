use std::sync::Arc;

use stockdesk_core::{LocationId, UserId};

/// Per-user form defaults that outlive a single request.
pub trait PreferenceStore: Send + Sync {
    fn default_location(&self, user: UserId) -> Option<LocationId>;
    fn set_default_location(&self, user: UserId, location: LocationId);
}

impl<S> PreferenceStore for Arc<S>
where
    S: PreferenceStore + ?Sized,
{
    fn default_location(&self, user: UserId) -> Option<LocationId> {
        (**self).default_location(user)
    }

    fn set_default_location(&self, user: UserId, location: LocationId) {
        (**self).set_default_location(user, location)
    }
}
