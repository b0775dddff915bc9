//! Role lookup backed by the admin registry.

use std::collections::HashSet;
use tracing::info;

use crate::bot::records::{ADMINS_KEY, AdminList};
use crate::bot::store::{Collection, Filter, Store, StoreError, StoreExt};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Operator,
    Participant,
}

/// Decides which role an author acts in.
pub trait RoleLookup: Send + Sync {
    fn role_of(&self, author_id: i64) -> Role;
}

/// Operator ids, loaded once at startup.
#[derive(Debug, Clone, Default)]
pub struct AdminRegistry {
    admins: HashSet<i64>,
}

impl AdminRegistry {
    pub fn new(admins: impl IntoIterator<Item = i64>) -> Self {
        Self { admins: admins.into_iter().collect() }
    }

    /// Load the registry, seeding it with `seed_admin_id` when empty.
    pub fn load_or_seed(store: &dyn Store, seed_admin_id: i64) -> Result<Self, StoreError> {
        let by_key = Filter::eq("key", ADMINS_KEY);
        if let Some(stored) = store.find_one_as::<AdminList>(Collection::Admins, &by_key)? {
            info!("Loaded {} admin(s)", stored.record.value.len());
            return Ok(Self::new(stored.record.value));
        }

        let seeded = AdminList {
            key: ADMINS_KEY.to_string(),
            value: vec![seed_admin_id],
        };
        store.insert_record(Collection::Admins, &seeded)?;
        info!("Seeded admin registry with {}", seed_admin_id);
        Ok(Self::new(seeded.value))
    }

    pub fn len(&self) -> usize {
        self.admins.len()
    }
}

impl RoleLookup for AdminRegistry {
    fn role_of(&self, author_id: i64) -> Role {
        if self.admins.contains(&author_id) {
            Role::Operator
        } else {
            Role::Participant
        }
    }
}
