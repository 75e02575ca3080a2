//! Actor roles and the role-to-rights registry.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::rights;

/// Every kind of actor the API knows about.
///
/// The camelCase tags are shared by JSON payloads and the `actor_role`
/// database enum.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[serde(rename_all = "camelCase")]
#[sqlx(type_name = "actor_role", rename_all = "camelCase")]
pub enum Role {
    Admin,
    Hospital,
    Doctor,
    ChiefDoctor,
    Nurse,
    Patient,
}

impl Role {
    /// Every role, in declaration order. Registry construction checks
    /// coverage against this list.
    pub const ALL: [Role; 6] = [
        Role::Admin,
        Role::Hospital,
        Role::Doctor,
        Role::ChiefDoctor,
        Role::Nurse,
        Role::Patient,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Hospital => "hospital",
            Role::Doctor => "doctor",
            Role::ChiefDoctor => "chiefDoctor",
            Role::Nurse => "nurse",
            Role::Patient => "patient",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rejection of a role-to-rights table at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("no rights entry for role {0}")]
    MissingRole(Role),
    #[error("duplicate rights entry for role {0}")]
    DuplicateRole(Role),
}

/// Rights granted to each role out of the box.
pub const DEFAULT_ROLE_RIGHTS: &[(Role, &[&str])] = &[
    (
        Role::Admin,
        &[
            rights::GET_HOSPITALS,
            rights::MANAGE_HOSPITALS,
            rights::GET_DOCTORS,
            rights::MANAGE_DOCTORS,
            rights::GET_CHIEF_DOCTORS,
            rights::MANAGE_CHIEF_DOCTORS,
            rights::GET_USERS,
            rights::MANAGE_USERS,
        ],
    ),
    (Role::Hospital, &[rights::CREATE_CHIEF_DOCTORS]),
    (
        Role::Doctor,
        &[rights::CREATE_DOCTORS, rights::GET_DOCTORS, rights::MANAGE_DOCTORS],
    ),
    (Role::ChiefDoctor, &[rights::GET_USERS, rights::MANAGE_USERS]),
    (Role::Nurse, &[rights::GET_USERS, rights::MANAGE_USERS]),
    (Role::Patient, &[]),
];

/// Immutable mapping from role to the rights it grants.
///
/// Built once at startup and shared read-only behind an `Arc`. Construction
/// validates that every role has exactly one entry, so lookups are total
/// afterwards.
#[derive(Debug, Clone)]
pub struct RoleRegistry {
    rights: HashMap<Role, HashSet<String>>,
}

impl RoleRegistry {
    /// Builds a registry from explicit entries.
    ///
    /// # Errors
    ///
    /// Rejects tables where a role is missing or listed twice.
    pub fn from_entries(entries: &[(Role, &[&str])]) -> Result<Self, RegistryError> {
        let mut rights: HashMap<Role, HashSet<String>> = HashMap::new();

        for (role, granted) in entries {
            let set = granted.iter().map(|right| right.to_string()).collect();
            if rights.insert(*role, set).is_some() {
                return Err(RegistryError::DuplicateRole(*role));
            }
        }

        for role in Role::ALL {
            if !rights.contains_key(&role) {
                return Err(RegistryError::MissingRole(role));
            }
        }

        Ok(Self { rights })
    }

    /// Registry loaded with [`DEFAULT_ROLE_RIGHTS`].
    pub fn with_defaults() -> Result<Self, RegistryError> {
        Self::from_entries(DEFAULT_ROLE_RIGHTS)
    }

    /// Rights granted to `role`. Total over the role enum because
    /// construction validated coverage.
    #[must_use]
    pub fn rights(&self, role: Role) -> &HashSet<String> {
        &self.rights[&role]
    }

    /// Whether `role` holds every right in `required`.
    #[must_use]
    pub fn has_all(&self, role: Role, required: &[&str]) -> bool {
        let granted = self.rights(role);
        required.iter().all(|right| granted.contains(*right))
    }
}
