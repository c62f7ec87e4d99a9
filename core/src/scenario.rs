//! Precondition helpers and test data for the functional scenarios.
//!
//! Scenarios assert on the operation under test; everything they need to
//! get there (a key, an owned pet, an empty account, a foreign pet) comes
//! from here. A precondition that cannot be met is a `ScenarioError`, never
//! a silent pass.

use std::fmt;

use rand::seq::IndexedRandom;
use rand::Rng;
use tracing::info;

use crate::error::ApiError;
use crate::response::{ApiResponse, Body};
use crate::transport::Transport;
use crate::types::{AuthKey, Credentials, Pet, FILTER_ALL, FILTER_MY_PETS};
use crate::PetFriends;

pub const LOWERCASE: &str = "abcdefghijklmnopqrstuvwxyz";
pub const UPPERCASE: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
pub const DIGITS: &str = "0123456789";

/// Pet created when a scenario needs the account to own something.
pub const PLACEHOLDER_PET: (&str, &str, &str) = ("Суперкот", "кот", "3");

#[derive(Debug, thiserror::Error)]
pub enum ScenarioError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("{operation} answered {status}: {body}")]
    Unexpected {
        operation: &'static str,
        status: u16,
        body: String,
    },

    #[error("the list of other people's pets is empty")]
    NoForeignPets,
}

/// `len` characters drawn uniformly from `charset`.
pub fn random_string(charset: &str, len: usize) -> String {
    let chars: Vec<char> = charset.chars().collect();
    let mut rng = rand::rng();
    (0..len).filter_map(|_| chars.choose(&mut rng)).collect()
}

/// Random 56-character key in the shape of a real one, valid for nobody.
pub fn random_auth_key() -> AuthKey {
    AuthKey::new(random_string(&format!("{LOWERCASE}{DIGITS}"), 56))
}

pub fn random_age(min: u32, max: u32) -> String {
    rand::rng().random_range(min..=max).to_string()
}

/// Issue a key for `credentials`, failing unless the service answers 200.
pub fn auth_key<T: Transport>(
    pf: &PetFriends<T>,
    credentials: &Credentials,
) -> Result<AuthKey, ScenarioError> {
    let resp = pf.get_api_key(&credentials.email, &credentials.password)?;
    expect_json("get_api_key", resp)
}

pub fn list_pets<T: Transport>(
    pf: &PetFriends<T>,
    auth_key: &AuthKey,
    filter: &str,
) -> Result<Vec<Pet>, ScenarioError> {
    let resp = pf.get_list_of_pets(auth_key, filter)?;
    Ok(expect_json("get_list_of_pets", resp)?.pets)
}

/// First owned pet, creating a placeholder when the account owns none.
pub fn ensure_own_pet<T: Transport>(
    pf: &PetFriends<T>,
    auth_key: &AuthKey,
) -> Result<Pet, ScenarioError> {
    if let Some(pet) = list_pets(pf, auth_key, FILTER_MY_PETS)?.into_iter().next() {
        return Ok(pet);
    }
    info!("account owns no pets, adding a placeholder");
    let (name, animal_type, age) = PLACEHOLDER_PET;
    let created = pf.add_new_pet_simple(auth_key, name, animal_type, age)?;
    if !created.is_success() {
        return Err(unexpected("add_new_pet_simple", &created));
    }
    list_pets(pf, auth_key, FILTER_MY_PETS)?
        .into_iter()
        .next()
        .ok_or_else(|| ScenarioError::Unexpected {
            operation: "get_list_of_pets",
            status: created.status,
            body: "placeholder pet missing from my_pets".to_string(),
        })
}

/// Delete every owned pet, one at a time, re-listing after each delete.
/// Returns how many were removed.
pub fn purge_own_pets<T: Transport>(
    pf: &PetFriends<T>,
    auth_key: &AuthKey,
) -> Result<usize, ScenarioError> {
    let mut removed = 0;
    while let Some(pet) = list_pets(pf, auth_key, FILTER_MY_PETS)?.into_iter().next() {
        let resp = pf.delete_pet(auth_key, &pet.id)?;
        // A rejected delete would otherwise loop forever on the same pet.
        if resp.is_error() {
            return Err(unexpected("delete_pet", &resp));
        }
        removed += 1;
    }
    if removed > 0 {
        info!(removed, "purged own pets");
    }
    Ok(removed)
}

/// Last pet of the unfiltered listing. Callers purge their own pets first,
/// so whatever is left belongs to someone else.
pub fn last_foreign_pet<T: Transport>(
    pf: &PetFriends<T>,
    auth_key: &AuthKey,
) -> Result<Pet, ScenarioError> {
    list_pets(pf, auth_key, FILTER_ALL)?
        .pop()
        .ok_or(ScenarioError::NoForeignPets)
}

fn expect_json<V: fmt::Debug>(
    operation: &'static str,
    resp: ApiResponse<V>,
) -> Result<V, ScenarioError> {
    if !resp.is_success() {
        return Err(unexpected(operation, &resp));
    }
    let status = resp.status;
    match resp.body {
        Body::Json(value) => Ok(value),
        Body::Raw(body) => Err(ScenarioError::Unexpected {
            operation,
            status,
            body,
        }),
    }
}

fn unexpected<V: fmt::Debug>(operation: &'static str, resp: &ApiResponse<V>) -> ScenarioError {
    let body = match &resp.body {
        Body::Json(value) => format!("{value:?}"),
        Body::Raw(text) => text.clone(),
    };
    ScenarioError::Unexpected {
        operation,
        status: resp.status,
        body,
    }
}
