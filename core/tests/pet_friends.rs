//! Functional scenarios for the PetFriends API.
//!
//! Each scenario gets a key, sets up whatever state it needs, calls the
//! operation under test and asserts on the status code and payload.
//! Error expectations are `status >= 400` throughout.
//!
//! ```bash
//! # against the bundled mock server
//! cargo test -p petfriends-core --test pet_friends
//!
//! # against the live service
//! PETFRIENDS_EMAIL=... PETFRIENDS_PASSWORD=... cargo test -p petfriends-core --test pet_friends
//! ```

mod common;

use common::{assert_error_status, env, image, serial};
use petfriends_core::scenario::{
    self, random_age, random_auth_key, random_string, ScenarioError, DIGITS, LOWERCASE, UPPERCASE,
};
use petfriends_core::{PetFields, FILTER_ALL, FILTER_MY_PETS};

#[test]
fn get_api_key_for_valid_user() {
    let env = env();
    let _guard = serial();

    let resp = env
        .pf
        .get_api_key(&env.credentials.email, &env.credentials.password)
        .unwrap();
    assert_eq!(resp.status, 200);
    assert!(!resp.json().unwrap().as_str().is_empty());
}

#[test]
fn get_api_key_for_invalid_user() {
    let env = env();
    let _guard = serial();

    let resp = env.pf.get_api_key("invalid@invalid", "invalid").unwrap();
    assert_error_status(resp.status);
}

#[test]
fn invalid_key_requests_fail_consistently() {
    let env = env();
    let _guard = serial();

    let statuses: Vec<u16> = (0..3)
        .map(|_| env.pf.get_api_key("invalid@invalid", "invalid").unwrap().status)
        .collect();
    assert_error_status(statuses[0]);
    assert!(statuses.iter().all(|s| s / 100 == statuses[0] / 100), "{statuses:?}");
}

#[test]
fn get_pets_with_invalid_filter() -> Result<(), ScenarioError> {
    let env = env();
    let _guard = serial();

    let key = scenario::auth_key(&env.pf, &env.credentials)?;
    let resp = env.pf.get_list_of_pets(&key, "my_cats")?;
    assert_error_status(resp.status);
    Ok(())
}

#[test]
fn get_pets_with_invalid_auth_key() -> Result<(), ScenarioError> {
    let env = env();
    let _guard = serial();

    let key = random_auth_key();
    assert_eq!(key.as_str().len(), 56);
    let resp = env.pf.get_list_of_pets(&key, FILTER_ALL)?;
    assert_error_status(resp.status);
    Ok(())
}

#[test]
fn listing_is_stable_without_mutation() -> Result<(), ScenarioError> {
    let env = env();
    let _guard = serial();

    let key = scenario::auth_key(&env.pf, &env.credentials)?;
    let first = scenario::list_pets(&env.pf, &key, FILTER_MY_PETS)?;
    let second = scenario::list_pets(&env.pf, &key, FILTER_MY_PETS)?;
    let ids = |pets: &[petfriends_core::Pet]| pets.iter().map(|p| p.id.clone()).collect::<Vec<_>>();
    assert_eq!(ids(first.as_slice()), ids(second.as_slice()));
    Ok(())
}

#[test]
fn add_new_pet_without_photo() -> Result<(), ScenarioError> {
    let env = env();
    let _guard = serial();

    let key = scenario::auth_key(&env.pf, &env.credentials)?;
    let resp = env.pf.add_new_pet_simple(&key, "Кошка", "Просто кошка", "1")?;
    assert_eq!(resp.status, 200);
    assert_eq!(resp.json().unwrap().name, "Кошка");
    Ok(())
}

#[test]
fn add_new_pet_with_photo() -> Result<(), ScenarioError> {
    let env = env();
    let _guard = serial();

    let key = scenario::auth_key(&env.pf, &env.credentials)?;
    let fields = PetFields::new("Барсик", "кот", "4");
    let resp = env.pf.add_new_pet_from_file(&key, &fields, image("photo.png"))?;
    assert_eq!(resp.status, 200);
    let pet = resp.json().unwrap();
    assert_eq!(pet.name, "Барсик");
    assert!(pet.has_photo());
    Ok(())
}

#[test]
fn successful_update_pet_photo() -> Result<(), ScenarioError> {
    let env = env();
    let _guard = serial();

    let key = scenario::auth_key(&env.pf, &env.credentials)?;
    let pet = scenario::ensure_own_pet(&env.pf, &key)?;

    let resp = env.pf.add_photo_of_pet(&key, &pet.id, image("photo.png"))?;
    assert_eq!(resp.status, 200);
    let updated = resp.json().unwrap();
    assert!(!updated.pet_photo.is_empty());
    assert!(updated.photo_bytes()?.is_some_and(|bytes| !bytes.is_empty()));
    Ok(())
}

#[test]
fn unsuccessful_update_pet_invalid_photo() -> Result<(), ScenarioError> {
    let env = env();
    let _guard = serial();

    let key = scenario::auth_key(&env.pf, &env.credentials)?;
    let pet = scenario::ensure_own_pet(&env.pf, &key)?;

    let resp = env.pf.add_photo_of_pet(&key, &pet.id, image("cat.tiff"))?;
    assert_error_status(resp.status);
    Ok(())
}

#[test]
fn unsuccessful_add_pet_with_negative_age() -> Result<(), ScenarioError> {
    let env = env();
    let _guard = serial();

    let key = scenario::auth_key(&env.pf, &env.credentials)?;
    let resp = env.pf.add_new_pet_simple(&key, "Собака", "Собака какая-то", "- 99")?;
    assert_error_status(resp.status);
    Ok(())
}

#[test]
fn unsuccessful_add_pet_with_invalid_data() -> Result<(), ScenarioError> {
    let env = env();
    let _guard = serial();

    let key = scenario::auth_key(&env.pf, &env.credentials)?;
    let charset = format!("{LOWERCASE}{UPPERCASE}{DIGITS}");
    let name = random_string(&charset, 255);
    let animal_type = random_string(&charset, 500);
    let age = random_string(&charset, 30);

    let resp = env.pf.add_new_pet_simple(&key, &name, &animal_type, &age)?;
    assert_error_status(resp.status);
    Ok(())
}

#[test]
fn unsuccessful_update_stranger_pet_info() -> Result<(), ScenarioError> {
    let env = env();
    let _guard = serial();

    let key = scenario::auth_key(&env.pf, &env.credentials)?;
    scenario::purge_own_pets(&env.pf, &key)?;
    let stranger_pet = scenario::last_foreign_pet(&env.pf, &key)?;

    // Random values so repeated runs keep changing the request.
    let name = random_string(UPPERCASE, 3);
    let animal_type = random_string(LOWERCASE, 5);
    let age = random_age(100, 999);

    let resp = env
        .pf
        .update_pet_info(&key, &stranger_pet.id, &name, &animal_type, &age)?;
    assert_error_status(resp.status);
    Ok(())
}

#[test]
fn unsuccessful_delete_stranger_pet() -> Result<(), ScenarioError> {
    let env = env();
    let _guard = serial();

    let key = scenario::auth_key(&env.pf, &env.credentials)?;
    scenario::purge_own_pets(&env.pf, &key)?;
    let stranger_pet = scenario::last_foreign_pet(&env.pf, &key)?;

    let resp = env.pf.delete_pet(&key, &stranger_pet.id)?;
    let remaining = env.pf.get_list_of_pets(&key, FILTER_ALL)?;

    assert_error_status(resp.status);
    assert!(
        remaining.json().unwrap().contains(&stranger_pet.id),
        "pet {} was deleted by a stranger",
        stranger_pet.id
    );
    Ok(())
}
