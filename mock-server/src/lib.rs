//! In-process stand-in for the PetFriends REST API.
//!
//! Emulates the parts of the contract the functional scenarios exercise:
//! key issuance, pet listing with the `my_pets` filter, creation with and
//! without a photo, photo replacement, update and deletion, with ownership
//! enforced per account and basic validation of fields and photo formats.

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Multipart, Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post, put},
    Form, Json, Router,
};
use base64::Engine;
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, info};
use uuid::Uuid;

pub const MAX_TEXT_LEN: usize = 100;
pub const MAX_AGE_DIGITS: usize = 3;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pet {
    pub id: String,
    pub name: String,
    pub animal_type: String,
    pub age: String,
    pub pet_photo: String,
    pub user_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct KeyBody {
    pub key: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PetsBody {
    pub pets: Vec<Pet>,
}

#[derive(Debug, Deserialize)]
pub struct PetForm {
    pub name: String,
    pub animal_type: String,
    pub age: String,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub filter: String,
}

/// Accounts and pets the service starts with.
#[derive(Clone, Debug, Default)]
pub struct Seed {
    accounts: Vec<(String, String)>,
    pets: Vec<(String, PetFields)>,
}

#[derive(Clone, Debug)]
struct PetFields {
    name: String,
    animal_type: String,
    age: String,
}

impl Seed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_account(mut self, email: &str, password: &str) -> Self {
        self.accounts.push((email.to_string(), password.to_string()));
        self
    }

    /// Seed a pet owned by `owner`, which must also be seeded as an account.
    pub fn with_pet(mut self, owner: &str, name: &str, animal_type: &str, age: &str) -> Self {
        self.pets.push((
            owner.to_string(),
            PetFields {
                name: name.to_string(),
                animal_type: animal_type.to_string(),
                age: age.to_string(),
            },
        ));
        self
    }
}

struct Account {
    password: String,
    user_id: String,
    key: Option<String>,
}

#[derive(Default)]
pub struct Store {
    accounts: HashMap<String, Account>,
    /// Newest first, like the real listing.
    pets: Vec<Pet>,
}

impl Store {
    fn from_seed(seed: Seed) -> Self {
        let mut store = Store::default();
        for (email, password) in seed.accounts {
            store.accounts.insert(
                email,
                Account {
                    password,
                    user_id: Uuid::new_v4().simple().to_string(),
                    key: None,
                },
            );
        }
        for (owner, fields) in seed.pets {
            if let Some(account) = store.accounts.get(&owner) {
                let pet = new_pet(&account.user_id, fields, String::new());
                store.pets.insert(0, pet);
            }
        }
        store
    }

    /// `user_id` of the account that holds `key`.
    fn owner_of_key(&self, key: &str) -> Option<String> {
        self.accounts
            .values()
            .find(|account| account.key.as_deref() == Some(key))
            .map(|account| account.user_id.clone())
    }

    fn pet_mut(&mut self, pet_id: &str, user_id: &str) -> Result<&mut Pet, Rejection> {
        let pet = self
            .pets
            .iter_mut()
            .find(|pet| pet.id == pet_id)
            .ok_or_else(|| reject(StatusCode::NOT_FOUND, "pet not found"))?;
        if pet.user_id != user_id {
            return Err(reject(StatusCode::FORBIDDEN, "pet belongs to another user"));
        }
        Ok(pet)
    }
}

pub type Db = Arc<RwLock<Store>>;

type Rejection = (StatusCode, String);

pub fn app(seed: Seed) -> Router {
    let db: Db = Arc::new(RwLock::new(Store::from_seed(seed)));
    Router::new()
        .route("/api/key", get(get_api_key))
        .route("/api/pets", get(list_pets).post(create_pet))
        .route("/api/create_pet_simple", post(create_pet_simple))
        .route("/api/pets/set_photo/{pet_id}", post(set_photo))
        .route("/api/pets/{pet_id}", put(update_pet).delete(delete_pet))
        .with_state(db)
}

pub async fn run(listener: TcpListener, seed: Seed) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "mock PetFriends listening");
    }
    axum::serve(listener, app(seed)).await
}

async fn get_api_key(State(db): State<Db>, headers: HeaderMap) -> Result<Json<KeyBody>, Rejection> {
    let email = header(&headers, "email");
    let password = header(&headers, "password");
    let mut store = db.write().await;
    let account = store
        .accounts
        .get_mut(email)
        .filter(|account| account.password == password)
        .ok_or_else(|| reject(StatusCode::FORBIDDEN, "This user wasn't found in database"))?;
    let key = account.key.get_or_insert_with(issue_key).clone();
    Ok(Json(KeyBody { key }))
}

async fn list_pets(
    State(db): State<Db>,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> Result<Json<PetsBody>, Rejection> {
    let store = db.read().await;
    let user_id = authenticate(&store, &headers)?;
    let pets = match query.filter.as_str() {
        "" => store.pets.clone(),
        "my_pets" => store
            .pets
            .iter()
            .filter(|pet| pet.user_id == user_id)
            .cloned()
            .collect(),
        other => return Err(reject(StatusCode::BAD_REQUEST, &format!("unknown filter {other:?}"))),
    };
    Ok(Json(PetsBody { pets }))
}

async fn create_pet_simple(
    State(db): State<Db>,
    headers: HeaderMap,
    Form(form): Form<PetForm>,
) -> Result<Json<Pet>, Rejection> {
    let mut store = db.write().await;
    let user_id = authenticate(&store, &headers)?;
    let fields = validate_fields(form)?;
    let pet = new_pet(&user_id, fields, String::new());
    store.pets.insert(0, pet.clone());
    Ok(Json(pet))
}

async fn create_pet(
    State(db): State<Db>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Result<Json<Pet>, Rejection> {
    let user_id = authenticate(&*db.read().await, &headers)?;
    let mut upload = read_upload(multipart).await?;
    let form = PetForm {
        name: upload.remove_text("name")?,
        animal_type: upload.remove_text("animal_type")?,
        age: upload.remove_text("age")?,
    };
    let fields = validate_fields(form)?;
    let photo = photo_data_uri(upload.photo.as_deref())?;

    let pet = new_pet(&user_id, fields, photo);
    db.write().await.pets.insert(0, pet.clone());
    Ok(Json(pet))
}

async fn set_photo(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(pet_id): Path<String>,
    multipart: Multipart,
) -> Result<Json<Pet>, Rejection> {
    let user_id = authenticate(&*db.read().await, &headers)?;
    let upload = read_upload(multipart).await?;
    let photo = photo_data_uri(upload.photo.as_deref())?;

    let mut store = db.write().await;
    let pet = store.pet_mut(&pet_id, &user_id)?;
    pet.pet_photo = photo;
    Ok(Json(pet.clone()))
}

async fn update_pet(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(pet_id): Path<String>,
    Form(form): Form<PetForm>,
) -> Result<Json<Pet>, Rejection> {
    let mut store = db.write().await;
    let user_id = authenticate(&store, &headers)?;
    let pet = store.pet_mut(&pet_id, &user_id)?;
    let fields = validate_fields(form)?;
    pet.name = fields.name;
    pet.animal_type = fields.animal_type;
    pet.age = fields.age;
    Ok(Json(pet.clone()))
}

async fn delete_pet(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(pet_id): Path<String>,
) -> Result<StatusCode, Rejection> {
    let mut store = db.write().await;
    let user_id = authenticate(&store, &headers)?;
    store.pet_mut(&pet_id, &user_id)?;
    store.pets.retain(|pet| pet.id != pet_id);
    Ok(StatusCode::OK)
}

fn header<'a>(headers: &'a HeaderMap, name: &str) -> &'a str {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
}

fn authenticate(store: &Store, headers: &HeaderMap) -> Result<String, Rejection> {
    store
        .owner_of_key(header(headers, "auth_key"))
        .ok_or_else(|| reject(StatusCode::FORBIDDEN, "Please provide 'auth_key' Header"))
}

fn reject(status: StatusCode, message: &str) -> Rejection {
    debug!(status = status.as_u16(), message, "rejecting request");
    (status, message.to_string())
}

fn issue_key() -> String {
    let mut key = format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple());
    key.truncate(56);
    key
}

fn new_pet(user_id: &str, fields: PetFields, pet_photo: String) -> Pet {
    Pet {
        id: Uuid::new_v4().simple().to_string(),
        name: fields.name,
        animal_type: fields.animal_type,
        age: fields.age,
        pet_photo,
        user_id: user_id.to_string(),
    }
}

/// Name and type: 1..=100 characters. Age: 1..=3 ASCII digits.
fn validate_fields(form: PetForm) -> Result<PetFields, Rejection> {
    for (field, value) in [("name", &form.name), ("animal_type", &form.animal_type)] {
        let len = value.chars().count();
        if len == 0 || len > MAX_TEXT_LEN {
            return Err(reject(
                StatusCode::BAD_REQUEST,
                &format!("{field} must be 1..={MAX_TEXT_LEN} characters"),
            ));
        }
    }
    let age_ok = !form.age.is_empty()
        && form.age.len() <= MAX_AGE_DIGITS
        && form.age.bytes().all(|b| b.is_ascii_digit());
    if !age_ok {
        return Err(reject(StatusCode::BAD_REQUEST, "age must be a non-negative number"));
    }
    Ok(PetFields {
        name: form.name,
        animal_type: form.animal_type,
        age: form.age,
    })
}

/// MIME type of a supported photo, sniffed from its leading bytes.
pub fn sniff_image(bytes: &[u8]) -> Option<&'static str> {
    const JPEG: &[u8] = &[0xFF, 0xD8, 0xFF];
    const PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
    if bytes.starts_with(JPEG) {
        Some("image/jpeg")
    } else if bytes.starts_with(PNG) {
        Some("image/png")
    } else {
        None
    }
}

fn photo_data_uri(photo: Option<&[u8]>) -> Result<String, Rejection> {
    let bytes = photo.ok_or_else(|| reject(StatusCode::BAD_REQUEST, "pet_photo is required"))?;
    let mime = sniff_image(bytes).ok_or_else(|| {
        reject(
            StatusCode::BAD_REQUEST,
            "unsupported image format, expected JPG, JPEG or PNG",
        )
    })?;
    let payload = base64::engine::general_purpose::STANDARD.encode(bytes);
    Ok(format!("data:{mime};base64,{payload}"))
}

/// Fields of a multipart upload: text parts by name plus the `pet_photo` part.
#[derive(Default)]
struct Upload {
    text: HashMap<String, String>,
    photo: Option<Vec<u8>>,
}

impl Upload {
    fn remove_text(&mut self, name: &str) -> Result<String, Rejection> {
        self.text
            .remove(name)
            .ok_or_else(|| reject(StatusCode::BAD_REQUEST, &format!("{name} is required")))
    }
}

async fn read_upload(mut multipart: Multipart) -> Result<Upload, Rejection> {
    let bad_request = |e: axum::extract::multipart::MultipartError| {
        reject(StatusCode::BAD_REQUEST, &e.body_text())
    };
    let mut upload = Upload::default();
    while let Some(field) = multipart.next_field().await.map_err(bad_request)? {
        let name = field.name().unwrap_or_default().to_string();
        if name == "pet_photo" {
            upload.photo = Some(field.bytes().await.map_err(bad_request)?.to_vec());
        } else {
            let value = field.text().await.map_err(bad_request)?;
            upload.text.insert(name, value);
        }
    }
    Ok(upload)
}
