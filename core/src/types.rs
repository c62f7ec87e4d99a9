//! Domain DTOs for the PetFriends API.
//!
//! # Design
//! These types mirror the service's JSON but are defined independently of the
//! mock-server crate; the end-to-end scenarios catch schema drift between the
//! two. Every field the client sends is a plain string and is forwarded
//! without validation.

use std::fmt;
use std::path::Path;

use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Listing filter for the caller's own pets.
pub const FILTER_MY_PETS: &str = "my_pets";

/// Listing filter for every pet on the service.
pub const FILTER_ALL: &str = "";

/// Account credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Opaque token issued by `GET /api/key`, sent as the `auth_key` header.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AuthKey {
    pub key: String,
}

impl AuthKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.key
    }
}

/// A pet record as returned by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pet {
    pub id: String,
    pub name: String,
    pub animal_type: String,
    pub age: String,
    /// `data:<mime>;base64,<payload>`, or empty when the pet has no photo.
    #[serde(default)]
    pub pet_photo: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl Pet {
    pub fn has_photo(&self) -> bool {
        !self.pet_photo.is_empty()
    }

    /// Decode `pet_photo` into raw image bytes. `Ok(None)` when the pet has
    /// no photo.
    pub fn photo_bytes(&self) -> Result<Option<Vec<u8>>, ApiError> {
        if !self.has_photo() {
            return Ok(None);
        }
        let payload = self
            .pet_photo
            .strip_prefix("data:")
            .and_then(|rest| rest.split_once(";base64,"))
            .map(|(_, payload)| payload)
            .ok_or_else(|| ApiError::InvalidPhotoData("missing data URI prefix".to_string()))?;
        base64::engine::general_purpose::STANDARD
            .decode(payload)
            .map(Some)
            .map_err(|e| ApiError::InvalidPhotoData(e.to_string()))
    }
}

/// Response of `GET /api/pets`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PetList {
    pub pets: Vec<Pet>,
}

impl PetList {
    pub fn contains(&self, pet_id: &str) -> bool {
        self.pets.iter().any(|pet| pet.id == pet_id)
    }
}

/// Editable pet fields, sent as form fields on create and update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PetFields {
    pub name: String,
    pub animal_type: String,
    pub age: String,
}

impl PetFields {
    pub fn new(name: impl Into<String>, animal_type: impl Into<String>, age: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            animal_type: animal_type.into(),
            age: age.into(),
        }
    }

    pub(crate) fn form_pairs(&self) -> [(&'static str, &str); 3] {
        [
            ("name", self.name.as_str()),
            ("animal_type", self.animal_type.as_str()),
            ("age", self.age.as_str()),
        ]
    }
}

/// A photo payload for upload. Format and size are never checked here;
/// accepting or rejecting the file is the service's call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl PhotoFile {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let content_type = content_type_for(&file_name).to_string();
        Self {
            file_name,
            content_type,
            bytes,
        }
    }

    /// Read a photo from disk. The file is closed before this returns, on
    /// success and on failure alike.
    pub fn read(path: impl AsRef<Path>) -> Result<Self, ApiError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| ApiError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "photo".to_string());
        Ok(Self::new(file_name, bytes))
    }
}

/// MIME type guessed from a file extension.
fn content_type_for(file_name: &str) -> &'static str {
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "tif" | "tiff" => "image/tiff",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pet(photo: &str) -> Pet {
        Pet {
            id: "p1".to_string(),
            name: "Barsik".to_string(),
            animal_type: "cat".to_string(),
            age: "3".to_string(),
            pet_photo: photo.to_string(),
            user_id: None,
            created_at: None,
        }
    }

    #[test]
    fn credentials_debug_hides_password() {
        let creds = Credentials::new("user@example.com", "hunter2");
        let shown = format!("{creds:?}");
        assert!(shown.contains("user@example.com"));
        assert!(!shown.contains("hunter2"));
    }

    #[test]
    fn pet_deserializes_without_optional_fields() {
        let pet: Pet =
            serde_json::from_str(r#"{"id":"1","name":"Rex","animal_type":"dog","age":"4"}"#).unwrap();
        assert_eq!(pet.name, "Rex");
        assert!(!pet.has_photo());
        assert!(pet.user_id.is_none());
    }

    #[test]
    fn photo_bytes_decodes_data_uri() {
        let pet = pet("data:image/png;base64,iVBORw==");
        let bytes = pet.photo_bytes().unwrap().unwrap();
        assert_eq!(bytes, vec![0x89, b'P', b'N', b'G']);
    }

    #[test]
    fn photo_bytes_none_without_photo() {
        assert!(pet("").photo_bytes().unwrap().is_none());
    }

    #[test]
    fn photo_bytes_rejects_plain_string() {
        let err = pet("not a data uri").photo_bytes().unwrap_err();
        assert!(matches!(err, ApiError::InvalidPhotoData(_)));
    }

    #[test]
    fn content_type_follows_extension() {
        assert_eq!(content_type_for("photo.JPG"), "image/jpeg");
        assert_eq!(content_type_for("photo.jpeg"), "image/jpeg");
        assert_eq!(content_type_for("dog.png"), "image/png");
        assert_eq!(content_type_for("cat.tiff"), "image/tiff");
        assert_eq!(content_type_for("notes"), "application/octet-stream");
    }

    #[test]
    fn read_missing_photo_is_io_error() {
        let err = PhotoFile::read("/definitely/not/here.jpg").unwrap_err();
        assert!(matches!(err, ApiError::Io { .. }));
    }

    #[test]
    fn pet_list_contains_by_id() {
        let list = PetList { pets: vec![pet("")] };
        assert!(list.contains("p1"));
        assert!(!list.contains("p2"));
    }
}
