//! `PetFriends`: one method per API operation, wired to a transport.

use std::path::Path;

use tracing::debug;

use crate::client::PetFriendsClient;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::response::ApiResponse;
use crate::transport::{Transport, UreqTransport};
use crate::types::{AuthKey, Pet, PetFields, PetList, PhotoFile};

/// Blocking PetFriends API wrapper.
///
/// Holds configuration only, so one value can serve a whole test run.
/// Every method returns the response for any status code; `Err` means the
/// request could not be made or a photo could not be read.
#[derive(Debug, Clone)]
pub struct PetFriends<T = UreqTransport> {
    client: PetFriendsClient,
    transport: T,
}

impl PetFriends<UreqTransport> {
    pub fn new(base_url: &str) -> Self {
        Self::with_transport(base_url, UreqTransport::new())
    }
}

impl<T: Transport> PetFriends<T> {
    pub fn with_transport(base_url: &str, transport: T) -> Self {
        Self {
            client: PetFriendsClient::new(base_url),
            transport,
        }
    }

    pub fn client(&self) -> &PetFriendsClient {
        &self.client
    }

    pub fn get_api_key(&self, email: &str, password: &str) -> Result<ApiResponse<AuthKey>, ApiError> {
        let response = self.send(self.client.build_get_api_key(email, password))?;
        Ok(self.client.parse_get_api_key(response))
    }

    /// `filter` is passed through as given; see `FILTER_MY_PETS` and
    /// `FILTER_ALL` for the values the service accepts.
    pub fn get_list_of_pets(
        &self,
        auth_key: &AuthKey,
        filter: &str,
    ) -> Result<ApiResponse<PetList>, ApiError> {
        let response = self.send(self.client.build_list_pets(auth_key, filter))?;
        Ok(self.client.parse_list_pets(response))
    }

    pub fn add_new_pet_simple(
        &self,
        auth_key: &AuthKey,
        name: &str,
        animal_type: &str,
        age: &str,
    ) -> Result<ApiResponse<Pet>, ApiError> {
        let fields = PetFields::new(name, animal_type, age);
        let response = self.send(self.client.build_add_new_pet_simple(auth_key, &fields))?;
        Ok(self.client.parse_pet(response))
    }

    pub fn add_new_pet(
        &self,
        auth_key: &AuthKey,
        fields: &PetFields,
        photo: &PhotoFile,
    ) -> Result<ApiResponse<Pet>, ApiError> {
        let response = self.send(self.client.build_add_new_pet(auth_key, fields, photo))?;
        Ok(self.client.parse_pet(response))
    }

    /// Like `add_new_pet`, reading the photo from `photo_path` first.
    pub fn add_new_pet_from_file(
        &self,
        auth_key: &AuthKey,
        fields: &PetFields,
        photo_path: impl AsRef<Path>,
    ) -> Result<ApiResponse<Pet>, ApiError> {
        let photo = PhotoFile::read(photo_path)?;
        self.add_new_pet(auth_key, fields, &photo)
    }

    /// Add or replace the photo of `pet_id`, read from `photo_path`.
    pub fn add_photo_of_pet(
        &self,
        auth_key: &AuthKey,
        pet_id: &str,
        photo_path: impl AsRef<Path>,
    ) -> Result<ApiResponse<Pet>, ApiError> {
        let photo = PhotoFile::read(photo_path)?;
        self.set_photo(auth_key, pet_id, &photo)
    }

    pub fn set_photo(
        &self,
        auth_key: &AuthKey,
        pet_id: &str,
        photo: &PhotoFile,
    ) -> Result<ApiResponse<Pet>, ApiError> {
        let response = self.send(self.client.build_add_photo_of_pet(auth_key, pet_id, photo))?;
        Ok(self.client.parse_pet(response))
    }

    pub fn update_pet_info(
        &self,
        auth_key: &AuthKey,
        pet_id: &str,
        name: &str,
        animal_type: &str,
        age: &str,
    ) -> Result<ApiResponse<Pet>, ApiError> {
        let fields = PetFields::new(name, animal_type, age);
        let response = self.send(self.client.build_update_pet_info(auth_key, pet_id, &fields))?;
        Ok(self.client.parse_pet(response))
    }

    pub fn delete_pet(
        &self,
        auth_key: &AuthKey,
        pet_id: &str,
    ) -> Result<ApiResponse<serde_json::Value>, ApiError> {
        let response = self.send(self.client.build_delete_pet(auth_key, pet_id))?;
        Ok(self.client.parse_delete_pet(response))
    }

    fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        debug!(method = request.method.as_str(), url = %request.url, "sending request");
        let response = self.transport.execute(request)?;
        debug!(status = response.status, bytes = response.body.len(), "received response");
        Ok(response)
    }
}
