//! Stateless request builder and response parser for the PetFriends API.
//!
//! # Design
//! `PetFriendsClient` holds a `base_url` and, optionally, a fixed multipart
//! boundary. Each operation is split into a
//! `build_*` method that produces an `HttpRequest` and a `parse_*` method
//! that turns an `HttpResponse` into an `ApiResponse`. Parsing never fails:
//! the status code always survives, and bodies that do not match the expected
//! shape are kept as raw text.

use url::form_urlencoded;

use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::multipart::MultipartForm;
use crate::response::ApiResponse;
use crate::types::{AuthKey, Pet, PetFields, PetList, PhotoFile};

const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// Synchronous, stateless client for the PetFriends API.
#[derive(Debug, Clone)]
pub struct PetFriendsClient {
    base_url: String,
    boundary: Option<String>,
}

impl PetFriendsClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            boundary: None,
        }
    }

    /// Use `boundary` for every multipart body instead of a random one, so
    /// photo uploads are byte-for-byte reproducible.
    pub fn with_boundary(mut self, boundary: impl Into<String>) -> Self {
        self.boundary = Some(boundary.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET /api/key` with the credentials passed as headers, unvalidated.
    pub fn build_get_api_key(&self, email: &str, password: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url: format!("{}/api/key", self.base_url),
            headers: vec![
                ("email".to_string(), email.to_string()),
                ("password".to_string(), password.to_string()),
            ],
            body: None,
        }
    }

    /// `GET /api/pets?filter=...`. The filter is sent even when empty.
    pub fn build_list_pets(&self, auth_key: &AuthKey, filter: &str) -> HttpRequest {
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair("filter", filter)
            .finish();
        HttpRequest {
            method: HttpMethod::Get,
            url: format!("{}/api/pets?{query}", self.base_url),
            headers: vec![auth_header(auth_key)],
            body: None,
        }
    }

    pub fn build_add_new_pet_simple(&self, auth_key: &AuthKey, fields: &PetFields) -> HttpRequest {
        form_request(
            HttpMethod::Post,
            format!("{}/api/create_pet_simple", self.base_url),
            auth_key,
            fields,
        )
    }

    pub fn build_add_new_pet(
        &self,
        auth_key: &AuthKey,
        fields: &PetFields,
        photo: &PhotoFile,
    ) -> HttpRequest {
        let form = fields
            .form_pairs()
            .iter()
            .fold(self.multipart(), |form, (name, value)| form.text(name, value))
            .file("pet_photo", photo);
        multipart_request(format!("{}/api/pets", self.base_url), auth_key, form)
    }

    pub fn build_add_photo_of_pet(
        &self,
        auth_key: &AuthKey,
        pet_id: &str,
        photo: &PhotoFile,
    ) -> HttpRequest {
        let form = self.multipart().file("pet_photo", photo);
        multipart_request(
            format!("{}/api/pets/set_photo/{pet_id}", self.base_url),
            auth_key,
            form,
        )
    }

    pub fn build_update_pet_info(
        &self,
        auth_key: &AuthKey,
        pet_id: &str,
        fields: &PetFields,
    ) -> HttpRequest {
        form_request(
            HttpMethod::Put,
            format!("{}/api/pets/{pet_id}", self.base_url),
            auth_key,
            fields,
        )
    }

    pub fn build_delete_pet(&self, auth_key: &AuthKey, pet_id: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Delete,
            url: format!("{}/api/pets/{pet_id}", self.base_url),
            headers: vec![auth_header(auth_key)],
            body: None,
        }
    }

    fn multipart(&self) -> MultipartForm {
        match &self.boundary {
            Some(boundary) => MultipartForm::with_boundary(boundary.as_str()),
            None => MultipartForm::new(),
        }
    }

    pub fn parse_get_api_key(&self, response: HttpResponse) -> ApiResponse<AuthKey> {
        ApiResponse::from_http(response)
    }

    pub fn parse_list_pets(&self, response: HttpResponse) -> ApiResponse<PetList> {
        ApiResponse::from_http(response)
    }

    /// Shared by create, photo upload and update: all answer with a pet.
    pub fn parse_pet(&self, response: HttpResponse) -> ApiResponse<Pet> {
        ApiResponse::from_http(response)
    }

    /// Deletion usually answers with an empty body, which stays `Raw("")`.
    pub fn parse_delete_pet(&self, response: HttpResponse) -> ApiResponse<serde_json::Value> {
        ApiResponse::from_http(response)
    }
}

fn auth_header(auth_key: &AuthKey) -> (String, String) {
    ("auth_key".to_string(), auth_key.as_str().to_string())
}

fn form_request(method: HttpMethod, url: String, auth_key: &AuthKey, fields: &PetFields) -> HttpRequest {
    let body = form_urlencoded::Serializer::new(String::new())
        .extend_pairs(fields.form_pairs())
        .finish();
    HttpRequest {
        method,
        url,
        headers: vec![
            auth_header(auth_key),
            ("content-type".to_string(), FORM_URLENCODED.to_string()),
        ],
        body: Some(body.into_bytes()),
    }
}

fn multipart_request(url: String, auth_key: &AuthKey, form: MultipartForm) -> HttpRequest {
    let (content_type, body) = form.finish();
    HttpRequest {
        method: HttpMethod::Post,
        url,
        headers: vec![auth_header(auth_key), ("content-type".to_string(), content_type)],
        body: Some(body),
    }
}
