//! Route handlers. Thin: decode the request, call `ContactsPort`, encode the result.

use super::error::ApiError;
use crate::domain::validation::ContactInput;
use crate::domain::{Contact, ContactFilter, ContactView};
use crate::ports::ContactsPort;
use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde_json::{Value, json};
use std::sync::Arc;

pub type AppState = Arc<dyn ContactsPort>;

/// Unparseable ids can never match a stored contact.
fn parse_id(raw: &str) -> Result<i64, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::not_found("Contact not found"))
}

fn body(payload: Result<Json<ContactInput>, JsonRejection>) -> Result<ContactInput, ApiError> {
    payload
        .map(|Json(input)| input)
        .map_err(|rejection| ApiError::bad_request(vec![rejection.body_text()]))
}

fn filter(
    query: Result<Query<ContactFilter>, QueryRejection>,
) -> Result<ContactFilter, ApiError> {
    query
        .map(|Query(filter)| filter)
        .map_err(|rejection| ApiError::bad_request(vec![rejection.body_text()]))
}

pub async fn create_contact(
    State(contacts): State<AppState>,
    payload: Result<Json<ContactInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Contact>), ApiError> {
    let contact = contacts.create(body(payload)?).await?;
    Ok((StatusCode::CREATED, Json(contact)))
}

pub async fn list_contacts(
    State(contacts): State<AppState>,
    query: Result<Query<ContactFilter>, QueryRejection>,
) -> Result<Json<Vec<ContactView>>, ApiError> {
    Ok(Json(contacts.list(filter(query)?).await?))
}

pub async fn get_contact(
    State(contacts): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ContactView>, ApiError> {
    Ok(Json(contacts.get(parse_id(&id)?).await?))
}

pub async fn update_contact(
    State(contacts): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<ContactInput>, JsonRejection>,
) -> Result<Json<Contact>, ApiError> {
    let id = parse_id(&id)?;
    Ok(Json(contacts.update(id, body(payload)?).await?))
}

pub async fn delete_contact(
    State(contacts): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    contacts.delete(parse_id(&id)?).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn health() -> Json<Value> {
    Json(json!({ "ok": true }))
}

pub async fn route_not_found() -> ApiError {
    ApiError::not_found("Route not found")
}
