use crate::domain::models::event::EventStatus;
use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;
use validator::{Validate, ValidationError};

fn invalid(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

fn validate_date(value: &str) -> Result<(), ValidationError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(|_| ())
        .map_err(|_| invalid("date", "must be a date formatted YYYY-MM-DD"))
}

fn validate_time(value: &str) -> Result<(), ValidationError> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .map(|_| ())
        .map_err(|_| invalid("time", "must be a time formatted HH:MM"))
}

fn validate_status(value: &str) -> Result<(), ValidationError> {
    value.parse::<EventStatus>()
        .map(|_| ())
        .map_err(|_| invalid("status", "must be one of draft, public, published, private, cancelled"))
}

fn default_status() -> String {
    EventStatus::Draft.as_str().to_string()
}

#[derive(Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(length(min = 3, max = 64, message = "must be between 3 and 64 characters"))]
    pub username: String,
    #[validate(length(min = 8, message = "must be at least 8 characters"))]
    pub password: String,
}

#[derive(Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "is required"))]
    pub password: String,
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpsertProfileRequest {
    #[validate(length(min = 1, max = 120, message = "must be between 1 and 120 characters"))]
    pub display_name: String,
    #[validate(length(max = 2000, message = "must be at most 2000 characters"))]
    pub bio: Option<String>,
    #[validate(url(message = "must be a valid URL"))]
    pub avatar_url: Option<String>,
    #[validate(url(message = "must be a valid URL"))]
    pub website: Option<String>,
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    #[validate(length(min = 1, max = 200, message = "must be between 1 and 200 characters"))]
    pub title: String,
    #[validate(custom(function = "validate_date"))]
    pub date: String,
    #[validate(custom(function = "validate_time"))]
    pub time: String,
    #[validate(length(min = 1, message = "is required"))]
    pub location: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub agenda: String,
    #[serde(default)]
    pub qa: String,
    #[validate(url(message = "must be a valid URL"))]
    pub image_url: Option<String>,
    #[serde(default = "default_status")]
    #[validate(custom(function = "validate_status"))]
    pub status: String,
    #[serde(default)]
    pub has_tickets: bool,
    #[serde(default)]
    pub requires_tickets: bool,
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventRequest {
    #[validate(length(min = 1, max = 200, message = "must be between 1 and 200 characters"))]
    pub title: Option<String>,
    #[validate(custom(function = "validate_date"))]
    pub date: Option<String>,
    #[validate(custom(function = "validate_time"))]
    pub time: Option<String>,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub location: Option<String>,
    pub bio: Option<String>,
    pub agenda: Option<String>,
    pub qa: Option<String>,
    #[validate(url(message = "must be a valid URL"))]
    pub image_url: Option<String>,
    #[validate(custom(function = "validate_status"))]
    pub status: Option<String>,
    pub has_tickets: Option<bool>,
    pub requires_tickets: Option<bool>,
}

#[derive(Deserialize, Validate)]
pub struct CreateInviteeRequest {
    #[serde(default)]
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 200, message = "must be between 1 and 200 characters"))]
    pub name: String,
    #[serde(default)]
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    #[validate(range(min = 1, max = 10, message = "must be between 1 and 10"))]
    pub quantity: Option<i32>,
    pub invite_token: Option<String>,
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct VerifyAccessRequest {
    #[serde(default)]
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    pub invite_token: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InviteTokenQuery {
    pub invite_token: Option<String>,
}
