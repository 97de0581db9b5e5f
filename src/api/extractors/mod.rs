pub mod auth;
pub mod invite_token;
pub mod validated_json;
