use serde::{Deserialize, Serialize};

/// Request body for AuthenticateUser (registration).
#[derive(Debug, Deserialize)]
pub struct AuthenticationRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AuthenticationResponse {
    pub token: String,
}

/// Query string for GetUserDetails.
#[derive(Debug, Deserialize)]
pub struct UserDetailsRequest {
    pub token: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserDetailsResponse {
    pub name: String,
    pub age: i32,
}

/// Request body for SaveUserDetails. Overwrites both fields.
#[derive(Debug, Deserialize)]
pub struct SaveUserDetailRequest {
    pub token: String,
    pub name: String,
    pub age: i32,
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserNameRequest {
    pub token: String,
    pub new_name: String,
}

/// Shared response of the two mutating operations.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SuccessResponse {
    pub success: bool,
}
