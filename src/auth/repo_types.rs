use serde::{Deserialize, Serialize};

/// User record in the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub nombres: String,
    pub apellidos: String,
    pub dni: String,
    pub email: String,
    #[serde(rename = "password")]
    pub password_hash: String, // Argon2 PHC string, never the plaintext
}

/// User fields before an id is assigned.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub nombres: String,
    pub apellidos: String,
    pub dni: String,
    pub email: String,
    pub password_hash: String,
}

/// Public part of the user returned to the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicUser {
    pub id: u64,
    pub nombres: String,
    pub apellidos: String,
    pub dni: String,
    pub email: String,
}

impl From<&User> for PublicUser {
    fn from(u: &User) -> Self {
        Self {
            id: u.id,
            nombres: u.nombres.clone(),
            apellidos: u.apellidos.clone(),
            dni: u.dni.clone(),
            email: u.email.clone(),
        }
    }
}
