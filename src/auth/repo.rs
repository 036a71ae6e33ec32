use crate::auth::repo_types::{NewUser, User};
use crate::store::{next_id, JsonStore};

impl User {
    /// Find a user by email.
    pub async fn find_by_email(store: &JsonStore, email: &str) -> Option<User> {
        store
            .read()
            .await
            .usuarios
            .into_iter()
            .find(|u| u.email == email)
    }

    /// Find a user by national id.
    pub async fn find_by_dni(store: &JsonStore, dni: &str) -> Option<User> {
        store.read().await.usuarios.into_iter().find(|u| u.dni == dni)
    }

    /// Append a new user with the next free id. Uniqueness is the caller's job.
    pub async fn create(store: &JsonStore, new: NewUser) -> anyhow::Result<User> {
        store
            .update(|db| {
                let user = User {
                    id: next_id(db.usuarios.iter().map(|u| u.id)),
                    nombres: new.nombres,
                    apellidos: new.apellidos,
                    dni: new.dni,
                    email: new.email,
                    password_hash: new.password_hash,
                };
                db.usuarios.push(user.clone());
                Ok(user)
            })
            .await
    }
}
