use std::sync::{PoisonError, RwLock};
use serde::Serialize;

#[derive(PartialEq, Debug, Clone, Serialize)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
}

#[derive(Debug)]
struct UserTable {
    next_id: u64,
    users: Vec<User>,
}

#[derive(Debug)]
pub struct UserStore {
    table: RwLock<UserTable>,
}

impl Default for UserStore {
    fn default() -> Self {
        Self {
            table: RwLock::new(UserTable {
                next_id: 1,
                users: vec![],
            }),
        }
    }
}

impl UserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_user(&self, name: String, email: String, password: String) -> User {
        let mut lock = self.table.write().unwrap_or_else(PoisonError::into_inner);
        let user = User {
            id: lock.next_id,
            name,
            email,
            password,
        };
        lock.next_id += 1;
        lock.users.push(user.clone());
        user
    }

    pub fn list_users(&self) -> Vec<User> {
        self.table.read().unwrap_or_else(PoisonError::into_inner).users.clone()
    }
}
