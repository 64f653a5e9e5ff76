#![allow(dead_code)]

use scylla_db::models::customer::CreateCustomer;
use scylla_db::models::user::CreateUser;

pub fn new_user(username: &str) -> CreateUser {
    CreateUser {
        username: username.to_string(),
        email: format!("{username}@test.com"),
        password_hash: "$argon2id$not-a-real-hash".to_string(),
    }
}

pub fn new_customer(username: &str) -> CreateCustomer {
    CreateCustomer {
        username: username.to_string(),
        email: format!("{username}@shop.test"),
        phone: "555-0100".to_string(),
        address: format!("{username} street 1"),
    }
}
