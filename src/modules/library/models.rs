use serde::{Deserialize, Serialize};
use shelf_authz::Address;

/// Request body for `addBook`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddBook {
    pub name: String,
    pub author: String,
    pub copies: u64,
}

/// Query string for `bookByName`. A missing name is treated as empty.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookByName {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwnerResponse {
    pub owner: Address,
}
