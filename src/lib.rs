pub mod codes;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod rechecks;
pub mod registers;
pub mod reports;
pub mod routes;
pub mod schema;
pub mod state;
pub mod status;
pub mod store;

pub mod utils {
    pub mod json;
}
