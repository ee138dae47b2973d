pub mod memory;
pub mod models;
pub mod postgres;
pub mod store;

pub use memory::MemoryIncomeStore;
pub use models::income::{Income, IncomePatch, NewIncome};
pub use postgres::PgIncomeStore;
pub use store::{IncomeStore, StoreError};
