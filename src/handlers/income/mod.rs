pub mod create;
pub mod delete;
pub mod list;
pub mod update;

// Re-export handler functions for use in routing
pub use create::income_create;
pub use delete::income_delete;
pub use list::income_list;
pub use update::income_update;
