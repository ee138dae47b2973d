// handlers/mod.rs - HTTP handlers
//
// income  - /api/income CRUD (update/delete guarded by the ownership gate)
// system  - / and /health
pub mod income;
pub mod system;
