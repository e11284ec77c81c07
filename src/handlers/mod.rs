// handlers/mod.rs
//
// Public: service description and health (no credential).
// Protected: task CRUD, every route behind `require_identity`.

pub mod system;
pub mod tasks;
