/// API route handlers
///
/// - `health`: Health check endpoint
/// - `todos`: Todo CRUD endpoints

pub mod health;
pub mod todos;
