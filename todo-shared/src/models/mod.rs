/// Database models for the todo service
///
/// - `todo`: Todo items, their identifier type and create/update inputs

pub mod todo;
