pub mod conversation;
pub mod pool;
pub mod profile;
