pub mod firebase;
pub mod redis;
pub mod settings;
