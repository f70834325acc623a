pub mod health;
pub mod meta;
pub mod responses;
pub mod tournaments;
pub mod user_matches;
pub mod user_tournaments;
