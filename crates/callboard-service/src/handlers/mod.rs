//! API handlers.

pub mod calls;
pub mod health;
pub mod leaderboard;
pub mod likes;
pub mod profile;
