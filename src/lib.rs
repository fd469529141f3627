pub mod calc;
pub mod game;
pub mod handlers;
pub mod models;
