pub mod commands;
pub mod events;
pub mod hall_of_fame;
