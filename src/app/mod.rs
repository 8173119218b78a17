pub mod events;
pub mod favorites;
pub mod input;
pub mod settings;
pub mod state;
