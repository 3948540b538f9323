pub mod card;
pub mod message;
