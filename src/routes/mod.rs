pub mod analyze;
pub mod email;
pub mod generate;
pub mod health;
