pub mod house;
pub mod part;
