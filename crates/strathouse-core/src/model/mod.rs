pub mod category;
pub mod config_entry;
pub mod house;
pub mod part;

pub use category::Category;
pub use config_entry::ConfigEntry;
pub use house::{House, HouseType};
pub use part::{Part, PartInfo, DEFAULT_ATTRIBUTE};
