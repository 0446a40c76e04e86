mod equipment;
mod key_set;
mod meter;
mod private_area;
mod room;

pub use equipment::{EnergyEquipment, HeatingEquipment, OtherEquipment};
pub use key_set::KeySet;
pub use meter::{MeterReading, MeterType};
pub use private_area::PrivateArea;
pub use room::RoomEntry;
