pub mod entity_handler;

pub use entity_handler::{
    energy_equipment, heating_equipment, keys, meters, other_equipment, private_areas, rooms,
};
