pub mod appointment_handler;

pub use appointment_handler::{
    __path_convert_appointment, __path_create_appointment, __path_delete_appointment,
    __path_get_appointment, __path_list_appointments, __path_update_appointment,
    __path_update_appointment_status, convert_appointment, create_appointment,
    delete_appointment, get_appointment, list_appointments, update_appointment,
    update_appointment_status,
};
