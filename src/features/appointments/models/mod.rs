mod appointment;

pub use appointment::{Appointment, AppointmentFields, AppointmentStatus};
