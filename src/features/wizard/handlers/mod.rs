pub mod wizard_handler;

pub use wizard_handler::{
    __path_finalize, __path_get_wizard_state, __path_next_step, __path_previous_step, finalize,
    get_wizard_state, next_step, previous_step,
};
