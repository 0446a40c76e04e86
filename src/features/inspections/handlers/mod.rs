pub mod inspection_handler;

pub use inspection_handler::{
    __path_create_inspection, __path_delete_inspection, __path_get_inspection,
    __path_list_inspections, __path_save_signature, __path_update_inspection, create_inspection,
    delete_inspection, get_inspection, list_inspections, save_signature, update_inspection,
};
