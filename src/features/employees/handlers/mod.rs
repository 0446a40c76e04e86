pub mod employee_handler;

pub use employee_handler::{
    __path_create_employee, __path_delete_employee, __path_get_employee, __path_list_employees,
    __path_update_employee, __path_verify_employee_password, create_employee, delete_employee,
    get_employee, list_employees, update_employee, verify_employee_password,
};
