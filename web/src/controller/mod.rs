pub(crate) mod datastar_controller;
pub(crate) mod health_check_controller;
pub(crate) mod static_file_controller;
