pub mod check_site;
pub mod proxy;
pub mod status;
