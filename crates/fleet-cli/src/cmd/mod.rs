pub mod login;
pub mod status;
pub mod ui;
