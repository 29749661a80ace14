pub mod auth;
pub mod company;
pub mod employee;
pub mod attendance;
pub mod absence;
pub mod history;
pub mod calendar;
pub mod upload;
