pub mod payment;
pub mod resume;
pub mod session;
pub mod user;
