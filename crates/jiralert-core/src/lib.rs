pub mod alert;
pub mod error;
pub mod history;
pub mod outcome;
pub mod ticket;
