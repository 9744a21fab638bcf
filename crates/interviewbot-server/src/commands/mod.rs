pub mod history;
pub mod serve;
