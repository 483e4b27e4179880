pub mod mqtt;
pub mod pulse;
