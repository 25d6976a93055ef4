pub mod car;
pub mod constants;
pub mod driver;
pub mod errors;
pub mod handle_session;
pub mod lap_simulator;
pub mod mistakes;
pub mod strategy;
pub mod tireset;
pub mod track;
pub mod weather;
