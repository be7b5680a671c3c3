pub mod cell;
pub mod character;
pub mod collision;
pub mod config;
pub mod constants;
pub mod io;
pub mod maze;
pub mod quest;
pub mod session;
pub mod snapshot;
