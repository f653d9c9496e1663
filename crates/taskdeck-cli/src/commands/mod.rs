pub mod action;
pub mod board;
pub mod calendar;
pub mod config;
pub mod io;
pub mod plan;
