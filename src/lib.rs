pub mod aligners;
pub mod cli;
pub mod commands;
pub mod strcon;
pub mod utils;
