pub mod cli;
pub mod modules;
pub mod printer;
pub mod prompt;
