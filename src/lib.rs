pub mod command;
pub mod config;
pub mod git;
pub mod github;
pub mod publisher;
pub mod registry;
pub mod report;
pub mod resolver;
pub mod runner;
pub mod scanner;
pub mod types;
pub mod updater;

#[cfg(test)]
mod tests;
