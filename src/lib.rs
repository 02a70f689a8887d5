pub mod catalog;
pub mod client;
pub mod commands;
pub mod completer;
pub mod composite;
pub mod config;
pub mod ranker;
pub mod registry;

/// ASCII art logo for the finterm shell banner
pub const LOGO: &str = "\
   ┌─┐┬┌┐┌┌┬┐┌─┐┬─┐┌┬┐
   ├┤ ││││ │ ├┤ ├┬┘│││
   └  ┴┘└┘ ┴ └─┘┴└─┴ ┴";
