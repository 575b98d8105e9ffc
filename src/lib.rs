pub mod cfg;
pub mod cli;
pub mod completion;
pub mod loader;
pub mod output;
pub mod ports;

pub use cfg::ConfigSpec;
pub use completion::{CommandNode, CommandTree, FishGenerator, FlagSet, PreambleCommands, build_script};
pub use loader::{LoadError, TreeLoader, TreeSource};
