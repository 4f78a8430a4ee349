pub mod command;
pub mod settings;

pub use command::*;
pub use settings::*;
