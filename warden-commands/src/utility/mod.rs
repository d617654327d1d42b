pub mod hello;
pub mod help;
pub mod level;
pub mod ping;
pub mod warns;
