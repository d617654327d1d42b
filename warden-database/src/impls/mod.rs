pub mod keys;
pub mod levels;
pub mod modlog;
pub mod verification;
pub mod warnings;
