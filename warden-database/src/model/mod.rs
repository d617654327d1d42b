pub mod keys;
pub mod levels;
pub mod logs;
pub mod verification;
pub mod warnings;
