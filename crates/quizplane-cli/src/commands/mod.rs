pub mod collect;
pub mod generate;
pub mod init;
pub mod plane;
pub mod score;
pub mod validate;
