pub mod apply;
pub mod clone;
pub mod init;
