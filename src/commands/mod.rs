pub mod ip;
pub mod ssh;
