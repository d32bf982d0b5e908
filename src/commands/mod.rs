pub mod consumers;
pub mod export;
