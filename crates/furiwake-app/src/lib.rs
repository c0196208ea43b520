//! Application service layer - config and board orchestration

pub mod board_service;
pub mod config;

pub use board_service::BoardService;
pub use config::Config;
