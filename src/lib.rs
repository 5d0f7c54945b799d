//! Boards - discussion boards for the web
//!
//! A forum where registered users open topics inside boards, reply to them
//! and edit their own posts, with e-mail based password recovery.

pub mod auth;
pub mod board;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod mail;
pub mod markdown;
pub mod web;

pub use auth::{
    authenticate, hash_password, register, validate_password, verify_password,
    PasswordError, PasswordResetTokenGenerator, RegistrationError, RegistrationRequest,
    SessionError, SessionManager, ValidationError,
};
pub use board::{Board, BoardService, Post, Topic};
pub use config::Config;
pub use db::{Database, NewUser, User, UserRepository, UserUpdate};
pub use error::{BoardsError, Result};
