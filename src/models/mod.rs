//! Data models for Bookshelf

pub mod book;
pub mod user;

pub use book::{Book, BookForm};
pub use user::{User, UserForm, UserRequest};
