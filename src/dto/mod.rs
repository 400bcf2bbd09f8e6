pub mod auth;
pub mod cart;
pub mod catalog;
pub mod comments;
pub mod history;
pub mod navigation;
pub mod reactions;
