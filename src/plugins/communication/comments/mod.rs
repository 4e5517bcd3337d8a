pub mod models;
pub mod repo;
pub mod service;
pub mod handlers;
pub mod plugin;

pub use models::{Comment, CommentCreate, CommentUpdate};
pub use service::CommentService;
pub use plugin::CommentsPlugin;
