pub mod blog;
pub mod comments;
pub mod reports;
pub mod locks;
pub mod shared;
