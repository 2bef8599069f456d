mod user;
mod post;
mod comment;
mod reaction;

pub use user::*;
pub use post::*;
pub use comment::*;
pub use reaction::*;
