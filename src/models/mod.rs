pub mod session;
pub mod todo;
pub mod user;

pub use session::Session;
pub use todo::{NewTodo, Todo, TodoUpdate};
pub use user::{Credentials, SignInRequest, User};
