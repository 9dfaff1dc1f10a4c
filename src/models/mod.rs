pub mod object_id;
pub mod todo;
pub mod user;

pub use object_id::{InvalidObjectId, ObjectId};
pub use todo::{Todo, TodoInput, TodoStatus, TodoUpdate};
pub use user::{NewUser, User, UserCredentials};
