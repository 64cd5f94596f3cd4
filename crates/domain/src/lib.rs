pub mod errors;
pub mod todo;
pub mod view;

pub use errors::*;
pub use todo::*;
pub use view::*;
