pub mod interpreter;
pub mod store;

pub use interpreter::{evaluate, Interpreter, Outcome, RuntimeError};
pub use store::{Store, UndefinedVariable};
