//! List/item persistence

mod todo_store;

pub use todo_store::TodoStore;
