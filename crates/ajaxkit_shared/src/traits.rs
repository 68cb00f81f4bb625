pub mod dom;
pub mod fetch;
