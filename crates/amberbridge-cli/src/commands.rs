pub mod evaluate;
pub mod expand;
