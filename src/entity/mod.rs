pub mod memory;
pub mod needs;
pub mod observation;
pub mod social;
pub mod thoughts;
