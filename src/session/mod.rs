pub mod channels;
pub mod manager;
pub mod traits;
