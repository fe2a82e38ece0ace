pub mod constants;
pub mod shop_state;
pub mod snapshot;
pub mod speed;
