pub mod custom_semaphore;
pub mod shutdown;
