pub mod barber;
pub mod customer;
pub mod generator;
pub mod handler;
pub mod input_handler;
pub mod renderer;
pub mod shop;
