//! This crate contains the code shared by the barbershop processes: the synchronization
//! primitives they rendezvous through and the model of the shop they all mutate.

pub mod customsync;
pub mod model;
