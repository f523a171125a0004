//! Backend implementations of the update service traits

pub mod sim;
