//! Domain logic, independent of any provider or host application

pub mod communication;
