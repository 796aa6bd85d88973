pub mod controller;
pub mod repository;
