pub mod cli;
pub mod controller;
pub mod error;
pub mod models;
pub mod remote;
pub mod view;
