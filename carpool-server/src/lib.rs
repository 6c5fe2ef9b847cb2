//! Carpool planning server.
//!
//! A web application that answers: "we are all going to the same place,
//! who should drive, and whom should they pick up?"

pub mod cache;
pub mod domain;
pub mod itinerary;
pub mod matcher;
pub mod oracle;
pub mod settings;
pub mod web;
