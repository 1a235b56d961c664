//! Route handlers organized by domain.

pub mod health;
pub mod unzip;
pub mod upload;
