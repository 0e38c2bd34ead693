mod admin;
pub mod fixtures;
mod helpers;
mod mocks;
