//! # Ambassador store server
//! This crate hosts the HTTP server for the ambassador referral store. It is responsible for:
//! * Checkout: creating orders from referral links and opening hosted payment sessions on Stripe.
//! * Settlement: completing orders once the buyer has paid, crediting the ambassador and sending the notification
//!   emails.
//! * The admin and ambassador views: orders, ambassador revenue, the leaderboard and the product catalog.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! The server exposes the following routes:
//! * `/health`: A health check route that returns a 200 OK response.
//! * `/api/checkout/orders` and `/api/checkout/orders/confirm`: checkout and payment confirmation.
//! * `/api/admin/*`: orders, ambassadors and catalog maintenance.
//! * `/api/ambassador/*`: the cached product listing and the leaderboard.
//! * `/api/register` and `/api/users/info`: registration and profile updates.
pub mod auth;
pub mod cache_backend;
pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod integrations;
pub mod notifications;
pub mod routes;
pub mod server;

#[cfg(test)]
mod endpoint_tests;
