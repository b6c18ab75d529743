//! Application services.
//!
//! - [`auth`] - signup, login, OTP, and password reset
//! - [`email`] - SMTP delivery for one-time codes
//! - [`payment`] - payment gateway client and signature verification

pub mod auth;
pub mod email;
pub mod payment;
