//! API response envelopes shared by all feature routes

pub mod response;
