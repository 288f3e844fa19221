//! HTTP API: routing and request/response mapping around the KRA eTIMS service.

pub mod app;
