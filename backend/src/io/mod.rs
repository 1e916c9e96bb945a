//! # IO Module
//!
//! Interface layer exposing the backend to the presentation layer over
//! HTTP. Pure translation: JSON in, service call, JSON out. No business
//! logic lives here.

pub mod rest;
