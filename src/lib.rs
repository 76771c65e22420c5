//! Anime List API Library
//!
//! This library provides a REST API for browsing anime, keeping per-user
//! anime lists, and subscribing to list changes through signed webhooks.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod links;
pub mod models;
pub mod routes;
pub mod services;
pub mod webhook;
