pub mod config;

pub mod db;

pub mod rest;

pub mod openapi;

pub mod error_convert;

pub mod telemetry;

pub mod health;

pub mod auth;

pub mod mailgun;

pub mod outbound;

// Accordia domain modules
pub mod repo;

pub mod report;

pub mod typst;
