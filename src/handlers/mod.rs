//! HTTP handlers: one store call per request, `{ "data": ... }` out.

pub mod actors;
pub mod home;
pub mod movies;
