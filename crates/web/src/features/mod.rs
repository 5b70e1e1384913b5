pub mod activity;
pub mod admin;
pub mod auth;
pub mod profile;
pub mod proofs;
pub mod teams;
