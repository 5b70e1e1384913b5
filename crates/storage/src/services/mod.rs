pub mod accounts;
pub mod activity;
pub mod admin;
pub mod proofs;
pub mod scoring;
