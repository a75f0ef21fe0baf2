/*
 * Responsibility
 * - crate のモジュール構成を公開する
 * - bin (main.rs) と tests/ の両方から同じ Router を組み立てられるようにする
 */
pub mod api;
pub mod app;
pub mod config;
pub mod domain;
pub mod error;
pub mod middleware;
pub mod repos;
pub mod services;
pub mod state;
