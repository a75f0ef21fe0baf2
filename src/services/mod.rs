/*
 * Responsibility
 * - handler から呼ばれるユースケース層
 * - auth (token codec / identity 契約), password, user, post
 */
pub mod auth;
pub mod password;
pub mod post;
pub mod user;
