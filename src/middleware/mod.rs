/*
 * Responsibility
 * - middleware の公開インターフェース (re-export)
 * - auth (Bearer → AuthCtx), cors, http (request id / trace / limit / timeout), security headers
 */
pub mod auth;
pub mod cors;
pub mod http;
pub mod security_headers;
