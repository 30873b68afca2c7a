// handlers/protected/mod.rs - Handlers behind the bearer-token middleware
//
// Every handler here receives the caller as `Extension<AuthUser>`.

pub mod summaries;
