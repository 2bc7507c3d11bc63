mod auth;
mod payments;
