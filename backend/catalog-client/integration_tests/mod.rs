mod client;
mod errors;
mod executor;
mod helpers;
