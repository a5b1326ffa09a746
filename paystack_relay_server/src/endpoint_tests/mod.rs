mod helpers;
mod mocks;
mod proxies;
mod webhook;
