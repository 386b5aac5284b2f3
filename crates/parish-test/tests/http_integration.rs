//! End-to-end tests over the full HTTP stack with a private in-memory store per test.

mod integration;
