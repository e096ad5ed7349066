#![allow(clippy::unwrap_used, reason = "tests use unwrap for brevity")]

mod interpreter_tests;
