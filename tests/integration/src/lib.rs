//! Growvote Integration Tests
//!
//! End-to-end scenario tests for the voting-power ledger.
//!
//! Note: Current tests are simulated against the pure ledger model and
//! don't use the actual program crate. For real integration tests with
//! solana-program-test, the program must be compiled to a .so file and
//! loaded via ProgramTest::add_program().
