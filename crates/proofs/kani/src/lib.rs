//! Kani proof harnesses for the voting-power ledger model

#![cfg_attr(kani, feature(register_tool), register_tool(kanitool))]

pub mod adversary;

#[cfg(kani)]
pub mod generators;

#[cfg(kani)]
pub mod curve;

#[cfg(kani)]
pub mod safety;
