//! PDA derivation helpers

use pinocchio::pubkey::{find_program_address, Pubkey};

/// Global state PDA: ["core"]
pub fn derive_core_pda(program_id: &Pubkey) -> (Pubkey, u8) {
    find_program_address(&[b"core"], program_id)
}

/// User ledger PDA: ["user", owner]
pub fn derive_user_pda(owner: &Pubkey, program_id: &Pubkey) -> (Pubkey, u8) {
    find_program_address(&[b"user", owner.as_ref()], program_id)
}
