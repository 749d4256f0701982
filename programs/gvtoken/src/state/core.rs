//! Global state: governance, aggregates, and the active-vault registry

use growvote_common::{
    checked_add, GvTokenError, MAX_VAULTS, MIN_WITHDRAWAL_DELAY, WEEK,
};
use pinocchio::pubkey::Pubkey;

/// Active-vault registry entry
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct VaultEntry {
    /// Risk-vault address
    pub vault: Pubkey,
    /// Active flag; deactivated vaults stay in the table
    pub active: bool,
    /// Padding
    pub _padding: [u8; 7],
}

/// Global program state
/// PDA: ["core"]
#[repr(C)]
pub struct CoreState {
    /// Governance authority for privileged setters
    pub governance: Pubkey,
    /// External rewards-pot operator; co-signs reward claims
    pub pot_authority: Pubkey,
    /// Legacy-proof verifier; co-signs early-start deposits
    pub proof_authority: Pubkey,
    /// Merkle root for legacy-holder proofs
    pub proof_root: [u8; 32],
    /// Sum of all live deposit amounts across all users
    pub total_deposited: u128,
    /// Derived voting-power total; governance-adjustable within
    /// [total_deposited, 2 * total_deposited]
    pub total_supply: u128,
    /// Voting power currently diverted to the rewards pot, all users
    pub total_diverted: u128,
    /// Two-phase withdrawal delay in seconds
    pub withdrawal_delay: u32,
    /// Number of registry entries in use
    pub vault_count: u16,
    /// Bump seed
    pub bump: u8,
    /// Padding
    pub _padding: [u8; 9],
    /// Registered vaults
    pub vaults: [VaultEntry; MAX_VAULTS],
}

impl CoreState {
    pub const LEN: usize = core::mem::size_of::<Self>();

    /// Initialize in-place (avoids a large stack temporary on BPF)
    pub fn initialize_in_place(
        &mut self,
        governance: Pubkey,
        pot_authority: Pubkey,
        proof_authority: Pubkey,
        bump: u8,
    ) {
        self.governance = governance;
        self.pot_authority = pot_authority;
        self.proof_authority = proof_authority;
        self.proof_root = [0; 32];
        self.total_deposited = 0;
        self.total_supply = 0;
        self.total_diverted = 0;
        self.withdrawal_delay = MIN_WITHDRAWAL_DELAY;
        self.vault_count = 0;
        self.bump = bump;
        self._padding = [0; 9];
        unsafe {
            core::ptr::write_bytes(self.vaults.as_mut_ptr(), 0, MAX_VAULTS);
        }
    }

    /// Stack-constructed state (tests only)
    #[cfg(all(test, not(target_os = "solana")))]
    pub fn new(
        governance: Pubkey,
        pot_authority: Pubkey,
        proof_authority: Pubkey,
        bump: u8,
    ) -> Self {
        Self {
            governance,
            pot_authority,
            proof_authority,
            proof_root: [0; 32],
            total_deposited: 0,
            total_supply: 0,
            total_diverted: 0,
            withdrawal_delay: MIN_WITHDRAWAL_DELAY,
            vault_count: 0,
            bump,
            _padding: [0; 9],
            vaults: [VaultEntry {
                vault: Pubkey::default(),
                active: false,
                _padding: [0; 7],
            }; MAX_VAULTS],
        }
    }

    /// Whether `vault` is registered and active
    pub fn is_active_vault(&self, vault: &Pubkey) -> bool {
        self.find_vault(vault)
            .map(|idx| self.vaults[idx].active)
            .unwrap_or(false)
    }

    fn find_vault(&self, vault: &Pubkey) -> Option<usize> {
        (0..self.vault_count as usize).find(|&i| &self.vaults[i].vault == vault)
    }

    /// Register a vault, or reactivate a previously deactivated one
    pub fn register_vault(&mut self, vault: Pubkey) -> Result<(), GvTokenError> {
        if let Some(idx) = self.find_vault(&vault) {
            self.vaults[idx].active = true;
            return Ok(());
        }
        if (self.vault_count as usize) >= MAX_VAULTS {
            return Err(GvTokenError::CapacityExhausted);
        }
        let idx = self.vault_count as usize;
        self.vaults[idx] = VaultEntry {
            vault,
            active: true,
            _padding: [0; 7],
        };
        self.vault_count += 1;
        Ok(())
    }

    /// Deactivate a registered vault
    pub fn deactivate_vault(&mut self, vault: &Pubkey) -> Result<(), GvTokenError> {
        let idx = self
            .find_vault(vault)
            .ok_or(GvTokenError::InactiveVault)?;
        self.vaults[idx].active = false;
        Ok(())
    }

    /// Set the withdrawal delay, rounded down to whole weeks; rejects
    /// anything below the two-week minimum after rounding
    pub fn set_withdrawal_delay(&mut self, delay: u32) -> Result<(), GvTokenError> {
        let rounded = delay - delay % WEEK;
        if rounded < MIN_WITHDRAWAL_DELAY {
            return Err(GvTokenError::DelayTooShort);
        }
        self.withdrawal_delay = rounded;
        Ok(())
    }

    /// Set the legacy-proof merkle root
    pub fn set_proof_root(&mut self, root: [u8; 32]) {
        self.proof_root = root;
    }

    /// Governance supply adjustment: strictly increasing and within
    /// [total_deposited, 2 * total_deposited]
    pub fn adjust_total_supply(&mut self, new_supply: u128) -> Result<(), GvTokenError> {
        if new_supply <= self.total_supply {
            return Err(GvTokenError::SupplyOutOfRange);
        }
        if new_supply < self.total_deposited {
            return Err(GvTokenError::SupplyOutOfRange);
        }
        let ceiling = self
            .total_deposited
            .checked_mul(2)
            .unwrap_or(u128::MAX);
        if new_supply > ceiling {
            return Err(GvTokenError::SupplyOutOfRange);
        }
        self.total_supply = new_supply;
        Ok(())
    }

    /// Record a deposit in the global aggregates
    pub fn note_deposit(&mut self, amount: u128) -> Result<(), GvTokenError> {
        self.total_deposited = checked_add(self.total_deposited, amount)?;
        self.total_supply = checked_add(self.total_supply, amount)?;
        Ok(())
    }

    /// Record a withdrawal: principal leaves the deposited total and the
    /// converted voting-power amount leaves the supply.
    ///
    /// The supply is clamped at zero rather than underflowing, and zeroed
    /// outright when nothing remains deposited system-wide; aggregate
    /// drift must never make a withdrawal fail.
    pub fn note_withdrawal(
        &mut self,
        amount: u128,
        gv_amount: u128,
    ) -> Result<(), GvTokenError> {
        self.total_deposited = self
            .total_deposited
            .checked_sub(amount)
            .ok_or(GvTokenError::InsufficientDeposits)?;
        if self.total_deposited == 0 {
            self.total_supply = 0;
        } else {
            self.total_supply = self.total_supply.saturating_sub(gv_amount);
        }
        Ok(())
    }

    /// Record voting power entering the pot
    pub fn note_pot_deposit(&mut self, amount: u128) -> Result<(), GvTokenError> {
        self.total_diverted = checked_add(self.total_diverted, amount)?;
        Ok(())
    }

    /// Record voting power leaving the pot
    pub fn note_pot_withdrawal(&mut self, amount: u128) -> Result<(), GvTokenError> {
        self.total_diverted = self
            .total_diverted
            .checked_sub(amount)
            .ok_or(GvTokenError::InsufficientBribed)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fresh() -> CoreState {
        CoreState::new(
            Pubkey::from([1; 32]),
            Pubkey::from([2; 32]),
            Pubkey::from([3; 32]),
            255,
        )
    }

    #[test]
    fn test_vault_registry_lifecycle() {
        let mut core = fresh();
        let vault = Pubkey::from([9; 32]);

        assert!(!core.is_active_vault(&vault));
        core.register_vault(vault).unwrap();
        assert!(core.is_active_vault(&vault));
        assert_eq!(core.vault_count, 1);

        core.deactivate_vault(&vault).unwrap();
        assert!(!core.is_active_vault(&vault));

        // Reactivation reuses the slot
        core.register_vault(vault).unwrap();
        assert!(core.is_active_vault(&vault));
        assert_eq!(core.vault_count, 1);

        let unknown = Pubkey::from([8; 32]);
        assert_eq!(
            core.deactivate_vault(&unknown),
            Err(GvTokenError::InactiveVault)
        );
    }

    #[test]
    fn test_vault_registry_capacity() {
        let mut core = fresh();
        for i in 0..MAX_VAULTS {
            core.register_vault(Pubkey::from([i as u8 + 1; 32])).unwrap();
        }
        assert_eq!(
            core.register_vault(Pubkey::from([200; 32])),
            Err(GvTokenError::CapacityExhausted)
        );
    }

    #[test]
    fn test_withdrawal_delay_rounds_to_whole_weeks() {
        let mut core = fresh();

        core.set_withdrawal_delay(WEEK * 3 + 12345).unwrap();
        assert_eq!(core.withdrawal_delay, WEEK * 3);

        // Two weeks exactly is the floor
        core.set_withdrawal_delay(WEEK * 2).unwrap();
        assert_eq!(core.withdrawal_delay, WEEK * 2);

        // Thirteen days rounds below the minimum
        assert_eq!(
            core.set_withdrawal_delay(WEEK * 2 - 1),
            Err(GvTokenError::DelayTooShort)
        );
        assert_eq!(core.withdrawal_delay, WEEK * 2);
    }

    #[test]
    fn test_supply_adjustment_band() {
        let mut core = fresh();
        core.note_deposit(1000).unwrap();
        assert_eq!(core.total_supply, 1000);

        // Below deposited total
        core.total_supply = 900;
        assert_eq!(
            core.adjust_total_supply(950),
            Err(GvTokenError::SupplyOutOfRange)
        );
        core.total_supply = 1000;

        // More than double the deposited total
        assert_eq!(
            core.adjust_total_supply(2001),
            Err(GvTokenError::SupplyOutOfRange)
        );

        // Not strictly increasing
        assert_eq!(
            core.adjust_total_supply(1000),
            Err(GvTokenError::SupplyOutOfRange)
        );

        // In band and increasing
        core.adjust_total_supply(1500).unwrap();
        assert_eq!(core.total_supply, 1500);
        core.adjust_total_supply(2000).unwrap();
        assert_eq!(core.total_supply, 2000);
    }

    #[test]
    fn test_withdrawal_supply_clamp() {
        let mut core = fresh();
        core.note_deposit(100).unwrap();

        // Converted amount exceeds the recorded supply: clamp, don't
        // underflow
        core.total_supply = 50;
        core.note_withdrawal(40, 80).unwrap();
        assert_eq!(core.total_deposited, 60);
        assert_eq!(core.total_supply, 0);

        // Last withdrawal zeroes the supply outright
        core.total_supply = 500;
        core.note_withdrawal(60, 10).unwrap();
        assert_eq!(core.total_deposited, 0);
        assert_eq!(core.total_supply, 0);
    }

    #[test]
    fn test_pot_totals() {
        let mut core = fresh();
        core.note_pot_deposit(70).unwrap();
        core.note_pot_withdrawal(30).unwrap();
        assert_eq!(core.total_diverted, 40);
        assert_eq!(
            core.note_pot_withdrawal(41),
            Err(GvTokenError::InsufficientBribed)
        );
    }
}
