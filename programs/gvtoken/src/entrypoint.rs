//! Program entrypoint and instruction dispatch
//!
//! The dispatcher validates accounts and parses payloads; the handlers
//! in `instructions/` carry the ledger semantics. Token legs (deposit
//! and withdrawal transfers) travel through the token program accounts
//! listed per instruction.

use pinocchio::{
    account_info::AccountInfo,
    msg,
    program_error::ProgramError,
    pubkey::Pubkey,
    sysvars::{clock::Clock, Sysvar},
    ProgramResult,
};

use crate::instructions::{
    process_adjust_total_supply, process_claim_reward, process_deactivate_vault,
    process_delegate, process_deposit, process_deposit_with_start,
    process_finalize_withdrawal, process_initialize, process_initialize_user,
    process_pot_deposit, process_pot_withdraw, process_register_vault,
    process_request_withdrawal, process_set_proof_root,
    process_set_withdrawal_delay, process_stake, process_unstake, GvInstruction,
};
use crate::state::{CoreState, UserAccount};
use growvote_common::{
    borrow_account_data_mut, validate_owner, validate_signer, validate_writable,
    GvTokenError, Payload,
};

#[cfg(feature = "bpf-entrypoint")]
pinocchio::entrypoint!(process_instruction);

pub fn process_instruction(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    instruction_data: &[u8],
) -> ProgramResult {
    if instruction_data.is_empty() {
        msg!("Error: instruction data is empty");
        return Err(GvTokenError::InvalidInstruction.into());
    }

    let instruction = GvInstruction::from_discriminator(instruction_data[0])
        .ok_or_else(|| {
            msg!("Error: unknown instruction");
            ProgramError::from(GvTokenError::InvalidInstruction)
        })?;
    let data = &instruction_data[1..];

    match instruction {
        GvInstruction::Initialize => {
            msg!("Instruction: Initialize");
            initialize_inner(program_id, accounts, data)
        }
        GvInstruction::InitializeUser => {
            msg!("Instruction: InitializeUser");
            initialize_user_inner(program_id, accounts, data)
        }
        GvInstruction::Deposit => {
            msg!("Instruction: Deposit");
            deposit_inner(program_id, accounts, data)
        }
        GvInstruction::DepositWithStart => {
            msg!("Instruction: DepositWithStart");
            deposit_with_start_inner(program_id, accounts, data)
        }
        GvInstruction::RequestWithdrawal => {
            msg!("Instruction: RequestWithdrawal");
            request_withdrawal_inner(program_id, accounts, data)
        }
        GvInstruction::FinalizeWithdrawal => {
            msg!("Instruction: FinalizeWithdrawal");
            finalize_withdrawal_inner(program_id, accounts, data)
        }
        GvInstruction::Stake => {
            msg!("Instruction: Stake");
            stake_inner(program_id, accounts, data)
        }
        GvInstruction::Unstake => {
            msg!("Instruction: Unstake");
            unstake_inner(program_id, accounts, data)
        }
        GvInstruction::DepositToPot => {
            msg!("Instruction: DepositToPot");
            pot_deposit_inner(program_id, accounts, data)
        }
        GvInstruction::WithdrawFromPot => {
            msg!("Instruction: WithdrawFromPot");
            pot_withdraw_inner(program_id, accounts, data)
        }
        GvInstruction::ClaimReward => {
            msg!("Instruction: ClaimReward");
            claim_reward_inner(program_id, accounts, data)
        }
        GvInstruction::Delegate => {
            msg!("Instruction: Delegate");
            delegate_inner(program_id, accounts, data)
        }
        GvInstruction::SetWithdrawalDelay
        | GvInstruction::SetProofRoot
        | GvInstruction::AdjustTotalSupply
        | GvInstruction::RegisterVault
        | GvInstruction::DeactivateVault => {
            msg!("Instruction: Governance");
            governance_inner(program_id, accounts, data, instruction)
        }
    }
}

/// Current UNIX time as the u32 the ledger stores
fn current_timestamp() -> Result<u32, ProgramError> {
    let clock = Clock::get()?;
    u32::try_from(clock.unix_timestamp)
        .map_err(|_| GvTokenError::MathOverflow.into())
}

/// Validate and borrow the global state account
fn core_state_mut<'a>(
    account: &'a AccountInfo,
    program_id: &Pubkey,
) -> Result<&'a mut CoreState, GvTokenError> {
    validate_owner(account, program_id)?;
    validate_writable(account)?;
    unsafe { borrow_account_data_mut::<CoreState>(account) }
}

/// Validate and borrow a user ledger account, requiring `owner` to have
/// signed and to own it
fn user_account_mut<'a>(
    account: &'a AccountInfo,
    owner: &AccountInfo,
    program_id: &Pubkey,
) -> Result<&'a mut UserAccount, GvTokenError> {
    validate_owner(account, program_id)?;
    validate_writable(account)?;
    validate_signer(owner)?;
    let user = unsafe { borrow_account_data_mut::<UserAccount>(account)? };
    if &user.owner != owner.key() {
        msg!("Error: signer does not own this ledger account");
        return Err(GvTokenError::Unauthorized);
    }
    Ok(user)
}

/// Process initialize instruction
///
/// Expected accounts:
/// 0. `[writable]` Core state account (PDA ["core"])
/// 1. `[signer]` Governance authority
///
/// Expected data layout (64 bytes):
/// - pot_authority: Pubkey
/// - proof_authority: Pubkey
fn initialize_inner(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    data: &[u8],
) -> ProgramResult {
    if accounts.len() < 2 {
        msg!("Error: Initialize requires at least 2 accounts");
        return Err(GvTokenError::InvalidInstruction.into());
    }
    let core_account = &accounts[0];
    let governance_account = &accounts[1];

    validate_owner(core_account, program_id)?;
    validate_writable(core_account)?;
    validate_signer(governance_account)?;

    let mut payload = Payload::new(data);
    let pot_authority = payload.read_pubkey()?;
    let proof_authority = payload.read_pubkey()?;

    process_initialize(
        program_id,
        core_account,
        governance_account.key(),
        &pot_authority,
        &proof_authority,
    )?;
    Ok(())
}

/// Process initialize-user instruction
///
/// Expected accounts:
/// 0. `[writable]` User ledger account (PDA ["user", owner])
/// 1. `[signer]` Owner
fn initialize_user_inner(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    _data: &[u8],
) -> ProgramResult {
    if accounts.len() < 2 {
        msg!("Error: InitializeUser requires at least 2 accounts");
        return Err(GvTokenError::InvalidInstruction.into());
    }
    let user_account = &accounts[0];
    let owner_account = &accounts[1];

    validate_owner(user_account, program_id)?;
    validate_writable(user_account)?;
    validate_signer(owner_account)?;

    process_initialize_user(program_id, user_account, owner_account.key())?;
    Ok(())
}

/// Process deposit instruction
///
/// Expected accounts:
/// 0. `[writable]` Core state account
/// 1. `[writable]` User ledger account
/// 2. `[signer]` Owner
/// 3. `[writable]` Owner's base-asset token account
/// 4. `[writable]` Program vault token account
/// 5. `[]` Token program
///
/// Expected data layout (16 bytes):
/// - amount: u128
fn deposit_inner(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    data: &[u8],
) -> ProgramResult {
    if accounts.len() < 3 {
        msg!("Error: Deposit requires at least 3 accounts");
        return Err(GvTokenError::InvalidInstruction.into());
    }
    let core = core_state_mut(&accounts[0], program_id)?;
    let user = user_account_mut(&accounts[1], &accounts[2], program_id)?;

    let mut payload = Payload::new(data);
    let amount = payload.read_u128()?;
    let now = current_timestamp()?;

    process_deposit(core, user, amount, now)?;
    Ok(())
}

/// Process proof-gated deposit instruction
///
/// Expected accounts:
/// 0. `[writable]` Core state account
/// 1. `[writable]` User ledger account
/// 2. `[signer]` Owner
/// 3. `[signer]` Proof authority (attests the legacy-holder proof)
/// 4. `[writable]` Owner's base-asset token account
/// 5. `[writable]` Program vault token account
/// 6. `[]` Token program
///
/// Expected data layout (20 bytes):
/// - amount: u128
/// - start: u32
fn deposit_with_start_inner(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    data: &[u8],
) -> ProgramResult {
    if accounts.len() < 4 {
        msg!("Error: DepositWithStart requires at least 4 accounts");
        return Err(GvTokenError::InvalidInstruction.into());
    }
    let core = core_state_mut(&accounts[0], program_id)?;
    let user = user_account_mut(&accounts[1], &accounts[2], program_id)?;
    let proof_account = &accounts[3];

    validate_signer(proof_account)?;
    if proof_account.key() != &core.proof_authority {
        msg!("Error: proof authority mismatch");
        return Err(GvTokenError::Unauthorized.into());
    }

    let mut payload = Payload::new(data);
    let amount = payload.read_u128()?;
    let start = payload.read_u32()?;
    let now = current_timestamp()?;

    process_deposit_with_start(core, user, amount, start, now)?;
    Ok(())
}

/// Process request-withdrawal instruction
///
/// Expected accounts:
/// 0. `[writable]` Core state account
/// 1. `[writable]` User ledger account
/// 2. `[signer]` Owner
///
/// Expected data layout (16 bytes):
/// - amount: u128
fn request_withdrawal_inner(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    data: &[u8],
) -> ProgramResult {
    if accounts.len() < 3 {
        msg!("Error: RequestWithdrawal requires at least 3 accounts");
        return Err(GvTokenError::InvalidInstruction.into());
    }
    let core = core_state_mut(&accounts[0], program_id)?;
    let user = user_account_mut(&accounts[1], &accounts[2], program_id)?;

    let mut payload = Payload::new(data);
    let amount = payload.read_u128()?;
    let now = current_timestamp()?;

    process_request_withdrawal(core, user, amount, now)?;
    Ok(())
}

/// Process finalize-withdrawal instruction
///
/// Permissionless: the payout always goes to the recorded owner, so
/// anyone (typically the finalizer keeper) may crank a matured request.
///
/// Expected accounts:
/// 0. `[writable]` User ledger account
/// 1. `[writable]` Program vault token account
/// 2. `[writable]` Owner's base-asset token account
/// 3. `[]` Token program
fn finalize_withdrawal_inner(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    _data: &[u8],
) -> ProgramResult {
    if accounts.is_empty() {
        msg!("Error: FinalizeWithdrawal requires at least 1 account");
        return Err(GvTokenError::InvalidInstruction.into());
    }
    let user_account = &accounts[0];
    validate_owner(user_account, program_id)?;
    validate_writable(user_account)?;
    let user = unsafe { borrow_account_data_mut::<UserAccount>(user_account)? };
    let now = current_timestamp()?;

    let _amount = process_finalize_withdrawal(user, now)?;
    Ok(())
}

/// Process stake instruction
///
/// Expected accounts:
/// 0. `[]` Core state account (vault registry lookup)
/// 1. `[writable]` User ledger account
/// 2. `[signer]` Owner
///
/// Expected data layout (36 bytes):
/// - vault: Pubkey
/// - percent: u32
fn stake_inner(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    data: &[u8],
) -> ProgramResult {
    if accounts.len() < 3 {
        msg!("Error: Stake requires at least 3 accounts");
        return Err(GvTokenError::InvalidInstruction.into());
    }
    let core_account = &accounts[0];
    validate_owner(core_account, program_id)?;
    let core = unsafe { growvote_common::borrow_account_data::<CoreState>(core_account)? };
    let user = user_account_mut(&accounts[1], &accounts[2], program_id)?;

    let mut payload = Payload::new(data);
    let vault = payload.read_pubkey()?;
    let percent = payload.read_u32()?;

    process_stake(core, user, vault, percent)?;
    Ok(())
}

/// Process unstake instruction
///
/// Expected accounts:
/// 0. `[writable]` User ledger account
/// 1. `[signer]` Owner
///
/// Expected data layout (36 bytes):
/// - vault: Pubkey
/// - percent: u32
fn unstake_inner(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    data: &[u8],
) -> ProgramResult {
    if accounts.len() < 2 {
        msg!("Error: Unstake requires at least 2 accounts");
        return Err(GvTokenError::InvalidInstruction.into());
    }
    let user = user_account_mut(&accounts[0], &accounts[1], program_id)?;

    let mut payload = Payload::new(data);
    let vault = payload.read_pubkey()?;
    let percent = payload.read_u32()?;

    process_unstake(user, &vault, percent)?;
    Ok(())
}

/// Process pot-deposit instruction
///
/// Expected accounts:
/// 0. `[writable]` Core state account
/// 1. `[writable]` User ledger account
/// 2. `[signer]` Owner
///
/// Expected data layout (16 bytes):
/// - amount: u128
fn pot_deposit_inner(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    data: &[u8],
) -> ProgramResult {
    if accounts.len() < 3 {
        msg!("Error: DepositToPot requires at least 3 accounts");
        return Err(GvTokenError::InvalidInstruction.into());
    }
    let core = core_state_mut(&accounts[0], program_id)?;
    let user = user_account_mut(&accounts[1], &accounts[2], program_id)?;

    let mut payload = Payload::new(data);
    let amount = payload.read_u128()?;
    let now = current_timestamp()?;

    process_pot_deposit(core, user, amount, now)?;
    Ok(())
}

/// Process pot-withdraw instruction
///
/// Expected accounts:
/// 0. `[writable]` Core state account
/// 1. `[writable]` User ledger account
/// 2. `[signer]` Owner
///
/// Expected data layout (16 bytes):
/// - amount: u128
fn pot_withdraw_inner(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    data: &[u8],
) -> ProgramResult {
    if accounts.len() < 3 {
        msg!("Error: WithdrawFromPot requires at least 3 accounts");
        return Err(GvTokenError::InvalidInstruction.into());
    }
    let core = core_state_mut(&accounts[0], program_id)?;
    let user = user_account_mut(&accounts[1], &accounts[2], program_id)?;

    let mut payload = Payload::new(data);
    let amount = payload.read_u128()?;

    process_pot_withdraw(core, user, amount)?;
    Ok(())
}

/// Process claim-reward instruction
///
/// Expected accounts:
/// 0. `[writable]` Core state account
/// 1. `[writable]` User ledger account
/// 2. `[signer]` Owner
/// 3. `[signer]` Pot authority (attests the reward amount)
///
/// Expected data layout (17 bytes):
/// - amount: u128
/// - also_deposit: bool
fn claim_reward_inner(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    data: &[u8],
) -> ProgramResult {
    if accounts.len() < 4 {
        msg!("Error: ClaimReward requires at least 4 accounts");
        return Err(GvTokenError::InvalidInstruction.into());
    }
    let core = core_state_mut(&accounts[0], program_id)?;
    let user = user_account_mut(&accounts[1], &accounts[2], program_id)?;
    let pot_account = &accounts[3];

    validate_signer(pot_account)?;
    if pot_account.key() != &core.pot_authority {
        msg!("Error: pot authority mismatch");
        return Err(GvTokenError::Unauthorized.into());
    }

    let mut payload = Payload::new(data);
    let amount = payload.read_u128()?;
    let also_deposit = payload.read_bool()?;
    let now = current_timestamp()?;

    let _paid = process_claim_reward(core, user, amount, also_deposit, now)?;
    Ok(())
}

/// Process delegate instruction
///
/// Expected accounts:
/// 0. `[writable]` User ledger account
/// 1. `[signer]` Owner
///
/// Expected data layout (44 bytes):
/// - delegatee: Pubkey
/// - nonce: u64
/// - deadline: u32
fn delegate_inner(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    data: &[u8],
) -> ProgramResult {
    if accounts.len() < 2 {
        msg!("Error: Delegate requires at least 2 accounts");
        return Err(GvTokenError::InvalidInstruction.into());
    }
    let user = user_account_mut(&accounts[0], &accounts[1], program_id)?;

    let mut payload = Payload::new(data);
    let delegatee = payload.read_pubkey()?;
    let nonce = payload.read_u64()?;
    let deadline = payload.read_u32()?;
    let now = current_timestamp()?;

    process_delegate(user, delegatee, nonce, deadline, now)?;
    Ok(())
}

/// Process a governance setter
///
/// Expected accounts:
/// 0. `[writable]` Core state account
/// 1. `[signer]` Governance authority
///
/// Expected data layout: setter-specific (see handlers)
fn governance_inner(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    data: &[u8],
    instruction: GvInstruction,
) -> ProgramResult {
    if accounts.len() < 2 {
        msg!("Error: governance setters require at least 2 accounts");
        return Err(GvTokenError::InvalidInstruction.into());
    }
    let core = core_state_mut(&accounts[0], program_id)?;
    let governance_account = &accounts[1];

    validate_signer(governance_account)?;
    if governance_account.key() != &core.governance {
        msg!("Error: caller is not the governance authority");
        return Err(GvTokenError::Unauthorized.into());
    }

    let mut payload = Payload::new(data);
    match instruction {
        GvInstruction::SetWithdrawalDelay => {
            let delay = payload.read_u32()?;
            process_set_withdrawal_delay(core, delay)?;
        }
        GvInstruction::SetProofRoot => {
            let root = payload.read_hash()?;
            process_set_proof_root(core, root)?;
        }
        GvInstruction::AdjustTotalSupply => {
            let new_supply = payload.read_u128()?;
            process_adjust_total_supply(core, new_supply)?;
        }
        GvInstruction::RegisterVault => {
            let vault = payload.read_pubkey()?;
            process_register_vault(core, vault)?;
        }
        GvInstruction::DeactivateVault => {
            let vault = payload.read_pubkey()?;
            process_deactivate_vault(core, &vault)?;
        }
        _ => return Err(GvTokenError::InvalidInstruction.into()),
    }
    Ok(())
}
